//! The processing ledger: which bulletins have already been incorporated.
//!
//! Plain text, one bulletin identifier per line, sorted and deduplicated on
//! every persist. Rewrites go through a sibling temp file and an atomic
//! rename so a crash never leaves a half-written ledger.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use rtd_model::{BulletinId, Frequency};
use tracing::warn;

use crate::error::{Result, StoreError};

/// Path of the ledger for one table type. Each bulletin carries one table
/// per type, and the two are cleaned independently, so each type keeps its
/// own ledger.
pub fn ledger_path(root: &Path, frequency: Frequency) -> PathBuf {
    root.join(format!("ledger_{frequency}.txt"))
}

#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
    entries: BTreeSet<BulletinId>,
}

impl Ledger {
    /// Load the ledger, starting empty when the file does not exist yet.
    /// Lines that do not parse as bulletin identifiers are dropped with a
    /// warning; the next persist writes a clean file.
    pub fn load(path: &Path) -> Result<Ledger> {
        let mut entries = BTreeSet::new();
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                for line in contents.lines() {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match line.parse::<BulletinId>() {
                        Ok(id) => {
                            entries.insert(id);
                        }
                        Err(_) => {
                            warn!(path = %path.display(), line, "unparseable ledger line, dropped");
                        }
                    }
                }
            }
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => return Err(StoreError::io(path, source)),
        }
        Ok(Ledger {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn contains(&self, bulletin: BulletinId) -> bool {
        self.entries.contains(&bulletin)
    }

    /// Record one bulletin; returns false when it was already present.
    pub fn record(&mut self, bulletin: BulletinId) -> bool {
        self.entries.insert(bulletin)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite the whole ledger file, sorted, via temp-then-rename.
    pub fn persist(&self) -> Result<()> {
        let tmp = self.path.with_extension("tmp");
        {
            let mut file =
                std::fs::File::create(&tmp).map_err(|source| StoreError::io(&tmp, source))?;
            for entry in &self.entries {
                writeln!(file, "{entry}").map_err(|source| StoreError::io(&tmp, source))?;
            }
            file.sync_all()
                .map_err(|source| StoreError::io(&tmp, source))?;
        }
        std::fs::rename(&tmp, &self.path).map_err(|source| StoreError::io(&self.path, source))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ledger_round_trip_sorted_dedup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.txt");
        let mut ledger = Ledger::load(&path).unwrap();
        assert!(ledger.is_empty());
        assert!(ledger.record(BulletinId::new(110, 2020)));
        assert!(ledger.record(BulletinId::new(9, 2020)));
        assert!(!ledger.record(BulletinId::new(9, 2020)));
        ledger.persist().unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "b9_2020\nb110_2020\n"
        );
        let reloaded = Ledger::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains(BulletinId::new(110, 2020)));
    }

    #[test]
    fn test_persist_without_new_entries_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.txt");
        let mut ledger = Ledger::load(&path).unwrap();
        ledger.record(BulletinId::new(103, 2020));
        ledger.persist().unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let mut again = Ledger::load(&path).unwrap();
        assert!(!again.record(BulletinId::new(103, 2020)));
        again.persist().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_junk_lines_are_dropped_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.txt");
        std::fs::write(&path, "b9_2020\nnot-a-bulletin\n\nb110_2020\n").unwrap();
        let ledger = Ledger::load(&path).unwrap();
        assert_eq!(ledger.len(), 2);
    }
}
