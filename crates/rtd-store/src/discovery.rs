//! Locating extracted bulletin tables on disk.
//!
//! Inputs live under `<root>/<era>/<frequency>/<year>/b<issue>_<year>.csv`.
//! File stems are the bulletin identifiers; anything else in those
//! directories is ignored with a warning.

use std::path::{Path, PathBuf};

use rtd_model::{BulletinId, Era, Frequency};
use tracing::{debug, warn};

use crate::error::{Result, StoreError};

/// One extracted table located on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredBulletin {
    pub path: PathBuf,
    pub bulletin: BulletinId,
    pub era: Era,
    pub frequency: Frequency,
}

/// Discover every extracted table for one (era, frequency) pair, sorted by
/// bulletin year then issue. A missing era or frequency directory yields an
/// empty set; only the root itself must exist.
pub fn discover_bulletins(
    root: &Path,
    era: Era,
    frequency: Frequency,
) -> Result<Vec<DiscoveredBulletin>> {
    if !root.is_dir() {
        return Err(StoreError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }
    let base = root.join(era.as_str()).join(frequency.as_str());
    if !base.is_dir() {
        debug!(path = %base.display(), "no input directory, skipping");
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for year_entry in read_dir(&base)? {
        if !year_entry.is_dir() {
            continue;
        }
        for path in read_dir(&year_entry)? {
            let is_csv = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if !path.is_file() || !is_csv {
                continue;
            }
            let stem = path.file_stem().and_then(|v| v.to_str()).unwrap_or("");
            match stem.parse::<BulletinId>() {
                Ok(bulletin) => found.push(DiscoveredBulletin {
                    path: path.clone(),
                    bulletin,
                    era,
                    frequency,
                }),
                Err(_) => {
                    warn!(path = %path.display(), "file stem is not a bulletin identifier, ignored");
                }
            }
        }
    }
    found.sort_by_key(|item| item.bulletin);
    Ok(found)
}

fn read_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| StoreError::io(dir, source))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| StoreError::io(dir, source))?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}
