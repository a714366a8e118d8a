//! Machine-readable outcome of one batch run.

use serde::{Deserialize, Serialize};

/// Per-bulletin outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletinStatus {
    /// Cleaned, reshaped, persisted, and recorded in the ledger.
    Processed,
    /// Already present in the ledger; not touched.
    Skipped,
    /// Cleaning or reshaping failed; excluded from the ledger.
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletinOutcome {
    /// Identifier in its textual form (`b103_2020`).
    pub bulletin: String,
    pub era: String,
    pub frequency: String,
    /// Canonical-industry rows that reached the vintage record.
    pub rows: usize,
    /// Rows dropped because their sector label fell outside the vocabulary.
    pub dropped_rows: usize,
    /// Cells that failed numeric coercion and became missing.
    pub coercion_losses: usize,
    pub status: BulletinStatus,
    /// Error text when `status` is `Failed`.
    pub error: Option<String>,
}

/// Summary of a full batch run, serializable for `--json-report`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub outcomes: Vec<BulletinOutcome>,
}

impl RunReport {
    pub fn record(&mut self, outcome: BulletinOutcome) {
        match outcome.status {
            BulletinStatus::Processed => self.processed += 1,
            BulletinStatus::Skipped => self.skipped += 1,
            BulletinStatus::Failed => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
