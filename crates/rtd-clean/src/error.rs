use thiserror::Error;

#[derive(Debug, Error)]
pub enum CleanError {
    /// A pipeline finished without the structure later stages require,
    /// e.g. a missing label or period column. The offending bulletin is
    /// skipped and kept out of the ledger.
    #[error("structural failure: {0}")]
    Structure(String),
    /// The repaired grid does not satisfy the cleaned-table contract.
    #[error("contract violation: {0}")]
    Contract(String),
}

pub type Result<T> = std::result::Result<T, CleanError>;
