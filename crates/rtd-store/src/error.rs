use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("input directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A persisted file no longer matches the expected column layout. The
    /// caller skips the file rather than guessing at its contents.
    #[error("schema drift in {path}: {detail}")]
    SchemaDrift { path: PathBuf, detail: String },

    #[error(transparent)]
    Frame(#[from] polars::error::PolarsError),
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &std::path::Path, source: csv::Error) -> Self {
        StoreError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn drift(path: &std::path::Path, detail: impl Into<String>) -> Self {
        StoreError::SchemaDrift {
            path: path.to_path_buf(),
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
