use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReshapeError {
    #[error("dataframe error: {0}")]
    Frame(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, ReshapeError>;
