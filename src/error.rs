use polars::prelude::PolarsError;
use thiserror::Error;

/// Result type used across the normalizer.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced to callers of the normalizer.
///
/// Field- and relation-level problems never reach this type: they are
/// absorbed where they happen and only logged.
#[derive(Debug, Error)]
pub enum Error {
    /// The project tree could not be traversed at all.
    #[error("unable to read schedule: {0}")]
    FatalRead(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataframe conversion error: {0}")]
    DataFrame(#[from] PolarsError),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    pub fn fatal_read(message: impl Into<String>) -> Self {
        Self::FatalRead(message.into())
    }

    /// Whether the failure came from the input rather than from this crate.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::FatalRead(_))
    }
}
