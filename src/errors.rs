use thiserror::Error;

use crate::domain::Master;

/// Error type that captures journal failures across domain, storage and export.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("No order #{position} for {master} (it has {len} orders)", position = .index + 1)]
    IndexOutOfRange {
        master: Master,
        index: usize,
        len: usize,
    },
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Stored journal is malformed: {0}")]
    MalformedDocument(String),
    #[error("Export failed: {0}")]
    Export(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, JournalError>;

impl JournalError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        JournalError::Validation(message.into())
    }
}

impl From<std::io::Error> for JournalError {
    fn from(err: std::io::Error) -> Self {
        JournalError::Persistence(err.to_string())
    }
}

impl From<csv::Error> for JournalError {
    fn from(err: csv::Error) -> Self {
        JournalError::Export(err.to_string())
    }
}
