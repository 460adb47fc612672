//! Data sources for the ARGO profile tables

pub mod config;
pub mod sources;

use thiserror::Error;
use tokio::task::JoinError;

// Re-exports
pub use config::{NullConfig, SourceConfig};
pub use sources::csv_source::{csv_source, read_records};
pub use sources::{CsvSource, MockSource};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Missing required column '{column}' in {file}")]
    MissingColumn { file: String, column: String },

    #[error("No valid rows in {file} ({skipped} skipped)")]
    NoValidRows { file: String, skipped: usize },

    #[error("Invalid source configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}
