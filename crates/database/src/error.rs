use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load environment variables for database connection: {0}")]
    ConnectionConfigError(String),

    #[error("Database error: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("An error occurred during JSON serialization/deserialization: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to read or write the ledger file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid journal record: {0}")]
    InvalidRecord(#[from] CoreError),

    #[error("Inconsistent ledger: {0}")]
    InvalidLedger(String),
}
