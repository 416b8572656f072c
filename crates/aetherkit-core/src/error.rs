//! Error types for aetherkit-core

use thiserror::Error;

/// Result type alias using aetherkit-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in aetherkit-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// `SQLite` error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Template not found
    #[error("Template not found: {0}")]
    NotFound(String),

    /// A template with the same id is already stored
    #[error("Template already exists: {0}")]
    AlreadyExists(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Export payload failed envelope validation
    #[error("Invalid import payload: {0}")]
    InvalidPayload(String),

    /// An incoming record carried a usable id but malformed fields
    #[error("Invalid template record '{id}': {reason}")]
    InvalidRecord { id: String, reason: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
