use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] aetherkit_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No template content provided")]
    EmptyContent,
    #[error("Edited template content cannot be empty")]
    EmptyEditedContent,
    #[error("Template ID cannot be empty")]
    EmptyTemplateId,
    #[error("Template not found for id/prefix: {0}")]
    TemplateNotFound(String),
    #[error("{0}")]
    AmbiguousTemplateId(String),
    #[error("Invalid token assignment '{0}' (expected TOKEN=VALUE)")]
    InvalidTokenAssignment(String),
    #[error("No template given and none rendered yet")]
    NoRecentTemplate,
    #[error("Import aborted, nothing was imported: record '{id}' is invalid ({reason})")]
    ImportRejected { id: String, reason: String },
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error("Configuration error: {0}")]
    Config(String),
}
