//! Error types for confsync-document

use std::path::PathBuf;

use crate::format::Format;

/// Result type for confsync-document operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in confsync-document operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse {format} content: {message}")]
    ParseError { format: Format, message: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Path not found: {path}")]
    PathNotFound { path: String },

    #[error("Cannot set path {path}: {reason}")]
    PathSetFailed { path: String, reason: String },

    #[error("Cannot render {format} document: {reason}")]
    Unrepresentable { format: Format, reason: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub fn parse(format: Format, message: impl Into<String>) -> Self {
        Self::ParseError {
            format,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error reports malformed document content.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::ParseError { .. })
    }
}
