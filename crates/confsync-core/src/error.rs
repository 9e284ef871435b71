//! Error types for confsync-core

use crate::convert::ConvertError;

/// Result type for confsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a load or save pass
///
/// Every error aborts the current pass; mappings already applied to the
/// object or document are not rolled back.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A field could not be read from or written to during a walk
    #[error("Failed to map field '{path}': {source}")]
    Mapping {
        path: String,
        #[source]
        source: ConvertError,
    },

    /// A declared converter could not be constructed
    #[error("Cannot create converter {converter} for field '{path}': {message}")]
    ConverterInstantiation {
        path: String,
        converter: &'static str,
        message: String,
    },

    /// The persisted document is malformed
    #[error(transparent)]
    DocumentParse(confsync_document::Error),

    /// The document store failed to read, write, or address a path
    #[error("Document store error: {0}")]
    Store(#[source] confsync_document::Error),
}

impl Error {
    pub fn mapping(path: impl Into<String>, source: ConvertError) -> Self {
        Self::Mapping {
            path: path.into(),
            source,
        }
    }
}

impl From<confsync_document::Error> for Error {
    fn from(err: confsync_document::Error) -> Self {
        if err.is_parse() {
            Self::DocumentParse(err)
        } else {
            Self::Store(err)
        }
    }
}
