//! Conversion errors

use confsync_document::{Value, ValueType};

/// A value could not be converted between its field and document forms
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: ValueType,
        found: ValueType,
    },

    #[error("invalid {expected} value {value:?}: {reason}")]
    InvalidValue {
        expected: ValueType,
        value: String,
        reason: String,
    },

    #[error("{value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },

    #[error("converter {converter} cannot be instantiated: {message}")]
    Instantiation {
        converter: &'static str,
        message: String,
    },

    #[error("field is not a composite object")]
    NotComposite,

    #[error("{path}: {source}")]
    Field {
        path: String,
        #[source]
        source: Box<ConvertError>,
    },

    #[error("{0}")]
    Custom(String),
}

impl ConvertError {
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    pub fn mismatch(expected: ValueType, found: &Value) -> Self {
        Self::TypeMismatch {
            expected,
            found: found.value_type(),
        }
    }

    /// Prefix this error with the path of the field it occurred in.
    pub fn in_field(self, path: impl Into<String>) -> Self {
        Self::Field {
            path: path.into(),
            source: Box::new(self),
        }
    }
}
