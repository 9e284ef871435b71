//! Format detection and handler trait

use std::fmt;
use std::path::Path;

use crate::error::Result;
use crate::handlers::{JsonHandler, TomlHandler, YamlHandler};
use crate::value::{Table, ValueType};

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Toml,
    Json,
    Yaml,
}

impl Format {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Detect format from a file path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Get default file extensions for this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Toml => &["toml"],
            Self::Json => &["json"],
            Self::Yaml => &["yaml", "yml"],
        }
    }

    /// Whether values of this type round-trip through the format natively.
    ///
    /// Mapped objects and converter-only types never do; they have to be
    /// broken down into tables or converted first.
    pub fn supports_type(&self, value_type: ValueType) -> bool {
        match value_type {
            ValueType::Bool
            | ValueType::Integer
            | ValueType::Float
            | ValueType::String
            | ValueType::Array
            | ValueType::Table => true,
            ValueType::Datetime => matches!(self, Self::Toml),
            ValueType::Object | ValueType::Custom => false,
        }
    }

    /// Whether comments survive rendering in this format
    pub fn supports_comments(&self) -> bool {
        matches!(self, Self::Toml)
    }

    /// Get the handler that parses and renders this format
    pub fn handler(&self) -> Box<dyn FormatHandler> {
        match self {
            Self::Toml => Box::new(TomlHandler::new()),
            Self::Json => Box::new(JsonHandler::new()),
            Self::Yaml => Box::new(YamlHandler::new()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        };
        f.write_str(name)
    }
}

/// Trait for format-specific handlers
pub trait FormatHandler: Send + Sync {
    /// Format identifier
    fn format(&self) -> Format;

    /// Parse source into a document tree
    fn parse(&self, source: &str) -> Result<Table>;

    /// Render a document tree back to text
    fn render(&self, table: &Table) -> Result<String>;
}
