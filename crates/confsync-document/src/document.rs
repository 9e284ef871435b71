//! In-memory document tree with path addressing

use crate::error::{Error, Result};
use crate::format::Format;
use crate::path::{
    comment_at_path, get_at_path, parse_path, remove_at_path, set_at_path, set_comment_at_path,
};
use crate::value::{Table, Value};

/// A commentable configuration document.
///
/// Wraps a root [`Table`] and addresses values by dotted path
/// (`network.proxy.port`, `servers[0].host`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root: Table,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_table(root: Table) -> Self {
        Self { root }
    }

    /// Parse content in the given format.
    ///
    /// Blank content parses as an empty document in every format.
    pub fn parse_as(source: &str, format: Format) -> Result<Self> {
        if source.trim().is_empty() {
            return Ok(Self::new());
        }
        let root = format.handler().parse(source)?;
        Ok(Self { root })
    }

    /// Render to text in the given format.
    pub fn render(&self, format: Format) -> Result<String> {
        format.handler().render(&self.root)
    }

    pub fn root(&self) -> &Table {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Table {
        &mut self.root
    }

    pub fn into_table(self) -> Table {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Remove every value and comment.
    pub fn clear(&mut self) {
        self.root.clear();
    }

    /// Get the value at a path.
    ///
    /// # Examples
    ///
    /// ```
    /// use confsync_document::{Document, Format, Value};
    ///
    /// let doc = Document::parse_as("[network]\ntimeout = 30\n", Format::Toml).unwrap();
    /// assert_eq!(doc.get("network.timeout"), Some(&Value::Integer(30)));
    /// assert_eq!(doc.get("network.missing"), None);
    /// ```
    pub fn get(&self, path: &str) -> Option<&Value> {
        get_at_path(&self.root, &parse_path(path))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Set the value at a path, creating intermediate tables.
    ///
    /// # Errors
    ///
    /// Returns `PathSetFailed` if an intermediate value is not a table or
    /// array, or an array index is out of range.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        let segments = parse_path(path);
        if segments.is_empty() {
            return Err(Error::PathSetFailed {
                path: path.to_string(),
                reason: "empty path".to_string(),
            });
        }
        if !set_at_path(&mut self.root, &segments, value.into()) {
            return Err(Error::PathSetFailed {
                path: path.to_string(),
                reason: "an intermediate value is not a container".to_string(),
            });
        }
        Ok(())
    }

    /// Remove the value (and its comment) at a path.
    pub fn remove(&mut self, path: &str) -> Option<Value> {
        remove_at_path(&mut self.root, &parse_path(path))
    }

    pub fn comment(&self, path: &str) -> Option<&str> {
        comment_at_path(&self.root, &parse_path(path))
    }

    /// Attach a comment to the key at a path.
    ///
    /// Returns `false` when the key's parent table does not exist.
    pub fn set_comment(&mut self, path: &str, text: &str) -> bool {
        set_comment_at_path(&mut self.root, &parse_path(path), text)
    }
}
