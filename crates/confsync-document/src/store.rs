//! Document stores: a document tree bound to its persisted representation

use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::error::{Error, Result};
use crate::format::Format;
use crate::io;
use crate::value::Value;

/// A document tree bound to a backing representation.
///
/// Implementors provide the tree and persistence; path operations are
/// provided on top of [`DocumentStore::document`].
pub trait DocumentStore {
    /// Format used to parse and render the backing representation
    fn format(&self) -> Format;

    fn document(&self) -> &Document;

    fn document_mut(&mut self) -> &mut Document;

    /// Replace the in-memory tree with the backing representation
    fn load(&mut self) -> Result<()>;

    /// Write the in-memory tree to the backing representation
    fn save(&mut self) -> Result<()>;

    fn clear(&mut self) {
        self.document_mut().clear();
    }

    fn get(&self, path: &str) -> Option<&Value> {
        self.document().get(path)
    }

    fn contains(&self, path: &str) -> bool {
        self.document().contains(path)
    }

    fn set(&mut self, path: &str, value: Value) -> Result<()> {
        self.document_mut().set(path, value)
    }

    fn remove(&mut self, path: &str) -> Option<Value> {
        self.document_mut().remove(path)
    }

    fn set_comment(&mut self, path: &str, text: &str) -> bool {
        self.document_mut().set_comment(path, text)
    }
}

/// What loading a file that does not exist should do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingFile {
    /// Start from an empty document; the file is created on save
    #[default]
    CreateEmpty,
    /// Fail with an I/O error
    Error,
}

/// A document backed by a file on disk
#[derive(Debug)]
pub struct FileDocument {
    path: PathBuf,
    format: Format,
    missing: MissingFile,
    document: Document,
}

impl FileDocument {
    /// Open a document, detecting the format from the file extension.
    ///
    /// Nothing is read until [`DocumentStore::load`].
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = Format::from_path(&path).ok_or_else(|| {
            Error::UnsupportedFormat(
                path.extension()
                    .map(|ext| ext.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            )
        })?;
        Ok(Self::with_format(path, format))
    }

    /// Open a document with an explicit format.
    pub fn with_format(path: impl Into<PathBuf>, format: Format) -> Self {
        Self {
            path: path.into(),
            format,
            missing: MissingFile::default(),
            document: Document::new(),
        }
    }

    pub fn missing_file(mut self, missing: MissingFile) -> Self {
        self.missing = missing;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for FileDocument {
    fn format(&self) -> Format {
        self.format
    }

    fn document(&self) -> &Document {
        &self.document
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    fn load(&mut self) -> Result<()> {
        let source = match io::read_text_if_exists(&self.path)? {
            Some(source) => source,
            None => match self.missing {
                MissingFile::CreateEmpty => {
                    tracing::debug!(path = %self.path.display(), "Config file missing, starting empty");
                    String::new()
                }
                MissingFile::Error => {
                    return Err(Error::io(
                        &self.path,
                        std::io::Error::from(std::io::ErrorKind::NotFound),
                    ));
                }
            },
        };

        self.document = Document::parse_as(&source, self.format)?;
        tracing::debug!(path = %self.path.display(), format = %self.format, "Loaded document");
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        let rendered = self.document.render(self.format)?;
        io::write_atomic(&self.path, rendered.as_bytes())?;
        tracing::debug!(path = %self.path.display(), format = %self.format, "Saved document");
        Ok(())
    }
}

/// A document backed by an in-memory string
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    format: Format,
    source: String,
    document: Document,
}

impl MemoryDocument {
    pub fn new(format: Format) -> Self {
        Self::from_source(format, "")
    }

    pub fn from_source(format: Format, source: impl Into<String>) -> Self {
        Self {
            format,
            source: source.into(),
            document: Document::new(),
        }
    }

    /// The backing text as of the last save (or construction)
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }
}

impl DocumentStore for MemoryDocument {
    fn format(&self) -> Format {
        self.format
    }

    fn document(&self) -> &Document {
        &self.document
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    fn load(&mut self) -> Result<()> {
        self.document = Document::parse_as(&self.source, self.format)?;
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        self.source = self.document.render(self.format)?;
        Ok(())
    }
}
