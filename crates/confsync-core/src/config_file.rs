//! A mapped value bound to its configuration file

use std::ops::{Deref, DerefMut};
use std::path::PathBuf;

use confsync_document::{Document, DocumentStore, FileDocument, Format, MissingFile};

use crate::error::Result;
use crate::ledger::RetentionLedger;
use crate::resolver::Translator;
use crate::schema::Configurable;
use crate::sync::SyncEngine;

/// Owns a configuration value, the engine for its document and the
/// retention ledger of the last load.
///
/// # Examples
///
/// ```
/// use confsync_core::{ConfigFile, Configurable, mapped};
///
/// #[derive(Debug, Default)]
/// struct Settings {
///     retries: Option<u32>,
/// }
///
/// mapped! {
///     Settings {
///         retries: "retries" [default_value = "3"],
///     }
/// }
///
/// impl Configurable for Settings {}
///
/// let dir = tempfile::tempdir().unwrap();
/// let mut config = ConfigFile::open(dir.path().join("app.toml"), Settings::default()).unwrap();
/// config.load_and_correct().unwrap();
///
/// assert_eq!(config.retries, Some(3));
/// ```
#[derive(Debug)]
pub struct ConfigFile<T, S = FileDocument> {
    engine: SyncEngine<S>,
    value: T,
    ledger: RetentionLedger,
}

impl<T: Configurable> ConfigFile<T> {
    /// Bind `value` to the file at `path`, detecting the format from the
    /// extension. Nothing is read until [`load`](Self::load).
    pub fn open(path: impl Into<PathBuf>, value: T) -> Result<Self> {
        Ok(Self::with_store(FileDocument::open(path)?, value))
    }
}

impl<T: Configurable, S: DocumentStore> ConfigFile<T, S> {
    pub fn with_store(store: S, value: T) -> Self {
        Self::with_engine(SyncEngine::new(store), value)
    }

    pub fn with_engine(engine: SyncEngine<S>, value: T) -> Self {
        Self {
            engine,
            value,
            ledger: RetentionLedger::new(),
        }
    }

    /// Populate the value from the document, replacing the ledger.
    pub fn load(&mut self) -> Result<&RetentionLedger> {
        self.ledger = self.engine.load(&mut self.value)?;
        Ok(&self.ledger)
    }

    /// Write the value back using the ledger of the last load.
    pub fn save(&mut self) -> Result<()> {
        self.engine.save(&mut self.value, &self.ledger)
    }

    /// Load, run [`Configurable::between_load_and_save`], then save.
    pub fn load_and_correct(&mut self) -> Result<()> {
        self.ledger = self.engine.load_and_correct(&mut self.value)?;
        Ok(())
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn ledger(&self) -> &RetentionLedger {
        &self.ledger
    }

    pub fn document(&self) -> &Document {
        self.engine.document()
    }

    pub fn engine(&self) -> &SyncEngine<S> {
        &self.engine
    }
}

impl<T, S> Deref for ConfigFile<T, S> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T, S> DerefMut for ConfigFile<T, S> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

/// Options for binding a value to a file
#[derive(Debug)]
pub struct ConfigFileBuilder {
    path: PathBuf,
    format: Option<Format>,
    translator: Translator,
    missing: MissingFile,
}

impl ConfigFileBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: None,
            translator: Translator::identity(),
            missing: MissingFile::default(),
        }
    }

    /// Use `format` regardless of the file extension
    pub fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub fn translator(mut self, translator: Translator) -> Self {
        self.translator = translator;
        self
    }

    pub fn missing_file(mut self, missing: MissingFile) -> Self {
        self.missing = missing;
        self
    }

    pub fn build<T: Configurable>(self, value: T) -> Result<ConfigFile<T>> {
        let store = match self.format {
            Some(format) => FileDocument::with_format(self.path, format),
            None => FileDocument::open(self.path)?,
        }
        .missing_file(self.missing);

        let engine = SyncEngine::new(store).with_translator(self.translator);
        Ok(ConfigFile::with_engine(engine, value))
    }
}
