//! Field-metadata-driven synchronization between typed objects and
//! configuration documents
//!
//! A type declares its fields once with [`mapped!`]; the [`SyncEngine`]
//! then loads the type from a document and saves it back:
//!
//! - **Metadata resolution**: per-field breakdown decision, translated
//!   defaults and comments, guard keys and converters
//! - **Load**: copies present keys into the object, recursing into nested
//!   tables, and records hidden guarded keys in a [`RetentionLedger`]
//! - **Save**: rebuilds the document, writes defaults into both sides,
//!   attaches comments and drops keys whose guard is off
//! - **Facade**: [`ConfigFile`] bundles the value, its file and the ledger
//!
//! # Architecture
//!
//! ```text
//!              ConfigFile
//!                  |
//!              SyncEngine
//!             /    |     \
//!   MetadataResolver  ObjectConverter  RetentionLedger
//!                  |
//!           confsync-document
//! ```

pub mod config_file;
pub mod convert;
pub mod error;
pub mod ledger;
pub mod resolver;
pub mod schema;
pub mod sync;

pub use config_file::{ConfigFile, ConfigFileBuilder};
pub use convert::{ConvertError, Converter, FieldValue};
pub use error::{Error, Result};
pub use ledger::RetentionLedger;
pub use resolver::{FieldDescriptor, MetadataResolver, Translator};
pub use schema::{Configurable, Field, FieldMeta, Mapped, Object, Schema};
pub use sync::{ObjectConverter, SyncEngine};

pub use confsync_document::{
    Document, DocumentStore, FileDocument, Format, MemoryDocument, MissingFile, Table, Value,
    ValueType,
};
