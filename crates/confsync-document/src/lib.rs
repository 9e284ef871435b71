//! Commentable configuration documents for confsync
//!
//! Provides an insertion-ordered key-value tree with per-key comments,
//! dotted path addressing, and TOML/JSON/YAML rendering behind the
//! [`DocumentStore`] interface the sync engine talks to.

pub mod document;
pub mod error;
pub mod format;
pub mod handlers;
pub mod io;
pub mod path;
pub mod store;
pub mod value;

pub use document::Document;
pub use error::{Error, Result};
pub use format::{Format, FormatHandler};
pub use store::{DocumentStore, FileDocument, MemoryDocument, MissingFile};
pub use value::{Table, Value, ValueType};
