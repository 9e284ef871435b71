//! Load and save passes between a mapped object and its document
//!
//! - **converter**: copies leaf fields between one object and one table
//! - **engine**: walks the object graph, applies defaults and comments and
//!   maintains the retention ledger

mod converter;
mod engine;

pub use converter::ObjectConverter;
pub use engine::{SyncEngine, resolve_guard};
