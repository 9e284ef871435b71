//! Command implementations for confsync-cli

pub mod demo;
pub mod document;

pub use demo::run_demo;
pub use document::{run_convert, run_get, run_set};
