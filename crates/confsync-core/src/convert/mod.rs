//! Conversions between field values and document values
//!
//! - [`FieldValue`]: types the engine can copy into and out of a document
//!   on its own
//! - [`Converter`]: user-supplied transforms for any other field type
//! - object helpers used when a whole mapped object is stored as one value

mod converter;
mod error;
mod object;
mod value;

pub use converter::{Converter, ConverterInstance};
pub use error::ConvertError;
pub use object::{assign_object, object_to_table, object_to_value};
pub use value::FieldValue;
