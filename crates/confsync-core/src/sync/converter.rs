//! Leaf field copying between an object and a document

use confsync_document::Document;

use crate::error::{Error, Result};
use crate::resolver::FieldDescriptor;
use crate::schema::Object;

/// Copies the leaf (not broken down) fields of one object.
///
/// Keys are addressed as `prefix + path`. Neither direction overwrites
/// with nothing: absent document keys leave the field alone, and fields
/// without a value leave the key absent.
pub struct ObjectConverter;

impl ObjectConverter {
    /// Populate `object` from `document`.
    pub fn to_object(
        document: &Document,
        prefix: &str,
        object: &mut dyn Object,
        descriptors: &[FieldDescriptor],
    ) -> Result<()> {
        for desc in descriptors.iter().filter(|d| !d.break_down) {
            let full = format!("{prefix}{}", desc.path);
            let Some(value) = document.get(&full) else {
                continue;
            };
            object
                .write(desc.index, value.clone(), desc.converter.as_ref())
                .map_err(|e| Error::mapping(&full, e))?;
        }
        Ok(())
    }

    /// Write the fields of `object` into `document`.
    pub fn to_document(
        object: &dyn Object,
        document: &mut Document,
        prefix: &str,
        descriptors: &[FieldDescriptor],
    ) -> Result<()> {
        for desc in descriptors.iter().filter(|d| !d.break_down) {
            let full = format!("{prefix}{}", desc.path);
            let value = object
                .read(desc.index, desc.converter.as_ref())
                .map_err(|e| Error::mapping(&full, e))?;
            if let Some(value) = value {
                document.set(&full, value)?;
            }
        }
        Ok(())
    }
}
