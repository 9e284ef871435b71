//! Whole-object conversion, used when a mapped object is stored as a
//! single document value (for example as an element of an array of tables)

use confsync_document::path::{get_at_path, parse_path, set_at_path};
use confsync_document::{Table, Value, ValueType};

use super::ConvertError;
use crate::schema::Object;

/// Render every field of `object` into a fresh table.
///
/// Fields are placed at their declared paths, so nested paths produce
/// nested tables. Fields without a value are left out.
pub fn object_to_table(object: &dyn Object) -> Result<Table, ConvertError> {
    let mut table = Table::new();
    for index in 0..object.field_count() {
        let path = object.field(index).path();
        let value = object
            .read(index, None)
            .map_err(|e| e.in_field(path))?;
        let Some(value) = value else { continue };

        if !set_at_path(&mut table, &parse_path(path), value) {
            return Err(ConvertError::custom("path collides with another field").in_field(path));
        }
    }
    Ok(table)
}

pub fn object_to_value(object: &dyn Object) -> Result<Option<Value>, ConvertError> {
    object_to_table(object).map(|table| Some(Value::Table(table)))
}

/// Merge a table into `object`.
///
/// Fields whose path is absent from the table keep their current value.
pub fn assign_object(object: &mut dyn Object, value: Value) -> Result<(), ConvertError> {
    let table = match value {
        Value::Table(table) => table,
        other => return Err(ConvertError::mismatch(ValueType::Object, &other)),
    };

    for index in 0..object.field_count() {
        let path = object.field(index).path();
        let Some(item) = get_at_path(&table, &parse_path(path)) else {
            continue;
        };
        object
            .write(index, item.clone(), None)
            .map_err(|e| e.in_field(path))?;
    }
    Ok(())
}
