//! Field types the engine converts without a user-supplied converter

use std::collections::BTreeMap;
use std::path::PathBuf;

use confsync_document::{Table, Value, ValueType};

use super::ConvertError;
use crate::schema::Object;

/// A field type with a built-in document representation.
///
/// Scalars parse from their string form as well, so that textual default
/// values convert into typed fields. Mapped types implement this through
/// [`mapped!`](crate::mapped) and convert to and from whole tables.
pub trait FieldValue: Sized + 'static {
    /// The type tag checked against the format's native types
    fn value_type() -> ValueType;

    /// Convert into a document value; `None` leaves the key absent
    fn to_value(&self) -> Result<Option<Value>, ConvertError>;

    fn from_value(value: Value) -> Result<Self, ConvertError>;

    /// Update `self` from a document value.
    ///
    /// Replaces the value by default; composite types merge instead so that
    /// keys missing from the document keep their current state.
    fn assign(&mut self, value: Value) -> Result<(), ConvertError> {
        *self = Self::from_value(value)?;
        Ok(())
    }

    /// View this value as a mapped object, if it is one
    fn as_object_mut(&mut self) -> Option<&mut dyn Object> {
        None
    }

    /// The mapped objects held by this value, in order
    fn nested_objects_mut(&mut self) -> Vec<&mut dyn Object> {
        Vec::new()
    }
}

impl FieldValue for bool {
    fn value_type() -> ValueType {
        ValueType::Bool
    }

    fn to_value(&self) -> Result<Option<Value>, ConvertError> {
        Ok(Some(Value::Bool(*self)))
    }

    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Bool(b) => Ok(b),
            Value::String(s) => s.trim().parse().map_err(|_| ConvertError::InvalidValue {
                expected: ValueType::Bool,
                value: s,
                reason: "expected `true` or `false`".to_string(),
            }),
            other => Err(ConvertError::mismatch(ValueType::Bool, &other)),
        }
    }
}

macro_rules! impl_integer {
    ($($t:ty),+ $(,)?) => {$(
        impl FieldValue for $t {
            fn value_type() -> ValueType {
                ValueType::Integer
            }

            fn to_value(&self) -> Result<Option<Value>, ConvertError> {
                i64::try_from(*self)
                    .map(|i| Some(Value::Integer(i)))
                    .map_err(|_| ConvertError::OutOfRange {
                        value: self.to_string(),
                        target: "i64",
                    })
            }

            fn from_value(value: Value) -> Result<Self, ConvertError> {
                match value {
                    Value::Integer(i) => <$t>::try_from(i).map_err(|_| ConvertError::OutOfRange {
                        value: i.to_string(),
                        target: stringify!($t),
                    }),
                    Value::String(s) => s.trim().parse().map_err(|e: std::num::ParseIntError| {
                        ConvertError::InvalidValue {
                            expected: ValueType::Integer,
                            value: s.clone(),
                            reason: e.to_string(),
                        }
                    }),
                    other => Err(ConvertError::mismatch(ValueType::Integer, &other)),
                }
            }
        }
    )+};
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_float {
    ($($t:ty),+ $(,)?) => {$(
        impl FieldValue for $t {
            fn value_type() -> ValueType {
                ValueType::Float
            }

            fn to_value(&self) -> Result<Option<Value>, ConvertError> {
                Ok(Some(Value::Float(f64::from(*self))))
            }

            fn from_value(value: Value) -> Result<Self, ConvertError> {
                match value {
                    Value::Float(f) => {
                        let narrowed = f as $t;
                        if narrowed.is_infinite() && f.is_finite() {
                            return Err(ConvertError::OutOfRange {
                                value: f.to_string(),
                                target: stringify!($t),
                            });
                        }
                        Ok(narrowed)
                    }
                    // Integers beyond the mantissa would be rounded
                    Value::Integer(i) => {
                        let converted = i as $t;
                        if converted as i128 != i128::from(i) {
                            return Err(ConvertError::OutOfRange {
                                value: i.to_string(),
                                target: stringify!($t),
                            });
                        }
                        Ok(converted)
                    }
                    Value::String(s) => s.trim().parse().map_err(|e: std::num::ParseFloatError| {
                        ConvertError::InvalidValue {
                            expected: ValueType::Float,
                            value: s.clone(),
                            reason: e.to_string(),
                        }
                    }),
                    other => Err(ConvertError::mismatch(ValueType::Float, &other)),
                }
            }
        }
    )+};
}

impl_float!(f32, f64);

impl FieldValue for String {
    fn value_type() -> ValueType {
        ValueType::String
    }

    fn to_value(&self) -> Result<Option<Value>, ConvertError> {
        Ok(Some(Value::String(self.clone())))
    }

    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::String(s) | Value::Datetime(s) => Ok(s),
            other => Err(ConvertError::mismatch(ValueType::String, &other)),
        }
    }
}

impl FieldValue for PathBuf {
    fn value_type() -> ValueType {
        ValueType::String
    }

    fn to_value(&self) -> Result<Option<Value>, ConvertError> {
        Ok(Some(Value::String(self.to_string_lossy().into_owned())))
    }

    fn from_value(value: Value) -> Result<Self, ConvertError> {
        String::from_value(value).map(PathBuf::from)
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn value_type() -> ValueType {
        T::value_type()
    }

    fn to_value(&self) -> Result<Option<Value>, ConvertError> {
        match self {
            Some(inner) => inner.to_value(),
            None => Ok(None),
        }
    }

    fn from_value(value: Value) -> Result<Self, ConvertError> {
        T::from_value(value).map(Some)
    }

    fn assign(&mut self, value: Value) -> Result<(), ConvertError> {
        match self {
            Some(inner) => inner.assign(value),
            None => {
                *self = Some(T::from_value(value)?);
                Ok(())
            }
        }
    }

    fn as_object_mut(&mut self) -> Option<&mut dyn Object> {
        self.as_mut().and_then(T::as_object_mut)
    }

    fn nested_objects_mut(&mut self) -> Vec<&mut dyn Object> {
        match self {
            Some(inner) => inner.nested_objects_mut(),
            None => Vec::new(),
        }
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn value_type() -> ValueType {
        ValueType::Array
    }

    /// Elements without a document value are skipped.
    fn to_value(&self) -> Result<Option<Value>, ConvertError> {
        let mut items = Vec::with_capacity(self.len());
        for (i, item) in self.iter().enumerate() {
            if let Some(value) = item.to_value().map_err(|e| e.in_field(format!("[{i}]")))? {
                items.push(value);
            }
        }
        Ok(Some(Value::Array(items)))
    }

    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| T::from_value(item).map_err(|e| e.in_field(format!("[{i}]"))))
                .collect(),
            other => Err(ConvertError::mismatch(ValueType::Array, &other)),
        }
    }

    fn nested_objects_mut(&mut self) -> Vec<&mut dyn Object> {
        self.iter_mut().filter_map(T::as_object_mut).collect()
    }
}

impl<T: FieldValue> FieldValue for BTreeMap<String, T> {
    fn value_type() -> ValueType {
        ValueType::Table
    }

    fn to_value(&self) -> Result<Option<Value>, ConvertError> {
        let mut table = Table::new();
        for (key, item) in self {
            if let Some(value) = item.to_value().map_err(|e| e.in_field(key.clone()))? {
                table.insert(key.clone(), value);
            }
        }
        Ok(Some(Value::Table(table)))
    }

    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Table(table) => table
                .iter()
                .map(|(key, item)| {
                    T::from_value(item.clone())
                        .map(|v| (key.to_string(), v))
                        .map_err(|e| e.in_field(key))
                })
                .collect(),
            other => Err(ConvertError::mismatch(ValueType::Table, &other)),
        }
    }
}
