//! Document value model
//!
//! A document is a tree of [`Table`]s holding scalar, array, and nested
//! table values. Tables keep insertion order and carry at most one comment
//! per key.

use std::fmt;

use indexmap::IndexMap;

/// Type tag describing what kind of value a field produces.
///
/// The first seven variants mirror [`Value`]. `Object` marks a mapped
/// composite type, `Custom` marks a type only a converter can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    Integer,
    Float,
    String,
    Datetime,
    Array,
    Table,
    Object,
    Custom,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Datetime => "datetime",
            Self::Array => "array",
            Self::Table => "table",
            Self::Object => "object",
            Self::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// A value stored in a document
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// An RFC 3339 date, time or timestamp, kept as written
    Datetime(String),
    Array(Vec<Value>),
    Table(Table),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Bool(_) => ValueType::Bool,
            Self::Integer(_) => ValueType::Integer,
            Self::Float(_) => ValueType::Float,
            Self::String(_) => ValueType::String,
            Self::Datetime(_) => ValueType::Datetime,
            Self::Array(_) => ValueType::Array,
            Self::Table(_) => ValueType::Table,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&str> {
        match self {
            Self::Datetime(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) | Self::Datetime(s) => f.write_str(s),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Table(table) => {
                f.write_str("{")?;
                for (i, (key, value)) in table.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Array(value)
    }
}

impl From<Table> for Value {
    fn from(value: Table) -> Self {
        Self::Table(value)
    }
}

/// An insertion-ordered table of values with optional per-key comments.
///
/// A comment may be recorded for a key that has no value yet; it is only
/// rendered once the key holds a value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    entries: IndexMap<String, Value>,
    comments: IndexMap<String, String>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Insert a value, keeping the key's original position if it existed.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    /// Remove a value and its comment, preserving the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.comments.shift_remove(key);
        self.entries.shift_remove(key)
    }

    pub fn comment(&self, key: &str) -> Option<&str> {
        self.comments.get(key).map(String::as_str)
    }

    pub fn set_comment(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.comments.insert(key.into(), text.into());
    }

    pub fn remove_comment(&mut self, key: &str) -> Option<String> {
        self.comments.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.comments.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Value)> for Table {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            comments: IndexMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_keeps_insertion_order() {
        let mut table = Table::new();
        table.insert("zeta", Value::from(1));
        table.insert("alpha", Value::from(2));
        table.insert("mid", Value::from(3));

        let keys: Vec<_> = table.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_remove_drops_comment() {
        let mut table = Table::new();
        table.insert("port", Value::from(8080));
        table.set_comment("port", "Listening port");

        assert_eq!(table.remove("port"), Some(Value::Integer(8080)));
        assert_eq!(table.comment("port"), None);
    }

    #[test]
    fn test_comment_without_value() {
        let mut table = Table::new();
        table.set_comment("later", "set before the value");
        assert!(!table.contains_key("later"));
        assert_eq!(table.comment("later"), Some("set before the value"));
    }

    #[test]
    fn test_display_nested() {
        let mut inner = Table::new();
        inner.insert("host", Value::from("localhost"));
        let value = Value::Array(vec![Value::Table(inner), Value::from(true)]);
        assert_eq!(value.to_string(), "[{host = localhost}, true]");
    }
}
