//! JSON format handler using serde_json
//!
//! JSON has no comment syntax; comments are dropped on render.

use serde_json::{Map, Number, Value as JsonValue};

use crate::error::{Error, Result};
use crate::format::{Format, FormatHandler};
use crate::value::{Table, Value};

/// Handler for JSON files using serde_json
#[derive(Debug, Default)]
pub struct JsonHandler;

impl JsonHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FormatHandler for JsonHandler {
    fn format(&self) -> Format {
        Format::Json
    }

    fn parse(&self, source: &str) -> Result<Table> {
        let value: JsonValue =
            serde_json::from_str(source).map_err(|e| Error::parse(Format::Json, e.to_string()))?;
        match value {
            JsonValue::Object(map) => Ok(table_from_json(map)),
            other => Err(Error::parse(
                Format::Json,
                format!("top-level value must be an object, found {}", json_kind(&other)),
            )),
        }
    }

    fn render(&self, table: &Table) -> Result<String> {
        let value = JsonValue::Object(table_to_json(table)?);
        let mut rendered = serde_json::to_string_pretty(&value)?;
        rendered.push('\n');
        Ok(rendered)
    }
}

fn table_from_json(map: Map<String, JsonValue>) -> Table {
    map.into_iter()
        .filter_map(|(k, v)| value_from_json(v).map(|v| (k, v)))
        .collect()
}

/// Convert a JSON value; `null` has no document representation.
fn value_from_json(value: JsonValue) -> Option<Value> {
    match value {
        JsonValue::Null => None,
        JsonValue::Bool(b) => Some(Value::Bool(b)),
        JsonValue::Number(n) => Some(match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        }),
        JsonValue::String(s) => Some(Value::String(s)),
        JsonValue::Array(items) => Some(Value::Array(
            items.into_iter().filter_map(value_from_json).collect(),
        )),
        JsonValue::Object(map) => Some(Value::Table(table_from_json(map))),
    }
}

fn table_to_json(table: &Table) -> Result<Map<String, JsonValue>> {
    table
        .iter()
        .map(|(k, v)| Ok((k.to_string(), value_to_json(v)?)))
        .collect()
}

fn value_to_json(value: &Value) -> Result<JsonValue> {
    Ok(match value {
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Integer(i) => JsonValue::Number((*i).into()),
        Value::Float(f) => {
            JsonValue::Number(Number::from_f64(*f).ok_or_else(|| Error::Unrepresentable {
                format: Format::Json,
                reason: format!("non-finite float {f}"),
            })?)
        }
        Value::String(s) | Value::Datetime(s) => JsonValue::String(s.clone()),
        Value::Array(items) => {
            JsonValue::Array(items.iter().map(value_to_json).collect::<Result<_>>()?)
        }
        Value::Table(t) => JsonValue::Object(table_to_json(t)?),
    })
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
