//! YAML format handler using serde_yaml
//!
//! serde_yaml cannot emit comments; they are dropped on render.

use serde_yaml::{Mapping, Value as YamlValue};

use crate::error::{Error, Result};
use crate::format::{Format, FormatHandler};
use crate::value::{Table, Value};

/// Handler for YAML files using serde_yaml
#[derive(Debug, Default)]
pub struct YamlHandler;

impl YamlHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FormatHandler for YamlHandler {
    fn format(&self) -> Format {
        Format::Yaml
    }

    fn parse(&self, source: &str) -> Result<Table> {
        if source.trim().is_empty() {
            return Ok(Table::new());
        }
        let value: YamlValue =
            serde_yaml::from_str(source).map_err(|e| Error::parse(Format::Yaml, e.to_string()))?;
        match value {
            YamlValue::Null => Ok(Table::new()),
            YamlValue::Mapping(map) => table_from_yaml(map),
            _ => Err(Error::parse(Format::Yaml, "top-level value must be a mapping")),
        }
    }

    fn render(&self, table: &Table) -> Result<String> {
        Ok(serde_yaml::to_string(&YamlValue::Mapping(table_to_yaml(table)))?)
    }
}

fn table_from_yaml(map: Mapping) -> Result<Table> {
    let mut table = Table::new();
    for (key, value) in map {
        let key = match key {
            YamlValue::String(s) => s,
            YamlValue::Bool(b) => b.to_string(),
            YamlValue::Number(n) => n.to_string(),
            _ => return Err(Error::parse(Format::Yaml, "mapping keys must be scalars")),
        };
        if let Some(value) = value_from_yaml(value)? {
            table.insert(key, value);
        }
    }
    Ok(table)
}

fn value_from_yaml(value: YamlValue) -> Result<Option<Value>> {
    Ok(match value {
        YamlValue::Null => None,
        YamlValue::Bool(b) => Some(Value::Bool(b)),
        YamlValue::Number(n) => Some(match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        }),
        YamlValue::String(s) => Some(Value::String(s)),
        YamlValue::Sequence(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                if let Some(value) = value_from_yaml(item)? {
                    values.push(value);
                }
            }
            Some(Value::Array(values))
        }
        YamlValue::Mapping(map) => Some(Value::Table(table_from_yaml(map)?)),
        YamlValue::Tagged(tagged) => value_from_yaml(tagged.value)?,
    })
}

fn table_to_yaml(table: &Table) -> Mapping {
    let mut map = Mapping::new();
    for (key, value) in table.iter() {
        map.insert(YamlValue::String(key.to_string()), value_to_yaml(value));
    }
    map
}

fn value_to_yaml(value: &Value) -> YamlValue {
    match value {
        Value::Bool(b) => YamlValue::Bool(*b),
        Value::Integer(i) => YamlValue::Number((*i).into()),
        Value::Float(f) => YamlValue::Number((*f).into()),
        Value::String(s) | Value::Datetime(s) => YamlValue::String(s.clone()),
        Value::Array(items) => YamlValue::Sequence(items.iter().map(value_to_yaml).collect()),
        Value::Table(t) => YamlValue::Mapping(table_to_yaml(t)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_nested() {
        let table = YamlHandler::new()
            .parse("network:\n  timeout: 30\n  proxy:\n    enabled: false\n")
            .unwrap();
        let network = table.get("network").and_then(Value::as_table).unwrap();
        assert_eq!(network.get("timeout"), Some(&Value::Integer(30)));
        let proxy = network.get("proxy").and_then(Value::as_table).unwrap();
        assert_eq!(proxy.get("enabled"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_empty_source_is_empty_table() {
        assert!(YamlHandler::new().parse("").unwrap().is_empty());
    }

    #[test]
    fn test_render_round_trip() {
        let mut table = Table::new();
        table.insert("name", Value::from("demo"));
        table.insert("ratio", Value::from(0.5));
        let handler = YamlHandler::new();
        let rendered = handler.render(&table).unwrap();
        assert_eq!(handler.parse(&rendered).unwrap(), table);
    }
}
