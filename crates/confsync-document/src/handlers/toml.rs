//! TOML format handler using toml_edit
//!
//! Comments are carried in `toml_edit` decor: as `#` lines in the leaf decor
//! prefix of a key, or in the decor prefix of a table header.

use toml_edit::{ArrayOfTables, DocumentMut, InlineTable, Item};

use crate::error::{Error, Result};
use crate::format::{Format, FormatHandler};
use crate::value::{Table, Value};

/// Handler for TOML files using toml_edit
#[derive(Debug, Default)]
pub struct TomlHandler;

impl TomlHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FormatHandler for TomlHandler {
    fn format(&self) -> Format {
        Format::Toml
    }

    fn parse(&self, source: &str) -> Result<Table> {
        let doc: DocumentMut = source
            .parse()
            .map_err(|e: toml_edit::TomlError| Error::parse(Format::Toml, e.to_string()))?;
        Ok(table_from_toml(doc.as_table()))
    }

    fn render(&self, table: &Table) -> Result<String> {
        let mut doc = DocumentMut::new();
        fill_toml_table(doc.as_table_mut(), table);
        Ok(doc.to_string())
    }
}

fn table_from_toml(source: &toml_edit::Table) -> Table {
    let mut table = Table::new();

    for (key, item) in source.iter() {
        let (value, comment) = match item {
            Item::Value(v) => {
                let comment = source
                    .key(key)
                    .and_then(|k| extract_comment(k.leaf_decor().prefix()));
                (value_from_toml(v), comment)
            }
            Item::Table(t) => (
                Value::Table(table_from_toml(t)),
                extract_comment(t.decor().prefix()),
            ),
            Item::ArrayOfTables(arr) => {
                let comment = arr
                    .iter()
                    .next()
                    .and_then(|t| extract_comment(t.decor().prefix()));
                let items = arr
                    .iter()
                    .map(|t| Value::Table(table_from_toml(t)))
                    .collect();
                (Value::Array(items), comment)
            }
            Item::None => continue,
        };

        table.insert(key, value);
        if let Some(comment) = comment {
            table.set_comment(key, comment);
        }
    }

    table
}

fn value_from_toml(value: &toml_edit::Value) -> Value {
    match value {
        toml_edit::Value::String(s) => Value::String(s.value().clone()),
        toml_edit::Value::Integer(i) => Value::Integer(*i.value()),
        toml_edit::Value::Float(f) => Value::Float(*f.value()),
        toml_edit::Value::Boolean(b) => Value::Bool(*b.value()),
        toml_edit::Value::Datetime(d) => Value::Datetime(d.value().to_string()),
        toml_edit::Value::Array(arr) => Value::Array(arr.iter().map(value_from_toml).collect()),
        toml_edit::Value::InlineTable(t) => Value::Table(
            t.iter()
                .map(|(k, v)| (k.to_string(), value_from_toml(v)))
                .collect(),
        ),
    }
}

fn fill_toml_table(target: &mut toml_edit::Table, source: &Table) {
    for (key, value) in source.iter() {
        let comment = source.comment(key);

        match value {
            Value::Table(sub) => {
                let mut table = toml_edit::Table::new();
                fill_toml_table(&mut table, sub);
                if let Some(text) = comment {
                    table.decor_mut().set_prefix(format!("\n{}", comment_lines(text)));
                }
                target.insert(key, Item::Table(table));
            }
            Value::Array(items) if is_array_of_tables(items) => {
                let mut array = ArrayOfTables::new();
                for (i, item) in items.iter().enumerate() {
                    let mut table = toml_edit::Table::new();
                    if let Value::Table(sub) = item {
                        fill_toml_table(&mut table, sub);
                    }
                    if let (0, Some(text)) = (i, comment) {
                        table.decor_mut().set_prefix(format!("\n{}", comment_lines(text)));
                    }
                    array.push(table);
                }
                target.insert(key, Item::ArrayOfTables(array));
            }
            other => {
                target.insert(key, toml_edit::value(value_to_toml(other)));
                if let (Some(text), Some(mut key_mut)) = (comment, target.key_mut(key)) {
                    key_mut.leaf_decor_mut().set_prefix(comment_lines(text));
                }
            }
        }
    }
}

fn is_array_of_tables(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(|item| matches!(item, Value::Table(_)))
}

fn value_to_toml(value: &Value) -> toml_edit::Value {
    match value {
        Value::Bool(b) => (*b).into(),
        Value::Integer(i) => (*i).into(),
        Value::Float(f) => (*f).into(),
        Value::String(s) => s.as_str().into(),
        Value::Datetime(s) => match s.parse::<toml_edit::Datetime>() {
            Ok(datetime) => datetime.into(),
            Err(_) => s.as_str().into(),
        },
        Value::Array(items) => {
            let mut array = toml_edit::Array::new();
            for item in items {
                array.push(value_to_toml(item));
            }
            toml_edit::Value::Array(array)
        }
        Value::Table(table) => {
            let mut inline = InlineTable::new();
            for (k, v) in table.iter() {
                inline.insert(k, value_to_toml(v));
            }
            toml_edit::Value::InlineTable(inline)
        }
    }
}

fn comment_lines(text: &str) -> String {
    text.lines().map(|line| format!("# {line}\n")).collect()
}

fn extract_comment(raw: Option<&toml_edit::RawString>) -> Option<String> {
    let raw = raw?.as_str()?;
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix('#'))
        .map(|line| line.strip_prefix(' ').unwrap_or(line))
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_key_comment() {
        let mut table = Table::new();
        table.insert("retries", Value::from(3));
        table.set_comment("retries", "How many times to retry");

        let rendered = TomlHandler::new().render(&table).unwrap();
        assert_eq!(rendered, "# How many times to retry\nretries = 3\n");
    }

    #[test]
    fn test_parse_key_comment() {
        let table = TomlHandler::new()
            .parse("# first line\n# second line\nkey = \"value\"\n")
            .unwrap();
        assert_eq!(table.get("key"), Some(&Value::from("value")));
        assert_eq!(table.comment("key"), Some("first line\nsecond line"));
    }

    #[test]
    fn test_table_header_comment_round_trip() {
        let mut network = Table::new();
        network.insert("timeout", Value::from(30));
        let mut table = Table::new();
        table.insert("network", Value::Table(network));
        table.set_comment("network", "Network settings");

        let handler = TomlHandler::new();
        let rendered = handler.render(&table).unwrap();
        assert!(rendered.contains("# Network settings\n[network]"));

        let parsed = handler.parse(&rendered).unwrap();
        assert_eq!(parsed.comment("network"), Some("Network settings"));
        assert_eq!(parsed, table);
    }

    #[test]
    fn test_array_of_tables() {
        let mut first = Table::new();
        first.insert("name", Value::from("a"));
        let mut second = Table::new();
        second.insert("name", Value::from("b"));
        let mut table = Table::new();
        table.insert(
            "categories",
            Value::Array(vec![Value::Table(first), Value::Table(second)]),
        );

        let handler = TomlHandler::new();
        let rendered = handler.render(&table).unwrap();
        assert_eq!(rendered.matches("[[categories]]").count(), 2);
        assert_eq!(handler.parse(&rendered).unwrap(), table);
    }

    #[test]
    fn test_parse_error() {
        let err = TomlHandler::new().parse("key = = value").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_datetime_survives_round_trip() {
        let handler = TomlHandler::new();
        let table = handler.parse("when = 1979-05-27T07:32:00Z\n").unwrap();
        assert_eq!(
            table.get("when"),
            Some(&Value::Datetime("1979-05-27T07:32:00Z".to_string()))
        );
        assert_eq!(handler.render(&table).unwrap(), "when = 1979-05-27T07:32:00Z\n");
    }
}
