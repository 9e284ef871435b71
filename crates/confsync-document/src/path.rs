//! Path parsing and traversal utilities
//!
//! This module provides utilities for navigating and modifying document
//! trees using dot-separated paths with array indexing support.
//!
//! # Path Syntax
//!
//! - Dot-separated keys: `network.proxy.port`
//! - Array indexing: `servers[0].host`
//!
//! # Examples
//!
//! ```
//! use confsync_document::path::{parse_path, PathSegment, get_at_path};
//! use confsync_document::{Table, Value};
//!
//! let path = parse_path("servers[0].host");
//! assert_eq!(path, vec![
//!     PathSegment::Key("servers".to_string()),
//!     PathSegment::Index(0),
//!     PathSegment::Key("host".to_string()),
//! ]);
//!
//! let mut server = Table::new();
//! server.insert("host", Value::from("localhost"));
//! let mut root = Table::new();
//! root.insert("servers", Value::Array(vec![Value::Table(server)]));
//! assert_eq!(get_at_path(&root, &path), Some(&Value::from("localhost")));
//! ```

use crate::value::{Table, Value};

/// A segment of a path - either a key or an array index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A key in a table (e.g., "proxy" in "network.proxy")
    Key(String),
    /// An index in an array (e.g., 0 in `servers[0]`)
    Index(usize),
}

/// Parse a path string into segments.
///
/// Empty keys (from `a..b` or a leading dot) are skipped, and an index that
/// is not a number is dropped.
pub fn parse_path(path: &str) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    let mut current_key = String::new();
    let mut chars = path.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '.' => {
                if !current_key.is_empty() {
                    segments.push(PathSegment::Key(std::mem::take(&mut current_key)));
                }
            }
            '[' => {
                if !current_key.is_empty() {
                    segments.push(PathSegment::Key(std::mem::take(&mut current_key)));
                }
                let mut index_str = String::new();
                for ch in chars.by_ref() {
                    if ch == ']' {
                        break;
                    }
                    index_str.push(ch);
                }
                if let Ok(index) = index_str.trim().parse::<usize>() {
                    segments.push(PathSegment::Index(index));
                }
            }
            _ => current_key.push(ch),
        }
    }

    if !current_key.is_empty() {
        segments.push(PathSegment::Key(current_key));
    }

    segments
}

/// Get a value at the given path.
///
/// Returns `None` if the path doesn't exist or is empty.
pub fn get_at_path<'a>(root: &'a Table, segments: &[PathSegment]) -> Option<&'a Value> {
    let (first, rest) = segments.split_first()?;
    let PathSegment::Key(key) = first else {
        return None;
    };

    let mut current = root.get(key)?;
    for segment in rest {
        current = match (segment, current) {
            (PathSegment::Key(key), Value::Table(table)) => table.get(key)?,
            (PathSegment::Index(idx), Value::Array(items)) => items.get(*idx)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Set a value at the given path.
///
/// Missing intermediate keys are created as tables. Returns `false` when an
/// intermediate value is not a container, or an index is out of range.
/// An index equal to the array length appends.
pub fn set_at_path(root: &mut Table, segments: &[PathSegment], new_value: Value) -> bool {
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };

    match (parent_mut(root, parents, true), last) {
        (Some(Parent::Table(table)), PathSegment::Key(key)) => {
            table.insert(key.clone(), new_value);
            true
        }
        (Some(Parent::Array(items)), PathSegment::Index(idx)) => {
            if *idx < items.len() {
                items[*idx] = new_value;
                true
            } else if *idx == items.len() {
                items.push(new_value);
                true
            } else {
                false
            }
        }
        _ => false,
    }
}

/// Remove a value at the given path.
///
/// Returns the removed value if the path existed, `None` otherwise.
pub fn remove_at_path(root: &mut Table, segments: &[PathSegment]) -> Option<Value> {
    let (last, parents) = segments.split_last()?;

    match (parent_mut(root, parents, false)?, last) {
        (Parent::Table(table), PathSegment::Key(key)) => table.remove(key),
        (Parent::Array(items), PathSegment::Index(idx)) if *idx < items.len() => {
            Some(items.remove(*idx))
        }
        _ => None,
    }
}

/// Get the comment attached to the key at the given path.
pub fn comment_at_path<'a>(root: &'a Table, segments: &[PathSegment]) -> Option<&'a str> {
    let (last, parents) = segments.split_last()?;
    let PathSegment::Key(key) = last else {
        return None;
    };

    let parent = if parents.is_empty() {
        root
    } else {
        get_at_path(root, parents)?.as_table()?
    };
    parent.comment(key)
}

/// Attach a comment to the key at the given path.
///
/// The key's parent table must exist; the key itself need not. Returns
/// `false` if the comment could not be attached.
pub fn set_comment_at_path(root: &mut Table, segments: &[PathSegment], text: &str) -> bool {
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };

    match (parent_mut(root, parents, false), last) {
        (Some(Parent::Table(table)), PathSegment::Key(key)) => {
            table.set_comment(key.clone(), text);
            true
        }
        _ => false,
    }
}

enum Parent<'a> {
    Table(&'a mut Table),
    Array(&'a mut Vec<Value>),
}

fn parent_mut<'a>(root: &'a mut Table, segments: &[PathSegment], create: bool) -> Option<Parent<'a>> {
    let mut parent = Parent::Table(root);

    for segment in segments {
        let next = match (parent, segment) {
            (Parent::Table(table), PathSegment::Key(key)) => {
                if create && !table.contains_key(key) {
                    table.insert(key.clone(), Value::Table(Table::new()));
                }
                table.get_mut(key)?
            }
            (Parent::Array(items), PathSegment::Index(idx)) => items.get_mut(*idx)?,
            _ => return None,
        };

        parent = match next {
            Value::Table(table) => Parent::Table(table),
            Value::Array(items) => Parent::Array(items),
            _ => return None,
        };
    }

    Some(parent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Table {
        let mut first = Table::new();
        first.insert("name", Value::from("first"));
        let mut second = Table::new();
        second.insert("name", Value::from("second"));

        let mut database = Table::new();
        database.insert("host", Value::from("localhost"));

        let mut config = Table::new();
        config.insert("database", Value::Table(database));

        let mut root = Table::new();
        root.insert("config", Value::Table(config));
        root.insert(
            "items",
            Value::Array(vec![Value::Table(first), Value::Table(second)]),
        );
        root
    }

    #[test]
    fn test_parse_path_simple() {
        let path = parse_path("name");
        assert_eq!(path, vec![PathSegment::Key("name".to_string())]);
    }

    #[test]
    fn test_parse_path_dotted() {
        let path = parse_path("config.database.host");
        assert_eq!(
            path,
            vec![
                PathSegment::Key("config".to_string()),
                PathSegment::Key("database".to_string()),
                PathSegment::Key("host".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_path_mixed() {
        let path = parse_path("items[0].name");
        assert_eq!(
            path,
            vec![
                PathSegment::Key("items".to_string()),
                PathSegment::Index(0),
                PathSegment::Key("name".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_path_trailing_dot() {
        assert_eq!(parse_path("network."), parse_path("network"));
    }

    #[test]
    fn test_get_at_path_nested() {
        let root = sample();
        let path = parse_path("config.database.host");
        assert_eq!(get_at_path(&root, &path), Some(&Value::from("localhost")));
    }

    #[test]
    fn test_get_at_path_array() {
        let root = sample();
        assert_eq!(
            get_at_path(&root, &parse_path("items[1].name")),
            Some(&Value::from("second"))
        );
        assert_eq!(get_at_path(&root, &parse_path("items[2].name")), None);
    }

    #[test]
    fn test_set_at_path_creates_tables() {
        let mut root = Table::new();
        assert!(set_at_path(&mut root, &parse_path("a.b.c"), Value::from(1)));
        assert_eq!(
            get_at_path(&root, &parse_path("a.b.c")),
            Some(&Value::Integer(1))
        );
    }

    #[test]
    fn test_set_at_path_through_scalar_fails() {
        let mut root = Table::new();
        root.insert("a", Value::from(1));
        assert!(!set_at_path(&mut root, &parse_path("a.b"), Value::from(2)));
    }

    #[test]
    fn test_set_at_path_array_element() {
        let mut root = sample();
        assert!(set_at_path(
            &mut root,
            &parse_path("items[0].name"),
            Value::from("renamed")
        ));
        assert_eq!(
            get_at_path(&root, &parse_path("items[0].name")),
            Some(&Value::from("renamed"))
        );
        assert!(!set_at_path(&mut root, &parse_path("items[5].name"), Value::from("x")));
    }

    #[test]
    fn test_remove_at_path() {
        let mut root = sample();
        let removed = remove_at_path(&mut root, &parse_path("config.database.host"));
        assert_eq!(removed, Some(Value::from("localhost")));
        assert_eq!(get_at_path(&root, &parse_path("config.database.host")), None);
        assert!(get_at_path(&root, &parse_path("config.database")).is_some());
    }

    #[test]
    fn test_comment_at_path() {
        let mut root = sample();
        assert!(set_comment_at_path(
            &mut root,
            &parse_path("config.database"),
            "Connection settings"
        ));
        assert_eq!(
            comment_at_path(&root, &parse_path("config.database")),
            Some("Connection settings")
        );
        assert!(!set_comment_at_path(&mut root, &parse_path("missing.key"), "x"));
    }
}
