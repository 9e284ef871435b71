//! Direct document access: get, set and convert

use std::path::Path;

use confsync_document::{DocumentStore, FileDocument, MissingFile, Value};

use crate::error::{CliError, Result};

/// Read the value at `path` from an existing file
pub fn run_get(file: &Path, path: &str) -> Result<Value> {
    let mut store = FileDocument::open(file)?.missing_file(MissingFile::Error);
    store.load()?;

    store
        .get(path)
        .cloned()
        .ok_or_else(|| CliError::user(format!("No value at '{path}' in {}", file.display())))
}

/// Set the value at `path`, creating the file when it does not exist
pub fn run_set(file: &Path, path: &str, raw: &str) -> Result<()> {
    let mut store = FileDocument::open(file)?;
    store.load()?;
    store.set(path, parse_scalar(raw))?;
    store.save()?;

    tracing::debug!(file = %file.display(), path, "Updated value");
    Ok(())
}

/// Copy a document into another file, converting between formats
pub fn run_convert(input: &Path, output: &Path) -> Result<()> {
    let mut source = FileDocument::open(input)?.missing_file(MissingFile::Error);
    source.load()?;

    let mut target = FileDocument::open(output)?;
    *target.document_mut() = source.document().clone();
    target.save()?;

    tracing::debug!(
        from = %source.format(),
        to = %target.format(),
        "Converted document"
    );
    Ok(())
}

/// Interpret command-line text as the narrowest matching value
fn parse_scalar(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Integer(i);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() => Value::Float(f),
        _ => Value::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    #[rstest]
    #[case("true", Value::Bool(true))]
    #[case("42", Value::Integer(42))]
    #[case("-7", Value::Integer(-7))]
    #[case("2.5", Value::Float(2.5))]
    #[case("inf", Value::from("inf"))]
    #[case("localhost", Value::from("localhost"))]
    fn test_parse_scalar(#[case] raw: &str, #[case] expected: Value) {
        assert_eq!(parse_scalar(raw), expected);
    }

    #[test]
    fn test_set_then_get() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("app.toml");

        run_set(&file, "network.timeout", "45").unwrap();
        run_set(&file, "title", "demo").unwrap();

        assert_eq!(run_get(&file, "network.timeout").unwrap(), Value::Integer(45));
        assert_eq!(run_get(&file, "title").unwrap(), Value::from("demo"));
    }

    #[test]
    fn test_get_missing_key() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("app.json");
        fs::write(&file, "{\"a\": 1}").unwrap();

        let err = run_get(&file, "b").unwrap_err();
        assert!(matches!(err, CliError::User { .. }));
    }

    #[test]
    fn test_get_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = run_get(&temp.path().join("absent.toml"), "a").unwrap_err();
        assert!(matches!(err, CliError::Document(_)));
    }

    #[test]
    fn test_convert_toml_to_yaml() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("app.toml");
        let output = temp.path().join("app.yaml");
        fs::write(&input, "retries = 3\n\n[network]\ntimeout = 30\n").unwrap();

        run_convert(&input, &output).unwrap();

        assert_eq!(run_get(&output, "network.timeout").unwrap(), Value::Integer(30));
        assert_eq!(run_get(&output, "retries").unwrap(), Value::Integer(3));
    }
}
