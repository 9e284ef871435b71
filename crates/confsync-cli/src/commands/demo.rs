//! Bundled example configuration

use std::path::Path;

use confsync_core::{ConfigFile, Configurable, ConvertError, Converter, Value, mapped};
use confsync_document::DocumentStore;

use crate::error::Result;

/// Verbosity of the example application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

/// Stores [`LogLevel`] as its lowercase name
pub struct LogLevelConverter;

impl Converter for LogLevelConverter {
    type Field = Option<LogLevel>;

    fn instantiate() -> std::result::Result<Self, ConvertError> {
        Ok(Self)
    }

    fn to_field(&self, value: Value) -> std::result::Result<Option<LogLevel>, ConvertError> {
        let level = match value.as_str().map(str::to_ascii_lowercase).as_deref() {
            Some("error") => LogLevel::Error,
            Some("warn") => LogLevel::Warn,
            Some("info") => LogLevel::Info,
            Some("debug") => LogLevel::Debug,
            _ => return Err(ConvertError::custom(format!("unknown log level '{value}'"))),
        };
        Ok(Some(level))
    }

    fn to_document(&self, field: &Option<LogLevel>) -> std::result::Result<Option<Value>, ConvertError> {
        Ok(field.map(|level| Value::from(level.as_str())))
    }
}

#[derive(Debug, Default)]
pub struct ExampleConfig {
    pub title: Option<String>,
    pub retries: Option<u32>,
    pub log_level: Option<LogLevel>,
    pub network: Network,
    pub categories: Vec<Category>,
}

#[derive(Debug, Default)]
pub struct Network {
    pub timeout: Option<u32>,
    pub proxy: Proxy,
}

#[derive(Debug, Default)]
pub struct Proxy {
    pub enabled: Option<bool>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Default)]
pub struct Category {
    pub name: Option<String>,
    pub tags: Vec<String>,
    pub weight: Option<i64>,
}

mapped! {
    ExampleConfig {
        title: "title" [default_value = "Example configuration", comment = "Shown in the window title"],
        retries: "retries" [default_value = "3", comment = "How many times to retry"],
        log_level: "log_level" as LogLevelConverter [default_value = "info", comment = "One of error, warn, info, debug"],
        network: "network" [comment = "Network settings"],
        categories: "categories" [comment = "Item categories"],
    }

    Network {
        timeout: "timeout" [default_value = "30", comment = "Seconds before a request is abandoned"],
        proxy: "proxy",
    }

    Proxy {
        enabled: "enabled" [default_value = "false"],
        host: "host" [default_value = "proxy.local", only_if = ".enabled"],
        port: "port" [default_value = "8080", only_if = ".enabled"],
    }

    Category {
        name: "name",
        tags: "tags",
        weight: "weight" [default_value = "1", comment = "Sort weight"],
    }
}

impl Configurable for ExampleConfig {
    fn between_load_and_save(&mut self) {
        if self.categories.is_empty() {
            self.categories = ["general", "archive"]
                .into_iter()
                .map(|name| Category {
                    name: Some(name.to_string()),
                    ..Category::default()
                })
                .collect();
        }
        if let Some(retries) = self.retries.as_mut() {
            *retries = (*retries).min(10);
        }
    }
}

/// Run `load_and_correct` on the example configuration stored at `file`
/// and return the saved document.
pub fn run_demo(file: &Path) -> Result<String> {
    let mut config = ConfigFile::open(file, ExampleConfig::default())?;
    config.load_and_correct()?;

    let format = config.engine().store().format();
    tracing::debug!(
        file = %file.display(),
        hidden = config.ledger().len(),
        "Corrected example configuration"
    );
    Ok(config.document().render(format)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_demo_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("example.toml");

        let rendered = run_demo(&file).unwrap();

        assert!(rendered.starts_with("# Shown in the window title\ntitle = \"Example configuration\"\n"));
        assert!(rendered.contains("# How many times to retry\nretries = 3\n"));
        assert!(rendered.contains("log_level = \"info\""));
        assert_eq!(rendered.matches("[[categories]]").count(), 2);
        assert!(rendered.contains("weight = 1"));
        assert!(!rendered.contains("proxy.local"));
        assert_eq!(fs::read_to_string(&file).unwrap(), rendered);
    }

    #[test]
    fn test_demo_is_stable() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("example.yaml");

        let first = run_demo(&file).unwrap();
        let second = run_demo(&file).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_demo_keeps_user_values() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("example.json");
        fs::write(
            &file,
            r#"{"retries": 50, "log_level": "DEBUG", "network": {"proxy": {"enabled": true}}}"#,
        )
        .unwrap();

        let rendered = run_demo(&file).unwrap();

        assert!(rendered.contains("\"retries\": 10"));
        assert!(rendered.contains("\"log_level\": \"debug\""));
        assert!(rendered.contains("\"host\": \"proxy.local\""));
        assert!(rendered.contains("\"port\": 8080"));
    }

    #[test]
    fn test_demo_rejects_bad_level() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("example.toml");
        fs::write(&file, "log_level = \"loud\"\n").unwrap();

        let err = run_demo(&file).unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }
}
