//! Format handlers

mod json;
mod toml;
mod yaml;

pub use self::json::JsonHandler;
pub use self::toml::TomlHandler;
pub use self::yaml::YamlHandler;
