//! Configuration of the confdesc tool itself.
//!
//! Read from a TOML file (`confdesc.toml` by default). Every section is
//! optional:
//!
//! ```toml
//! [logging]
//! level = "debug"
//!
//! [logging.overrides]
//! confdesc_schema = "trace"
//!
//! [schema]
//! paths = ["device.toml"]
//!
//! [messages]
//! PATTERN_VIOLATED = "Der Wert {0} entspricht nicht dem Muster {1}."
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::filter::Targets;

use crate::CatalogError;
use crate::MessageCatalog;

pub const DEFAULT_CONFIG_PATH: &str = "confdesc.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub logging: LoggingConfig,
    pub schema: SchemaConfig,
    /// Message templates by message key, replacing the built-in English text
    pub messages: HashMap<String, String>,
}

#[derive(
    Debug,
    Default,
    Deserialize,
    Serialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: LogLevel,

    /// Per-target levels, e.g. `confdesc_schema = "trace"`
    pub overrides: HashMap<String, LogLevel>,
}

impl LoggingConfig {
    /// Filter with `level` as the default and the overrides per target
    pub fn filter(&self, level: Option<LogLevel>) -> Targets {
        Targets::new()
            .with_default(LevelFilter::from(level.unwrap_or(self.level)))
            .with_targets(
                self.overrides
                    .iter()
                    .map(|(target, level)| (target.clone(), LevelFilter::from(*level))),
            )
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    /// Schema files used when none are given on the command line,
    /// relative to the config file
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid message template: {0}")]
    Catalog(#[from] CatalogError),
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let mut config = Self::parse(&content)?;

        // Resolve schema paths against the config file's directory
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.schema.paths = config
            .schema
            .paths
            .into_iter()
            .map(|p| if p.is_absolute() { p } else { base.join(p) })
            .collect();

        Ok(config)
    }

    /// Parse and check a config; message templates must use known keys
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.message_catalog()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise the default file if it exists,
    /// otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn message_catalog(&self) -> Result<MessageCatalog, CatalogError> {
        MessageCatalog::from_templates(&self.messages)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::MessageKey;

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
            [logging]
            level = "debug"

            [logging.overrides]
            confdesc_schema = "trace"

            [schema]
            paths = ["device.toml"]

            [messages]
            REQUIRED_VALUE_MISSING = "{0} fehlt."
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(
            config.logging.overrides.get("confdesc_schema"),
            Some(&LogLevel::Trace)
        );
        assert_eq!(config.schema.paths, vec![PathBuf::from("device.toml")]);

        let catalog = config.message_catalog().unwrap();
        assert_eq!(
            catalog.template(MessageKey::RequiredValueMissing),
            Some("{0} fehlt.")
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.logging.overrides.is_empty());
        assert!(config.schema.paths.is_empty());
        assert!(config.messages.is_empty());
    }

    #[test]
    fn test_unknown_message_key_rejected() {
        let result = Config::parse("[messages]\nNO_SUCH_KEY = \"x\"\n");
        assert!(matches!(result, Err(ConfigError::Catalog(_))));
    }

    #[test]
    fn test_unknown_section_rejected() {
        let result = Config::parse("[system]\nname = \"x\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_schema_paths_relative_to_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("confdesc.toml");
        fs::write(&path, "[schema]\npaths = [\"schemas/device.toml\", \"/abs.toml\"]\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(
            config.schema.paths,
            vec![
                temp_dir.path().join("schemas/device.toml"),
                PathBuf::from("/abs.toml"),
            ]
        );
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let result = Config::load(Some(Path::new("/nonexistent/confdesc.toml")));
        assert!(matches!(result, Err(ConfigError::Io(..))));
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LevelFilter::from(LogLevel::Warn), LevelFilter::WARN);
        assert_eq!(LevelFilter::from(LogLevel::default()), LevelFilter::INFO);
    }
}
