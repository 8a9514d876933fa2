use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt as tracing_fmt;
use tracing_subscriber::prelude::*;

use compound_fields::{DeclError, Schema, SchemaDecl};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Server {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub schemas: Vec<SchemaDecl>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Schema error: {0}")]
    Decl(#[from] DeclError),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Failed to setup logging: {0}")]
    LoggingSetup(#[from] ParseError),
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.schemas.is_empty() {
            return Err(ConfigError::Validation(
                "at least one schema must be declared".to_string(),
            ));
        }

        let mut seen = BTreeSet::new();
        for schema in &self.schemas {
            if schema.name.is_empty() {
                return Err(ConfigError::Validation(
                    "schema name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(schema.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "schema '{}' is declared more than once",
                    schema.name
                )));
            }
        }

        Ok(())
    }

    pub fn build_schemas(&self) -> Result<BTreeMap<String, Schema>, ConfigError> {
        self.schemas
            .iter()
            .map(|decl| Ok((decl.name.clone(), decl.build()?)))
            .collect()
    }

    pub fn init_logger(&self) -> Result<(), ConfigError> {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(&self.logging.level)?,
        };

        let registry = tracing_subscriber::registry().with(env_filter);

        match self.logging.format {
            LogFormat::Text => {
                registry.with(tracing_fmt::layer()).init();
            }
            LogFormat::Json => {
                registry.with(tracing_fmt::layer().json()).init();
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file
    }

    #[test]
    fn test_config_load_valid_file() {
        let temp_file = write_config(
            r#"
[server]
bind = "0.0.0.0:9000"

[logging]
level = "debug"
format = "json"

[[schemas]]
name = "event"

[[schemas.fields]]
name = "tags"
type = "char"
shape = "list-or-item"
max_length = 5
"#,
        );

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.server.bind.port(), 9000);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.schemas.len(), 1);

        let schemas = config.build_schemas().unwrap();
        assert!(schemas.contains_key("event"));
    }

    #[test]
    fn test_config_defaults() {
        let temp_file = write_config(
            r#"
[[schemas]]
name = "empty"
"#,
        );

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.server.bind, default_bind());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_config_missing_file() {
        let result = Config::load("/nonexistent/fields-server.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_config_invalid_toml() {
        let temp_file = write_config("schemas = 3");
        assert!(matches!(
            Config::load(temp_file.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_config_requires_schemas() {
        let temp_file = write_config("[server]\nbind = \"127.0.0.1:1\"\n");
        let err = Config::load(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("at least one schema"));
    }

    #[test]
    fn test_config_duplicate_schema_names() {
        let temp_file = write_config(
            r#"
[[schemas]]
name = "a"

[[schemas]]
name = "a"
"#,
        );
        let err = Config::load(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_build_schemas_reports_decl_errors() {
        let temp_file = write_config(
            r#"
[[schemas]]
name = "bad"

[[schemas.fields]]
name = "count"
type = "integer"
format = "%Y"
"#,
        );
        let config = Config::load(temp_file.path()).unwrap();
        assert!(matches!(
            config.build_schemas(),
            Err(ConfigError::Decl(DeclError::InapplicableOption { .. }))
        ));
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = Config::default();
        let toml_string = toml::to_string(&config).unwrap();
        assert!(toml_string.contains("bind = \"127.0.0.1:8080\""));
        let deserialized: Config = toml::from_str(&toml_string).unwrap();
        assert_eq!(deserialized.server.bind, config.server.bind);
        assert_eq!(deserialized.logging.format, config.logging.format);
    }
}
