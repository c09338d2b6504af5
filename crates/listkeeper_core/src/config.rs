//! Process configuration.
//!
//! # Responsibility
//! - Resolve backend choice, database path and logging options at startup.
//!
//! # Invariants
//! - Unset variables fall back to defaults; set but invalid ones are errors.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_BACKEND: &str = "LISTKEEPER_BACKEND";
pub const ENV_DB_PATH: &str = "LISTKEEPER_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "LISTKEEPER_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "LISTKEEPER_LOG_DIR";

/// Which `TodoStore` implementation serves requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendKind {
    Sqlite,
    #[default]
    Memory,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "relational" => Ok(Self::Sqlite),
            "memory" | "session" => Ok(Self::Memory),
            other => Err(ConfigError::InvalidValue {
                key: ENV_BACKEND,
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value `{value}` for {key}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Startup options for the store and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: BackendKind,
    /// Database file for the sqlite backend; `None` means in-memory.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Absolute log directory; `None` leaves file logging off.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Reads `LISTKEEPER_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(value) = read(ENV_BACKEND) {
            config.backend = value.parse()?;
        }
        config.db_path = read(ENV_DB_PATH).map(PathBuf::from);
        if let Some(value) = read(ENV_LOG_LEVEL) {
            config.log_level = value;
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, BackendKind, ConfigError, ENV_BACKEND};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.backend, BackendKind::Memory);
    }

    #[test]
    fn reads_all_known_variables() {
        let config = config_from(&[
            ("LISTKEEPER_BACKEND", " SQLite "),
            ("LISTKEEPER_DB_PATH", "/var/lib/listkeeper/todos.db"),
            ("LISTKEEPER_LOG_LEVEL", "warn"),
            ("LISTKEEPER_LOG_DIR", "/var/log/listkeeper"),
        ])
        .unwrap();
        assert_eq!(config.backend, BackendKind::Sqlite);
        assert_eq!(
            config.db_path,
            Some(PathBuf::from("/var/lib/listkeeper/todos.db"))
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/listkeeper")));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config_from(&[("LISTKEEPER_DB_PATH", "   ")]).unwrap();
        assert_eq!(config.db_path, None);
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = config_from(&[("LISTKEEPER_BACKEND", "redis")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: ENV_BACKEND,
                value: "redis".to_string(),
            }
        );
    }
}
