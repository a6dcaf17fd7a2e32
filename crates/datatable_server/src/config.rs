//! Process configuration sourced from environment variables.
//!
//! # Invariants
//! - Read once at startup; nothing re-reads the environment afterwards.
//! - Unset or blank variables fall back to defaults; malformed values are
//!   startup errors.

use datatable_core::default_log_level;
use std::fmt::{Display, Formatter};

pub const DEFAULT_DATABASE_PATH: &str = "datatable.sqlite3";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
/// `DATABASE_PATH` value that selects an in-memory store.
pub const IN_MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort { raw: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPort { raw } => {
                write!(f, "invalid PORT `{raw}`; expected an integer in 0..=65535")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` logs to stderr.
    pub log_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read("DATABASE_PATH") {
            config.database_path = path;
        }
        if let Some(host) = read("HOST") {
            config.host = host;
        }
        if let Some(raw) = read("PORT") {
            config.port = raw.parse().map_err(|_| ConfigError::InvalidPort { raw })?;
        }
        if let Some(level) = read("LOG_LEVEL") {
            config.log_level = level;
        }
        config.log_dir = read("LOG_DIR");
        Ok(config)
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == IN_MEMORY_DATABASE
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ServerConfig, DEFAULT_DATABASE_PATH, DEFAULT_PORT};
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.database_path, DEFAULT_DATABASE_PATH);
        assert_eq!(config.bind_addr(), format!("0.0.0.0:{DEFAULT_PORT}"));
        assert!(!config.is_in_memory());
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn overrides_are_trimmed_and_applied() {
        let config = config_from(&[
            ("DATABASE_PATH", ":memory:"),
            ("HOST", " 127.0.0.1 "),
            ("PORT", "8080"),
            ("LOG_LEVEL", "warn"),
            ("LOG_DIR", "/var/log/datatable"),
        ])
        .unwrap();
        assert!(config.is_in_memory());
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/datatable"));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[("PORT", "  "), ("LOG_DIR", "")]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn invalid_port_is_rejected() {
        for raw in ["http", "70000", "-1"] {
            let err = config_from(&[("PORT", raw)]).unwrap_err();
            assert!(err.to_string().contains(raw));
        }
    }
}
