//! Server configuration: defaults, then an optional YAML file, then
//! `BLOOMBUHAY_*` environment variables.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::DEFAULT_SESSION_TTL_HOURS;

pub const CONFIG_PATH_VAR: &str = "BLOOMBUHAY_CONFIG";
pub const BIND_ADDR_VAR: &str = "BLOOMBUHAY_BIND_ADDR";
pub const DATABASE_URL_VAR: &str = "BLOOMBUHAY_DATABASE_URL";
pub const CORS_ORIGIN_VAR: &str = "BLOOMBUHAY_CORS_ORIGIN";
pub const LOG_FILTER_VAR: &str = "BLOOMBUHAY_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub cors_origin: String,
    pub log_filter: String,
    /// Lifetime of a login session. YAML only.
    pub session_ttl_hours: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            database_url: "sqlite:bloombuhay.db".to_string(),
            cors_origin: "http://localhost:8080".to_string(),
            log_filter: "info".to_string(),
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
        }
    }
}

impl Config {
    /// Loads the process configuration.
    pub fn load() -> Result<Self> {
        let yaml = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Some(read_config_file(Path::new(&path))?),
            Err(_) => None,
        };
        Self::from_sources(yaml.as_deref(), |key| std::env::var(key).ok())
    }

    /// Builds a config from YAML text and an environment lookup.
    pub fn from_sources<F>(yaml: Option<&str>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match yaml {
            Some(text) => serde_yaml::from_str(text).context("Invalid configuration file")?,
            None => Config::default(),
        };

        let overrides: [(&str, &mut String); 4] = [
            (BIND_ADDR_VAR, &mut config.bind_addr),
            (DATABASE_URL_VAR, &mut config.database_url),
            (CORS_ORIGIN_VAR, &mut config.cors_origin),
            (LOG_FILTER_VAR, &mut config.log_filter),
        ];
        for (key, target) in overrides {
            if let Some(value) = env(key).filter(|v| !v.trim().is_empty()) {
                debug!("{} overrides configuration", key);
                *target = value;
            }
        }

        Ok(config)
    }
}

fn read_config_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_sources(None, env(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
    }

    #[test]
    fn test_yaml_then_env() {
        let yaml = "database_url: sqlite:/var/lib/bloombuhay.db\nlog_filter: debug\nsession_ttl_hours: 12\n";
        let config = Config::from_sources(
            Some(yaml),
            env(&[(LOG_FILTER_VAR, "warn"), (BIND_ADDR_VAR, "")]),
        )
        .unwrap();

        assert_eq!(config.database_url, "sqlite:/var/lib/bloombuhay.db");
        assert_eq!(config.log_filter, "warn");
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.cors_origin, "http://localhost:8080");
        assert_eq!(config.session_ttl_hours, 12);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(Config::from_sources(Some("bind_addr: [1, 2"), env(&[])).is_err());
    }

    #[test]
    fn test_config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bloombuhay.yaml");
        std::fs::write(&path, "cors_origin: http://localhost:5173\n").unwrap();

        let text = read_config_file(&path).unwrap();
        let config = Config::from_sources(Some(&text), env(&[])).unwrap();
        assert_eq!(config.cors_origin, "http://localhost:5173");
    }
}
