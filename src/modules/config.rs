use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::{DEFAULT_API_URL, DEFAULT_LOG_FILE, DEFAULT_SESSION_FILE, DEFAULT_TIMEOUT_SECS};

pub const API_URL_ENV: &str = "INTERNLINK_API_URL";
pub const TIMEOUT_ENV: &str = "INTERNLINK_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Client configuration, layered as defaults < config file < environment < CLI flags
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub session_file: PathBuf,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    /// Load configuration from an optional JSON file, then apply environment overrides.
    ///
    /// A missing file is not an error when no explicit path was given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(TIMEOUT_ENV).ok(),
        )?;
        Ok(config)
    }

    /// Read a config file; unspecified keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply string overrides (from the environment or the command line)
    pub fn apply_overrides(
        &mut self,
        api_url: Option<String>,
        timeout_secs: Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        if let Some(raw) = timeout_secs {
            self.request_timeout_secs = match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "request timeout",
                        value: raw,
                    })
                }
            };
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:5000");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.session_file, PathBuf::from("session.json"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"api_url": "https://portal.example.org"}}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.api_url, "https://portal.example.org");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.log_file, PathBuf::from("internlink.log"));
    }

    #[test]
    fn test_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            Config::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));

        let missing = PathBuf::from("/definitely/not/here/internlink.json");
        assert!(matches!(
            Config::from_file(&missing),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(Some("http://10.0.0.2:8000".to_string()), Some("3".to_string()))
            .unwrap();
        assert_eq!(config.api_url, "http://10.0.0.2:8000");
        assert_eq!(config.request_timeout_secs, 3);

        // Blank URL is ignored
        config.apply_overrides(Some("  ".to_string()), None).unwrap();
        assert_eq!(config.api_url, "http://10.0.0.2:8000");

        // Zero or garbage timeouts are rejected and leave the value untouched
        assert!(config.apply_overrides(None, Some("0".to_string())).is_err());
        assert!(config.apply_overrides(None, Some("soon".to_string())).is_err());
        assert_eq!(config.request_timeout_secs, 3);
    }
}
