//! Server configuration
//!
//! Loaded from an optional TOML file. Provider credentials never live here;
//! they are read from the environment on each request.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Listen address
    pub addr: SocketAddr,

    /// Route serving the essay endpoint
    pub essay_path: String,

    /// Provider call settings
    pub provider: ProviderConfig,
}

/// Provider call settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    /// Upper bound for one provider call, written as `timeout_secs`
    #[serde(rename = "timeout_secs", with = "serde_duration")]
    pub timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: ([127, 0, 0, 1], 3000).into(),
            essay_path: "/api/essay".to_string(),
            provider: ProviderConfig::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
        }
    }
}

// Custom serde module for Duration (serialize/deserialize as seconds)
mod serde_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl ServerConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.essay_path.starts_with('/') || self.essay_path.len() < 2 {
            return Err(ConfigError::ValidationError(format!(
                "essay_path must be an absolute route, got '{}'",
                self.essay_path
            )));
        }

        if self.essay_path == "/health" {
            return Err(ConfigError::ValidationError(
                "essay_path cannot shadow /health".to_string(),
            ));
        }

        if self.provider.timeout.is_zero() || self.provider.timeout > Duration::from_secs(600) {
            return Err(ConfigError::ValidationError(
                "provider.timeout_secs must be between 1 and 600 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.essay_path, "/api/essay");
        assert_eq!(config.provider.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ServerConfig::from_toml("addr = \"0.0.0.0:8080\"").unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.essay_path, "/api/essay");
    }

    #[test]
    fn test_validate_timeout_zero() {
        let result = ServerConfig::from_toml("[provider]\ntimeout_secs = 0\n");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("provider.timeout_secs must be between 1 and 600 seconds"));
    }

    #[test]
    fn test_validate_empty_path() {
        let mut config = ServerConfig::default();
        config.essay_path = "/".to_string();
        assert!(config.validate().is_err());

        config.essay_path = "essay".to_string();
        assert!(config.validate().is_err());

        config.essay_path = "/health".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "addr = \"127.0.0.1:4100\"\nessay_path = \"/essay\"\n\n[provider]\ntimeout_secs = 30"
        )
        .unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.addr.port(), 4100);
        assert_eq!(config.essay_path, "/essay");
        assert_eq!(config.provider.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_timeout_secs_key() {
        let config = ServerConfig::from_toml("[provider]\ntimeout_secs = 5\n").unwrap();
        assert_eq!(config.provider.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result = ServerConfig::from_toml("[provider]\ntimeout = 5\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));

        let result = ServerConfig::from_toml("essay_pth = \"/essay\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_parse_error() {
        let result = ServerConfig::from_toml("addr = 12");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
