//! Ingestion configuration.
//!
//! Configuration is loaded from environment variables with defaults
//! suitable for local development.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default logo ceiling: 1 MiB.
pub const DEFAULT_MAX_LOGO_BYTES: usize = 1024 * 1024;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Logo ingestion configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Maximum accepted payload size in bytes.
    pub max_logo_bytes: usize,

    /// Prefix of every generated object key.
    pub key_prefix: String,

    /// Base URL objects are publicly served from, if any.
    pub public_base_url: Option<String>,

    /// Whether the payload must start with the declared format's magic bytes.
    pub verify_signature: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_logo_bytes: DEFAULT_MAX_LOGO_BYTES,
            key_prefix: "organizations".to_string(),
            public_base_url: None,
            verify_signature: true,
        }
    }
}

impl IngestConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `LOGO_MAX_BYTES`: Payload ceiling in bytes (default: 1048576)
    /// - `LOGO_KEY_PREFIX`: Object key prefix (default: organizations)
    /// - `LOGO_PUBLIC_BASE_URL`: Public base URL for stored logos
    /// - `LOGO_VERIFY_SIGNATURE`: Check magic bytes (default: true)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            max_logo_bytes: std::env::var("LOGO_MAX_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.max_logo_bytes),
            key_prefix: std::env::var("LOGO_KEY_PREFIX").unwrap_or(default.key_prefix),
            public_base_url: std::env::var("LOGO_PUBLIC_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            verify_signature: std::env::var("LOGO_VERIFY_SIGNATURE")
                .map(|s| s != "false" && s != "0")
                .unwrap_or(default.verify_signature),
        }
    }

    /// Set the payload ceiling.
    pub fn with_max_logo_bytes(mut self, max: usize) -> Self {
        self.max_logo_bytes = max;
        self
    }

    /// Set the public base URL.
    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = Some(url.into());
        self
    }

    /// Enable or disable magic-byte verification.
    pub fn with_signature_check(mut self, verify: bool) -> Self {
        self.verify_signature = verify;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_logo_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_logo_bytes".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.key_prefix.trim_matches('/').is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "key_prefix".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Public URL for an object key, when a base URL is configured.
    pub fn public_url(&self, key: &str) -> Option<String> {
        self.public_base_url
            .as_ref()
            .map(|base| format!("{}/{}", base.trim_end_matches('/'), key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IngestConfig::default();
        assert_eq!(config.max_logo_bytes, 1024 * 1024);
        assert_eq!(config.key_prefix, "organizations");
        assert!(config.verify_signature);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_ceiling() {
        let config = IngestConfig::default().with_max_logo_bytes(0);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "max_logo_bytes"));
    }

    #[test]
    fn test_validate_rejects_empty_prefix() {
        let config = IngestConfig {
            key_prefix: "/".to_string(),
            ..IngestConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_public_url() {
        let config = IngestConfig::default();
        assert_eq!(config.public_url("a/b.png"), None);

        let config = config.with_public_base_url("https://cdn.example.com/");
        assert_eq!(
            config.public_url("a/b.png").as_deref(),
            Some("https://cdn.example.com/a/b.png")
        );
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = IngestConfig::default().with_max_logo_bytes(2048);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: IngestConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
