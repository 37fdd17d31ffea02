//! Registry configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! namespace = "@app"
//! ```
//!
//! or from the `TYPEIX_METADATA_NAMESPACE` environment variable.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::DEFAULT_NAMESPACE;

/// Environment variable overriding the metadata key namespace
pub const NAMESPACE_ENV: &str = "TYPEIX_METADATA_NAMESPACE";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Namespace is empty or contains a separator
    #[error("Invalid namespace: {0:?}")]
    InvalidNamespace(String),
}

/// Registry settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Prefix of every derived metadata key (default: "@typeix")
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
        }
    }
}

impl RegistryConfig {
    /// Configuration with a custom namespace
    pub fn with_namespace(namespace: impl Into<String>) -> Result<Self, ConfigError> {
        let config = Self {
            namespace: namespace.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse from a TOML string
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Defaults, with the namespace taken from the environment when set
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(NAMESPACE_ENV) {
            Ok(namespace) => Self::with_namespace(namespace),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Check the namespace can prefix metadata keys
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace.is_empty() || self.namespace.contains(':') {
            return Err(ConfigError::InvalidNamespace(self.namespace.clone()));
        }
        Ok(())
    }
}
