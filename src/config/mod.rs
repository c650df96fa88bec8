//! Configuration management for the access layer
//!
//! This module handles loading, validation, and management of the policy, hierarchy,
//! storage, logging and entity registry settings.

pub mod loader;
pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{AccessError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Access configuration
    pub access: AccessConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            AccessError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let access: AccessConfig = serde_yaml::from_str(&content)
            .map_err(|e| AccessError::configuration(format!("Failed to parse config: {}", e)))?;

        let config = Self { access };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let access = AccessConfig::from_env()?;
        let config = Self { access };

        config.validate()?;
        Ok(config)
    }

    /// Get policy configuration
    pub fn policy(&self) -> &PolicyConfig {
        &self.access.policy
    }

    /// Get hierarchy configuration
    pub fn hierarchy(&self) -> &HierarchyConfig {
        &self.access.hierarchy
    }

    /// Get database configuration
    pub fn database(&self) -> &DatabaseConfig {
        &self.access.database
    }

    /// Get logging configuration
    pub fn logging(&self) -> &LoggingConfig {
        &self.access.logging
    }

    /// Registry of the configured entity types
    pub fn registry(&self) -> EntityRegistry {
        self.access.registry()
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.access
            .validate()
            .map_err(|e| AccessError::configuration(format!("Access config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        self.access = self.access.merge(other.access);
        self
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.access).map_err(|e| {
            AccessError::configuration(format!("Failed to serialize config to JSON: {}", e))
        })
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.access).map_err(|e| {
            AccessError::configuration(format!("Failed to serialize config to YAML: {}", e))
        })
    }
}
