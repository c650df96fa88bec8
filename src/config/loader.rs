//! Configuration loading utilities
//!
//! Environment overrides use the `INTIME_ACCESS_` prefix. A `.env` file in the working
//! directory is read first when present.

use super::models::*;
use crate::core::models::OwnershipFilter;
use crate::utils::error::{AccessError, Result};
use std::env;
use tracing::debug;

const PREFIX: &str = "INTIME_ACCESS_";

impl AccessConfig {
    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment variables");

        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment file {:?}", path);
        }

        let mut config = Self::default();

        // Policy
        if let Some(roles) = var("ADMIN_ROLES") {
            config.policy.admin_roles = split_list(&roles);
        }
        if let Some(roles) = var("MANAGER_ROLES") {
            config.policy.manager_roles = split_list(&roles);
        }
        if let Some(roles) = var("READ_ONLY_ROLES") {
            config.policy.read_only_roles = split_list(&roles);
        }
        if let Some(mode) = var("DEFAULT_MODE") {
            config.policy.default_mode = mode
                .parse::<OwnershipFilter>()
                .map_err(|e| AccessError::configuration(format!("Invalid default mode: {}", e)))?;
        }
        if let Some(prune) = var("PRUNE_CONSULTED_CLAUSE") {
            config.policy.prune_consulted_clause = parse_bool("PRUNE_CONSULTED_CLAUSE", &prune)?;
        }

        // Hierarchy
        if let Some(shared) = var("SHARED_HIERARCHY_CACHE") {
            config.hierarchy.shared_cache = parse_bool("SHARED_HIERARCHY_CACHE", &shared)?;
        }
        if let Some(ttl) = var("SHARED_HIERARCHY_CACHE_TTL") {
            config.hierarchy.shared_cache_ttl_secs = ttl.parse().map_err(|e| {
                AccessError::configuration(format!("Invalid hierarchy cache TTL: {}", e))
            })?;
        }

        // Database
        if let Some(url) = var("DATABASE_URL") {
            config.database.url = url;
            config.database.enabled = true;
        }
        if let Some(max) = var("DATABASE_MAX_CONNECTIONS") {
            config.database.max_connections = max.parse().map_err(|e| {
                AccessError::configuration(format!("Invalid max connections: {}", e))
            })?;
        }

        // Logging
        if let Some(level) = var("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(json) = var("LOG_JSON") {
            config.logging.json = parse_bool("LOG_JSON", &json)?;
        }

        Ok(config)
    }
}

fn var(name: &str) -> Option<String> {
    env::var(format!("{}{}", PREFIX, name))
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AccessError::configuration(format!(
            "Invalid boolean for {}{}: '{}'",
            PREFIX, name, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(" admin, super_admin ,,"),
            vec!["admin".to_string(), "super_admin".to_string()]
        );
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("LOG_JSON", "TRUE").unwrap());
        assert!(!parse_bool("LOG_JSON", "off").unwrap());
        assert!(parse_bool("LOG_JSON", "maybe").is_err());
    }
}
