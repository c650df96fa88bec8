//! Access configuration validators
//!
//! Validation implementations for AccessConfig, PolicyConfig, HierarchyConfig and the
//! entity registry.

use super::trait_def::Validate;
use crate::config::models::*;
use crate::core::models::UserRole;
use std::collections::HashSet;
use tracing::debug;

impl Validate for AccessConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating access configuration");

        self.policy.validate()?;
        self.hierarchy.validate()?;
        self.database.validate()?;
        self.logging.validate()?;

        if self.entities.is_empty() {
            return Err("At least one entity type must be registered".to_string());
        }

        let mut seen = HashSet::new();
        for entity in &self.entities {
            entity.validate()?;
            if !seen.insert(entity.name.as_str()) {
                return Err(format!("Entity type '{}' is registered twice", entity.name));
            }
        }

        Ok(())
    }
}

impl Validate for PolicyConfig {
    fn validate(&self) -> Result<(), String> {
        if self.admin_roles.is_empty() {
            return Err("At least one admin role must be configured".to_string());
        }

        for (field, roles) in [
            ("admin_roles", &self.admin_roles),
            ("manager_roles", &self.manager_roles),
            ("read_only_roles", &self.read_only_roles),
        ] {
            for role in roles {
                role.parse::<UserRole>()
                    .map_err(|_| format!("Unknown role '{}' in policy.{}", role, field))?;
            }
        }

        if let Some(role) = self
            .admin_roles
            .iter()
            .find(|role| self.read_only_roles.contains(role))
        {
            return Err(format!(
                "Role '{}' cannot be both an admin role and read-only",
                role
            ));
        }

        Ok(())
    }
}

impl Validate for HierarchyConfig {
    fn validate(&self) -> Result<(), String> {
        if self.shared_cache {
            if self.shared_cache_ttl_secs == 0 {
                return Err("Shared hierarchy cache TTL must be greater than 0".to_string());
            }
            if self.shared_cache_capacity == 0 {
                return Err("Shared hierarchy cache capacity must be greater than 0".to_string());
            }
        }
        Ok(())
    }
}

impl Validate for EntityConfig {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Entity name cannot be empty".to_string());
        }

        for (field, value) in [
            ("table", &self.table),
            ("id_column", &self.id_column),
            ("organization_column", &self.organization_column),
            ("owner_column", &self.owner_column),
            ("deleted_column", &self.deleted_column),
        ] {
            if !is_sql_identifier(value) {
                return Err(format!(
                    "Entity '{}' has invalid {}: '{}'",
                    self.name, field, value
                ));
            }
        }

        Ok(())
    }
}

/// Plain lowercase SQL identifier: letters, digits and underscores, not starting with a digit
fn is_sql_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return false,
    }
    value.len() <= 63
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
