//! Entity registry configuration

use crate::core::models::EntityType;
use crate::utils::error::{AccessError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::error;

/// Storage layout of one ownership-scoped entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityConfig {
    /// Entity type name used by callers (`job`, `deal`, ...)
    pub name: String,
    /// Table holding the records
    pub table: String,
    /// Primary key column
    #[serde(default = "default_id_column")]
    pub id_column: String,
    /// Tenant column
    #[serde(default = "default_organization_column")]
    pub organization_column: String,
    /// Primary owner column
    #[serde(default = "default_owner_column")]
    pub owner_column: String,
    /// Soft-delete marker column
    #[serde(default = "default_deleted_column")]
    pub deleted_column: String,
}

impl EntityConfig {
    /// Entity stored in `table` with the conventional column names
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            id_column: default_id_column(),
            organization_column: default_organization_column(),
            owner_column: default_owner_column(),
            deleted_column: default_deleted_column(),
        }
    }

    /// The entity type this entry registers
    pub fn entity_type(&self) -> EntityType {
        EntityType::new(self.name.clone())
    }
}

/// Lookup table of registered entity types
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entries: HashMap<String, EntityConfig>,
}

impl EntityRegistry {
    /// Build a registry; later duplicates replace earlier ones
    pub fn new(entities: &[EntityConfig]) -> Self {
        let entries = entities
            .iter()
            .map(|entity| (entity.name.clone(), entity.clone()))
            .collect();
        Self { entries }
    }

    /// Layout of a registered entity type
    pub fn resolve(&self, entity_type: &EntityType) -> Result<&EntityConfig> {
        self.entries.get(entity_type.as_str()).ok_or_else(|| {
            error!(entity_type = %entity_type, "Entity type is not registered");
            AccessError::configuration(format!(
                "Entity type '{}' is not registered",
                entity_type
            ))
        })
    }

    /// Whether an entity type is registered
    pub fn contains(&self, entity_type: &EntityType) -> bool {
        self.entries.contains_key(entity_type.as_str())
    }

    /// Registered entity type names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Layouts of every registered entity type, sorted by name
    pub fn entities(&self) -> Vec<&EntityConfig> {
        let mut entities: Vec<&EntityConfig> = self.entries.values().collect();
        entities.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        entities
    }

    /// Number of registered entity types
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Entity types of the staffing platform with their conventional tables
pub fn default_entities() -> Vec<EntityConfig> {
    [
        ("job", "jobs"),
        ("lead", "leads"),
        ("deal", "deals"),
        ("account", "accounts"),
        ("candidate", "candidates"),
        ("submission", "submissions"),
        ("interview", "interviews"),
        ("placement", "placements"),
        ("contact", "contacts"),
        ("activity", "activities"),
        ("timesheet", "timesheets"),
        ("invoice", "invoices"),
    ]
    .into_iter()
    .map(|(name, table)| EntityConfig::new(name, table))
    .collect()
}

fn default_id_column() -> String {
    "id".to_string()
}

fn default_organization_column() -> String {
    "org_id".to_string()
}

fn default_owner_column() -> String {
    "owner_id".to_string()
}

fn default_deleted_column() -> String {
    "deleted_at".to_string()
}
