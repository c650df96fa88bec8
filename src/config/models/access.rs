//! Top-level access configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything the access layer reads from configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Role classification and filter behaviour
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Org-chart caching
    #[serde(default)]
    pub hierarchy: HierarchyConfig,
    /// Database backend
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Log subscriber
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Registered entity types
    #[serde(default = "default_entities")]
    pub entities: Vec<EntityConfig>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            policy: PolicyConfig::default(),
            hierarchy: HierarchyConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            entities: default_entities(),
        }
    }
}

impl AccessConfig {
    /// Merge two configurations, with other taking precedence
    pub fn merge(mut self, other: Self) -> Self {
        self.policy = self.policy.merge(other.policy);
        self.hierarchy = self.hierarchy.merge(other.hierarchy);
        self.database = self.database.merge(other.database);
        self.logging = self.logging.merge(other.logging);

        // Same-named entities are replaced, new ones appended, order kept
        let mut positions: HashMap<String, usize> = self
            .entities
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), i))
            .collect();
        for entity in other.entities {
            match positions.get(&entity.name) {
                Some(&i) => self.entities[i] = entity,
                None => {
                    positions.insert(entity.name.clone(), self.entities.len());
                    self.entities.push(entity);
                }
            }
        }
        self
    }

    /// Registry view of the configured entities
    pub fn registry(&self) -> EntityRegistry {
        EntityRegistry::new(&self.entities)
    }
}
