//! YAML snapshots of directory and ownership data

use super::directory::InMemoryDirectory;
use super::ownership::InMemoryOwnershipStore;
use crate::core::models::{
    EntityRecord, EntityType, Organization, OwnershipAssignment, OwnershipKind, PermissionOverride,
    RecordId, User, UserId,
};
use crate::utils::error::{AccessError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Point-in-time copy of everything the policy reads
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub organizations: Vec<Organization>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub records: Vec<EntityRecord>,
    /// Non-primary assignments; primary owners come from `records[].owner_id`
    #[serde(default)]
    pub assignments: Vec<SnapshotAssignment>,
    #[serde(default)]
    pub overrides: Vec<PermissionOverride>,
}

/// Assignment row as written in a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotAssignment {
    pub user_id: UserId,
    pub entity_type: EntityType,
    pub record_id: RecordId,
    pub kind: OwnershipKind,
    #[serde(default)]
    pub assigned_at: Option<DateTime<Utc>>,
}

/// Stores populated from a snapshot
#[derive(Debug, Clone)]
pub struct InMemoryBackend {
    pub directory: Arc<InMemoryDirectory>,
    pub ownership: Arc<InMemoryOwnershipStore>,
}

impl Snapshot {
    /// Parse a snapshot from YAML
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read a snapshot file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let snapshot = Self::from_yaml_str(&content)?;
        info!(
            "Loaded snapshot {:?}: {} users, {} records, {} assignments",
            path,
            snapshot.users.len(),
            snapshot.records.len(),
            snapshot.assignments.len()
        );
        Ok(snapshot)
    }

    /// Populate fresh in-memory stores
    pub fn load(&self) -> Result<InMemoryBackend> {
        let directory = InMemoryDirectory::new();
        for user in &self.users {
            directory.upsert_user(user.clone());
        }
        for permission_override in &self.overrides {
            directory.insert_override(permission_override.clone())?;
        }

        let ownership = InMemoryOwnershipStore::new();
        for record in &self.records {
            ownership.insert_record(record.clone())?;
        }
        for row in &self.assignments {
            if row.kind.is_primary() {
                return Err(AccessError::validation(format!(
                    "Snapshot assignment on record {} uses the primary kind; set owner_id instead",
                    row.record_id
                )));
            }
            let mut assignment = OwnershipAssignment::new(
                row.user_id,
                row.entity_type.clone(),
                row.record_id,
                row.kind,
            );
            if let Some(assigned_at) = row.assigned_at {
                assignment.assigned_at = assigned_at;
            }
            ownership.assign(assignment)?;
        }

        Ok(InMemoryBackend {
            directory: Arc::new(directory),
            ownership: Arc::new(ownership),
        })
    }

    /// Look up a user in the snapshot
    pub fn user(&self, user_id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id == user_id)
    }
}
