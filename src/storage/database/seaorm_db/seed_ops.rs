use crate::core::models::OwnershipAssignment;
use crate::storage::memory::Snapshot;
use crate::utils::error::{AccessError, Result};
use tracing::info;

use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Write the contents of a snapshot through the regular mutation paths
    ///
    /// Users are upserted; records, assignments and overrides must not exist yet.
    pub async fn import_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        for user in &snapshot.users {
            self.upsert_user(user).await?;
        }
        for permission_override in &snapshot.overrides {
            self.insert_override(permission_override).await?;
        }
        for record in &snapshot.records {
            self.insert_record(record).await?;
        }
        for row in &snapshot.assignments {
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
            self.assign(&assignment).await?;
        }

        info!(
            "Imported snapshot: {} users, {} records, {} assignments, {} overrides",
            snapshot.users.len(),
            snapshot.records.len(),
            snapshot.assignments.len(),
            snapshot.overrides.len()
        );
        Ok(())
    }
}
