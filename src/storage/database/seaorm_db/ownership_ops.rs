use crate::config::EntityConfig;
use crate::core::models::{
    EntityRecord, EntityType, OwnershipAssignment, OwnershipKind, RecordId, UserId,
};
use crate::core::traits::OwnershipStore;
use crate::utils::error::{AccessError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::prelude::Uuid;
use sea_orm::sea_query::{Alias, Expr, Query, SimpleExpr};
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, object_owner};
use super::query_ops::fetch_record;
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Insert a record, creating the Responsible assignment for its owner
    pub async fn insert_record(&self, record: &EntityRecord) -> Result<()> {
        let config = self.registry.resolve(&record.entity_type)?;
        debug!("Inserting {} record: {}", record.entity_type, record.id);

        let mut insert = Query::insert();
        insert.into_table(Alias::new(&config.table)).columns([
            Alias::new(&config.id_column),
            Alias::new(&config.organization_column),
            Alias::new(&config.owner_column),
            Alias::new(&config.deleted_column),
        ]);
        let values: [SimpleExpr; 4] = [
            Expr::val(record.id.as_uuid()).into(),
            Expr::val(record.organization_id.as_uuid()).into(),
            Expr::val(record.owner_id.map(|owner| owner.as_uuid())).into(),
            Expr::val(record.deleted_at.map(|at| at.fixed_offset())).into(),
        ];
        insert
            .values(values)
            .map_err(|e| AccessError::internal(format!("Failed to build record insert: {}", e)))?;

        let txn = self.db.begin().await?;
        let backend = txn.get_database_backend();
        txn.execute(backend.build(&insert)).await?;

        if let Some(owner_id) = record.owner_id {
            let assignment = OwnershipAssignment::new(
                owner_id,
                record.entity_type.clone(),
                record.id,
                OwnershipKind::Responsible,
            );
            entities::ObjectOwner::insert(object_owner::Model::from_domain_assignment(&assignment))
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    /// Add an assignment
    ///
    /// Re-adding an existing (user, kind) pair is a no-op. A second Responsible assignment
    /// is a conflict; use [`SeaOrmDatabase::reassign_primary`] instead.
    pub async fn assign(&self, assignment: &OwnershipAssignment) -> Result<()> {
        let config = self.registry.resolve(&assignment.entity_type)?;
        debug!(
            "Assigning {} on {} {} to user {}",
            assignment.kind, assignment.entity_type, assignment.record_id, assignment.user_id
        );

        let txn = self.db.begin().await?;
        require_record(&txn, config, &assignment.entity_type, assignment.record_id).await?;

        let existing = entities::ObjectOwner::find()
            .filter(object_owner::Column::EntityType.eq(assignment.entity_type.as_str()))
            .filter(object_owner::Column::EntityId.eq(assignment.record_id.as_uuid()))
            .all(&txn)
            .await?;

        if existing.iter().any(|row| {
            row.user_id == assignment.user_id.as_uuid() && row.role == assignment.kind.as_str()
        }) {
            return Ok(());
        }

        if assignment.kind.is_primary() {
            if existing.iter().any(|row| row.is_primary) {
                return Err(AccessError::conflict(format!(
                    "Record {} already has a responsible owner",
                    assignment.record_id
                )));
            }
            set_owner(&txn, config, assignment.record_id, Some(assignment.user_id)).await?;
        }

        // A concurrent writer may have inserted since the read; the unique indexes decide
        if insert_assignment(&txn, assignment).await? {
            txn.commit().await?;
        }
        Ok(())
    }

    /// Remove an assignment; returns whether one existed
    pub async fn unassign(
        &self,
        user_id: UserId,
        entity_type: &EntityType,
        record_id: RecordId,
        kind: OwnershipKind,
    ) -> Result<bool> {
        let config = self.registry.resolve(entity_type)?;
        debug!("Unassigning {} on {} {} from user {}", kind, entity_type, record_id, user_id);

        let txn = self.db.begin().await?;
        let removed = entities::ObjectOwner::delete_many()
            .filter(object_owner::Column::EntityType.eq(entity_type.as_str()))
            .filter(object_owner::Column::EntityId.eq(record_id.as_uuid()))
            .filter(object_owner::Column::UserId.eq(user_id.as_uuid()))
            .filter(object_owner::Column::Role.eq(kind.as_str()))
            .exec(&txn)
            .await?
            .rows_affected
            > 0;

        if removed && kind.is_primary() {
            let table = Alias::new(&config.table);
            let update = Query::update()
                .table(table.clone())
                .value(
                    Alias::new(&config.owner_column),
                    Expr::val(Option::<Uuid>::None),
                )
                .and_where(
                    Expr::col((table.clone(), Alias::new(&config.id_column)))
                        .eq(record_id.as_uuid()),
                )
                .and_where(
                    Expr::col((table, Alias::new(&config.owner_column))).eq(user_id.as_uuid()),
                )
                .to_owned();
            let backend = txn.get_database_backend();
            txn.execute(backend.build(&update)).await?;
        }

        txn.commit().await?;
        Ok(removed)
    }

    /// Move the primary owner of a record to `new_owner`
    pub async fn reassign_primary(
        &self,
        entity_type: &EntityType,
        record_id: RecordId,
        new_owner: UserId,
    ) -> Result<()> {
        let config = self.registry.resolve(entity_type)?;
        debug!("Reassigning {} {} to user {}", entity_type, record_id, new_owner);

        let txn = self.db.begin().await?;
        require_record(&txn, config, entity_type, record_id).await?;

        entities::ObjectOwner::delete_many()
            .filter(object_owner::Column::EntityType.eq(entity_type.as_str()))
            .filter(object_owner::Column::EntityId.eq(record_id.as_uuid()))
            .filter(object_owner::Column::IsPrimary.eq(true))
            .exec(&txn)
            .await?;

        let assignment = OwnershipAssignment::new(
            new_owner,
            entity_type.clone(),
            record_id,
            OwnershipKind::Responsible,
        );
        insert_assignment(&txn, &assignment).await?;
        set_owner(&txn, config, record_id, Some(new_owner)).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Mark a record deleted; it disappears from every listing
    pub async fn soft_delete_record(
        &self,
        entity_type: &EntityType,
        record_id: RecordId,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let config = self.registry.resolve(entity_type)?;
        let table = Alias::new(&config.table);
        let update = Query::update()
            .table(table.clone())
            .value(
                Alias::new(&config.deleted_column),
                Expr::val(at.fixed_offset()),
            )
            .and_where(Expr::col((table, Alias::new(&config.id_column))).eq(record_id.as_uuid()))
            .to_owned();

        let backend = self.db.get_database_backend();
        let result = self.db.execute(backend.build(&update)).await?;
        if result.rows_affected() == 0 {
            return Err(AccessError::not_found(format!(
                "Record {} of type {} not found",
                record_id, entity_type
            )));
        }
        Ok(())
    }

    /// Delete a record and every assignment on it; returns whether it existed
    pub async fn purge_record(&self, entity_type: &EntityType, record_id: RecordId) -> Result<bool> {
        let config = self.registry.resolve(entity_type)?;
        debug!("Purging {} record: {}", entity_type, record_id);

        let txn = self.db.begin().await?;
        entities::ObjectOwner::delete_many()
            .filter(object_owner::Column::EntityType.eq(entity_type.as_str()))
            .filter(object_owner::Column::EntityId.eq(record_id.as_uuid()))
            .exec(&txn)
            .await?;

        let table = Alias::new(&config.table);
        let delete = Query::delete()
            .from_table(table.clone())
            .and_where(Expr::col((table, Alias::new(&config.id_column))).eq(record_id.as_uuid()))
            .to_owned();
        let backend = txn.get_database_backend();
        let existed = txn.execute(backend.build(&delete)).await?.rows_affected() > 0;

        txn.commit().await?;
        Ok(existed)
    }
}

/// Insert one assignment row
///
/// Returns `false` when an identical row already exists. A unique violation on a
/// Responsible row means another primary owner won the race and is a conflict.
async fn insert_assignment<C: ConnectionTrait>(
    conn: &C,
    assignment: &OwnershipAssignment,
) -> Result<bool> {
    let result =
        entities::ObjectOwner::insert(object_owner::Model::from_domain_assignment(assignment))
            .exec_without_returning(conn)
            .await;

    match result {
        Ok(_) => Ok(true),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            if assignment.kind.is_primary() {
                Err(AccessError::conflict(format!(
                    "Record {} already has a responsible owner",
                    assignment.record_id
                )))
            } else {
                debug!(
                    "Assignment {} on {} already present",
                    assignment.kind, assignment.record_id
                );
                Ok(false)
            }
        }
        Err(e) => Err(AccessError::Database(e)),
    }
}

async fn require_record<C: ConnectionTrait>(
    conn: &C,
    config: &EntityConfig,
    entity_type: &EntityType,
    record_id: RecordId,
) -> Result<EntityRecord> {
    fetch_record(conn, config, entity_type, record_id)
        .await?
        .ok_or_else(|| {
            AccessError::not_found(format!(
                "Record {} of type {} not found",
                record_id, entity_type
            ))
        })
}

async fn set_owner<C: ConnectionTrait>(
    conn: &C,
    config: &EntityConfig,
    record_id: RecordId,
    owner: Option<UserId>,
) -> Result<()> {
    let table = Alias::new(&config.table);
    let update = Query::update()
        .table(table.clone())
        .value(
            Alias::new(&config.owner_column),
            Expr::val(owner.map(|owner| owner.as_uuid())),
        )
        .and_where(Expr::col((table, Alias::new(&config.id_column))).eq(record_id.as_uuid()))
        .to_owned();
    let backend = conn.get_database_backend();
    conn.execute(backend.build(&update)).await?;
    Ok(())
}

#[async_trait]
impl OwnershipStore for SeaOrmDatabase {
    async fn assignments_for(
        &self,
        entity_type: &EntityType,
        record_id: RecordId,
    ) -> Result<Vec<OwnershipAssignment>> {
        let models = entities::ObjectOwner::find()
            .filter(object_owner::Column::EntityType.eq(entity_type.as_str()))
            .filter(object_owner::Column::EntityId.eq(record_id.as_uuid()))
            .all(&self.db)
            .await
            .map_err(AccessError::Database)?;

        models
            .iter()
            .map(object_owner::Model::to_domain_assignment)
            .collect()
    }

    async fn has_assignment(
        &self,
        user_id: UserId,
        entity_type: &EntityType,
        record_id: RecordId,
        kinds: &[OwnershipKind],
    ) -> Result<bool> {
        if kinds.is_empty() {
            return Ok(false);
        }
        let count = entities::ObjectOwner::find()
            .filter(object_owner::Column::UserId.eq(user_id.as_uuid()))
            .filter(object_owner::Column::EntityType.eq(entity_type.as_str()))
            .filter(object_owner::Column::EntityId.eq(record_id.as_uuid()))
            .filter(object_owner::Column::Role.is_in(kinds.iter().map(|kind| kind.as_str())))
            .count(&self.db)
            .await
            .map_err(AccessError::Database)?;
        Ok(count > 0)
    }

    async fn has_any_assignment(
        &self,
        user_id: UserId,
        entity_type: &EntityType,
        kinds: &[OwnershipKind],
    ) -> Result<bool> {
        if kinds.is_empty() {
            return Ok(false);
        }
        let first = entities::ObjectOwner::find()
            .filter(object_owner::Column::UserId.eq(user_id.as_uuid()))
            .filter(object_owner::Column::EntityType.eq(entity_type.as_str()))
            .filter(object_owner::Column::Role.is_in(kinds.iter().map(|kind| kind.as_str())))
            .one(&self.db)
            .await
            .map_err(AccessError::Database)?;
        Ok(first.is_some())
    }

    async fn find_record(
        &self,
        entity_type: &EntityType,
        record_id: RecordId,
    ) -> Result<Option<EntityRecord>> {
        let config = self.registry.resolve(entity_type)?;
        fetch_record(&self.db, config, entity_type, record_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AccessConfig, DatabaseConfig};
    use crate::core::models::{OrganizationId, User, UserRole};
    use std::sync::Arc;

    async fn database() -> SeaOrmDatabase {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connection_timeout: 5,
            enabled: true,
        };
        let registry = Arc::new(AccessConfig::default().registry());
        let db = SeaOrmDatabase::new(&config, registry).await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_second_primary_row_is_conflict() {
        let db = database().await;
        let org = OrganizationId::new();
        let owner = User::new(org, UserRole::Member);
        let rival = User::new(org, UserRole::Member);
        db.upsert_user(&owner).await.unwrap();
        db.upsert_user(&rival).await.unwrap();

        let job = EntityType::from("job");
        let record = EntityRecord::new(job.clone(), org, owner.id);
        db.insert_record(&record).await.unwrap();

        // Skips the read check, as a writer racing past it would
        let rival_primary =
            OwnershipAssignment::new(rival.id, job.clone(), record.id, OwnershipKind::Responsible);
        let err = insert_assignment(&db.db, &rival_primary).await.unwrap_err();
        assert!(matches!(err, AccessError::Conflict(_)));

        let rows = db.assignments_for(&job, record.id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id, owner.id);
    }

    #[tokio::test]
    async fn test_duplicate_visibility_row_is_noop() {
        let db = database().await;
        let org = OrganizationId::new();
        let owner = User::new(org, UserRole::Member);
        let watcher = User::new(org, UserRole::Member);
        db.upsert_user(&owner).await.unwrap();
        db.upsert_user(&watcher).await.unwrap();

        let job = EntityType::from("job");
        let record = EntityRecord::new(job.clone(), org, owner.id);
        db.insert_record(&record).await.unwrap();

        let informed =
            OwnershipAssignment::new(watcher.id, job.clone(), record.id, OwnershipKind::Informed);
        assert!(insert_assignment(&db.db, &informed).await.unwrap());
        assert!(!insert_assignment(&db.db, &informed).await.unwrap());
        assert_eq!(db.assignments_for(&job, record.id).await.unwrap().len(), 2);
    }
}
