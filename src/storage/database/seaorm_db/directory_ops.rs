use crate::core::models::{
    MIN_OVERRIDE_REASON_LEN, OrganizationId, OverrideId, PermissionOverride, ReportingEdge, User,
    UserId,
};
use crate::core::hierarchy::closes_cycle;
use crate::core::traits::DirectoryStore;
use crate::utils::error::{AccessError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use std::collections::HashMap;
use uuid::Uuid;
use tracing::debug;

use super::super::entities::{self, permission_override, user_profile};
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Insert or replace a user
    pub async fn upsert_user(&self, user: &User) -> Result<()> {
        debug!("Upserting user: {}", user.id);

        entities::UserProfile::insert(user_profile::Model::from_domain_user(user))
            .on_conflict(
                OnConflict::column(user_profile::Column::Id)
                    .update_columns([
                        user_profile::Column::OrgId,
                        user_profile::Column::ManagerId,
                        user_profile::Column::Role,
                        user_profile::Column::DisplayName,
                        user_profile::Column::DeletedAt,
                        user_profile::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(AccessError::Database)?;

        Ok(())
    }

    /// Change a user's manager
    ///
    /// The manager must be a live member of the same organization and must not report
    /// to the user, directly or transitively.
    pub async fn set_manager(&self, user_id: UserId, manager_id: Option<UserId>) -> Result<()> {
        debug!("Setting manager of user {}: {:?}", user_id, manager_id);

        let user_model = entities::UserProfile::find_by_id(user_id.as_uuid())
            .one(&self.db)
            .await
            .map_err(AccessError::Database)?
            .ok_or_else(|| AccessError::not_found(format!("User {} not found", user_id)))?;

        if let Some(manager_id) = manager_id {
            let manager = entities::UserProfile::find_by_id(manager_id.as_uuid())
                .one(&self.db)
                .await
                .map_err(AccessError::Database)?;
            let manager_ok = manager.is_some_and(|manager| {
                manager.org_id == user_model.org_id && manager.deleted_at.is_none()
            });
            if !manager_ok {
                return Err(AccessError::validation(format!(
                    "Manager {} is not a live member of organization {}",
                    manager_id, user_model.org_id
                )));
            }

            let chain: HashMap<Uuid, Option<Uuid>> = entities::UserProfile::find()
                .filter(user_profile::Column::OrgId.eq(user_model.org_id))
                .all(&self.db)
                .await
                .map_err(AccessError::Database)?
                .into_iter()
                .map(|model| (model.id, model.manager_id))
                .collect();
            let manager_of = |id: UserId| {
                chain
                    .get(&id.as_uuid())
                    .copied()
                    .flatten()
                    .map(UserId::from)
            };
            if closes_cycle(user_id, manager_id, manager_of) {
                return Err(AccessError::validation(format!(
                    "Manager {} reports to user {}, reassignment would create a cycle",
                    manager_id, user_id
                )));
            }
        }

        let mut active_model: user_profile::ActiveModel = user_model.into();
        active_model.manager_id = Set(manager_id.map(|id| id.as_uuid()));
        active_model.updated_at = Set(Utc::now().into());

        active_model
            .update(&self.db)
            .await
            .map_err(AccessError::Database)?;

        Ok(())
    }

    /// Mark a user deleted
    pub async fn soft_delete_user(&self, user_id: UserId, at: DateTime<Utc>) -> Result<()> {
        debug!("Soft-deleting user: {}", user_id);

        let user_model = entities::UserProfile::find_by_id(user_id.as_uuid())
            .one(&self.db)
            .await
            .map_err(AccessError::Database)?
            .ok_or_else(|| AccessError::not_found(format!("User {} not found", user_id)))?;

        let mut active_model: user_profile::ActiveModel = user_model.into();
        active_model.deleted_at = Set(Some(at.into()));
        active_model.updated_at = Set(Utc::now().into());

        active_model
            .update(&self.db)
            .await
            .map_err(AccessError::Database)?;

        Ok(())
    }

    /// Record a permission override
    pub async fn insert_override(&self, permission_override: &PermissionOverride) -> Result<()> {
        debug!(
            "Inserting {} override for user {}",
            permission_override.scope.as_str(),
            permission_override.user_id
        );

        if permission_override.reason.trim().chars().count() < MIN_OVERRIDE_REASON_LEN {
            return Err(AccessError::validation(format!(
                "Override reason must be at least {} characters",
                MIN_OVERRIDE_REASON_LEN
            )));
        }

        let user_org = entities::UserProfile::find_by_id(permission_override.user_id.as_uuid())
            .one(&self.db)
            .await
            .map_err(AccessError::Database)?
            .map(|user| user.org_id);
        if user_org != Some(permission_override.organization_id.as_uuid()) {
            return Err(AccessError::validation(
                "Override user must belong to the override's organization",
            ));
        }

        entities::PermissionOverride::insert(permission_override::Model::from_domain_override(
            permission_override,
        ))
        .exec_without_returning(&self.db)
        .await
        .map_err(AccessError::Database)?;

        Ok(())
    }

    /// Revoke an override from `at` onwards
    pub async fn revoke_override(&self, id: OverrideId, at: DateTime<Utc>) -> Result<()> {
        debug!("Revoking override: {}", id);

        let model = entities::PermissionOverride::find_by_id(id.as_uuid())
            .one(&self.db)
            .await
            .map_err(AccessError::Database)?
            .ok_or_else(|| AccessError::not_found(format!("Override {} not found", id)))?;

        if model.revoked_at.is_some() {
            return Ok(());
        }

        let mut active_model: permission_override::ActiveModel = model.into();
        active_model.revoked_at = Set(Some(at.into()));
        active_model
            .update(&self.db)
            .await
            .map_err(AccessError::Database)?;

        Ok(())
    }
}

#[async_trait]
impl DirectoryStore for SeaOrmDatabase {
    async fn find_user(&self, user_id: UserId) -> Result<Option<User>> {
        debug!("Finding user by ID: {}", user_id);

        let user_model = entities::UserProfile::find_by_id(user_id.as_uuid())
            .one(&self.db)
            .await
            .map_err(AccessError::Database)?;

        user_model.map(|model| model.to_domain_user()).transpose()
    }

    async fn reporting_edges(&self, organization_id: OrganizationId) -> Result<Vec<ReportingEdge>> {
        debug!("Loading reporting edges of organization {}", organization_id);

        let models = entities::UserProfile::find()
            .filter(user_profile::Column::OrgId.eq(organization_id.as_uuid()))
            .filter(user_profile::Column::DeletedAt.is_null())
            .all(&self.db)
            .await
            .map_err(AccessError::Database)?;

        Ok(models
            .into_iter()
            .map(|model| ReportingEdge {
                user_id: UserId::from(model.id),
                manager_id: model.manager_id.map(UserId::from),
            })
            .collect())
    }

    async fn active_overrides(
        &self,
        organization_id: OrganizationId,
        user_id: UserId,
        at: DateTime<Utc>,
    ) -> Result<Vec<PermissionOverride>> {
        let models = entities::PermissionOverride::find()
            .filter(permission_override::Column::OrgId.eq(organization_id.as_uuid()))
            .filter(permission_override::Column::UserId.eq(user_id.as_uuid()))
            .all(&self.db)
            .await
            .map_err(AccessError::Database)?;

        // Expiry and revocation are compared in Rust; SQLite stores timestamps as text
        let mut active = Vec::with_capacity(models.len());
        for model in models {
            let permission_override = model.to_domain_override()?;
            if permission_override.is_active_at(at) {
                active.push(permission_override);
            }
        }
        Ok(active)
    }
}
