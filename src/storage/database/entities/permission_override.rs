use crate::core::models::{
    EntityType, OrganizationId, OverrideId, OverrideScope, PermissionOverride, UserId,
};
use crate::utils::error::AccessError;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Permission override row
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "permission_overrides")]
pub struct Model {
    /// Override ID (UUID)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Organization
    pub org_id: Uuid,

    /// User the override applies to
    pub user_id: Uuid,

    /// Entity type, or every type when absent
    pub entity_type: Option<String>,

    /// `team` or `org`
    pub scope: String,

    /// Grant (true) or revocation (false)
    pub granted: bool,

    /// Justification
    #[sea_orm(column_type = "Text")]
    pub reason: String,

    /// Expiry
    pub expires_at: Option<DateTimeWithTimeZone>,

    /// Revocation time
    pub revoked_at: Option<DateTimeWithTimeZone>,

    /// Creation timestamp
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert to the domain override
    pub fn to_domain_override(&self) -> crate::utils::error::Result<PermissionOverride> {
        let scope = OverrideScope::parse(&self.scope).ok_or_else(|| {
            AccessError::internal(format!(
                "Corrupt override row {}: unknown scope '{}'",
                self.id, self.scope
            ))
        })?;

        Ok(PermissionOverride {
            id: OverrideId::from(self.id),
            organization_id: OrganizationId::from(self.org_id),
            user_id: UserId::from(self.user_id),
            entity_type: self.entity_type.clone().map(EntityType::new),
            scope,
            granted: self.granted,
            reason: self.reason.clone(),
            expires_at: self.expires_at.map(|at| at.to_utc()),
            revoked_at: self.revoked_at.map(|at| at.to_utc()),
        })
    }

    /// Active model for inserting a domain override
    pub fn from_domain_override(permission_override: &PermissionOverride) -> ActiveModel {
        ActiveModel {
            id: Set(permission_override.id.as_uuid()),
            org_id: Set(permission_override.organization_id.as_uuid()),
            user_id: Set(permission_override.user_id.as_uuid()),
            entity_type: Set(permission_override
                .entity_type
                .as_ref()
                .map(|entity_type| entity_type.as_str().to_string())),
            scope: Set(permission_override.scope.as_str().to_string()),
            granted: Set(permission_override.granted),
            reason: Set(permission_override.reason.clone()),
            expires_at: Set(permission_override.expires_at.map(Into::into)),
            revoked_at: Set(permission_override.revoked_at.map(Into::into)),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}
