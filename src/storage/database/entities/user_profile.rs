use crate::core::models::{OrganizationId, User, UserId, UserRole};
use crate::utils::error::AccessError;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Directory row of one user
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profiles")]
pub struct Model {
    /// User ID (UUID)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Organization the user belongs to
    pub org_id: Uuid,

    /// Direct manager (self-referential, nullable)
    pub manager_id: Option<Uuid>,

    /// Role tag
    pub role: String,

    /// Display name (optional)
    pub display_name: Option<String>,

    /// Soft-delete marker
    pub deleted_at: Option<DateTimeWithTimeZone>,

    /// Creation timestamp
    pub created_at: DateTimeWithTimeZone,

    /// Last update timestamp
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert to the domain user
    pub fn to_domain_user(&self) -> crate::utils::error::Result<User> {
        let role: UserRole = self
            .role
            .parse()
            .map_err(|e: String| {
                AccessError::internal(format!("Corrupt user row {}: {}", self.id, e))
            })?;

        Ok(User {
            id: UserId::from(self.id),
            organization_id: OrganizationId::from(self.org_id),
            manager_id: self.manager_id.map(UserId::from),
            role,
            display_name: self.display_name.clone(),
            deleted_at: self.deleted_at.map(|at| at.to_utc()),
        })
    }

    /// Active model for inserting a domain user
    pub fn from_domain_user(user: &User) -> ActiveModel {
        let now = chrono::Utc::now().fixed_offset();
        ActiveModel {
            id: Set(user.id.as_uuid()),
            org_id: Set(user.organization_id.as_uuid()),
            manager_id: Set(user.manager_id.map(|id| id.as_uuid())),
            role: Set(user.role.as_str().to_string()),
            display_name: Set(user.display_name.clone()),
            deleted_at: Set(user.deleted_at.map(Into::into)),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}
