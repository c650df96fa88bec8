use crate::core::models::{EntityType, OwnershipAssignment, OwnershipKind, RecordId, UserId};
use crate::utils::error::AccessError;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// RCAI assignment row
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "object_owners")]
pub struct Model {
    /// Row ID (UUID)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Entity type name of the record
    pub entity_type: String,

    /// Record ID
    pub entity_id: Uuid,

    /// Assigned user
    pub user_id: Uuid,

    /// Relationship kind (`responsible`, `accountable`, `consulted`, `informed`)
    pub role: String,

    /// Whether this is the record's primary owner
    pub is_primary: bool,

    /// When the assignment was made
    pub assigned_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert to the domain assignment
    pub fn to_domain_assignment(&self) -> crate::utils::error::Result<OwnershipAssignment> {
        let kind = OwnershipKind::parse(&self.role).ok_or_else(|| {
            AccessError::internal(format!(
                "Corrupt ownership row {}: unknown role '{}'",
                self.id, self.role
            ))
        })?;

        Ok(OwnershipAssignment {
            user_id: UserId::from(self.user_id),
            entity_type: EntityType::new(self.entity_type.clone()),
            record_id: RecordId::from(self.entity_id),
            kind,
            assigned_at: self.assigned_at.to_utc(),
        })
    }

    /// Active model for inserting a domain assignment
    pub fn from_domain_assignment(assignment: &OwnershipAssignment) -> ActiveModel {
        ActiveModel {
            id: Set(Uuid::new_v4()),
            entity_type: Set(assignment.entity_type.as_str().to_string()),
            entity_id: Set(assignment.record_id.as_uuid()),
            user_id: Set(assignment.user_id.as_uuid()),
            role: Set(assignment.kind.as_str().to_string()),
            is_primary: Set(assignment.kind.is_primary()),
            assigned_at: Set(assignment.assigned_at.into()),
        }
    }
}
