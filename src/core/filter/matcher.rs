//! In-process evaluation of effective filters

use super::types::{EffectiveFilter, FilterScope};
use crate::core::models::{EntityRecord, OwnershipAssignment};

impl EffectiveFilter {
    /// Whether a record passes the filter, given the record's assignments
    pub fn matches(&self, record: &EntityRecord, assignments: &[OwnershipAssignment]) -> bool {
        record.entity_type == *self.entity_type()
            && record.organization_id == self.organization_id()
            && !record.is_deleted()
            && self.scope().matches(record, assignments)
    }
}

impl FilterScope {
    fn matches(&self, record: &EntityRecord, assignments: &[OwnershipAssignment]) -> bool {
        match self {
            Self::OwnedBy { owners } => record
                .owner_id
                .is_some_and(|owner| owners.contains(&owner)),
            Self::ConsultedBy { user_id, kinds } => assignments.iter().any(|assignment| {
                assignment.record_id == record.id
                    && assignment.entity_type == record.entity_type
                    && assignment.user_id == *user_id
                    && kinds.contains(&assignment.kind)
            }),
            Self::Union { branches } => branches
                .iter()
                .any(|branch| branch.matches(record, assignments)),
            Self::OrgWide => true,
            Self::Nothing => false,
        }
    }
}
