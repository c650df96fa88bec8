//! Decision audit trail
//!
//! Every list authorization and mutation decision is emitted as a structured event on
//! the [`AUDIT_TARGET`] target, so deployments can route the audit trail separately.

use crate::core::filter::ListAuthorization;
use crate::core::models::{EntityType, RecordId, User};
use crate::core::policy::{Decision, DenyReason, MutationAction};
use tracing::{debug, info, warn};

/// Target of every audit event
pub const AUDIT_TARGET: &str = "intime_access::audit";

/// Structured decision logger
pub struct AuditLogger;

impl AuditLogger {
    /// Log a list query authorization
    pub fn log_list_authorization(
        user: &User,
        entity_type: &EntityType,
        authorization: &ListAuthorization,
    ) {
        let downgrade_reason = authorization
            .downgrade
            .map(|downgrade| format!("{:?}", downgrade.reason));

        if let Some(failure) = &authorization.upstream_failure {
            warn!(
                target: AUDIT_TARGET,
                user_id = %user.id,
                organization_id = %user.organization_id,
                entity_type = %entity_type,
                requested = %authorization.requested,
                effective = %authorization.effective,
                error_code = failure.code,
                "List authorization failed closed"
            );
        } else if authorization.was_downgraded() {
            info!(
                target: AUDIT_TARGET,
                user_id = %user.id,
                organization_id = %user.organization_id,
                entity_type = %entity_type,
                requested = %authorization.requested,
                effective = %authorization.effective,
                downgrade_reason = downgrade_reason.as_deref(),
                "List authorization downgraded"
            );
        } else {
            debug!(
                target: AUDIT_TARGET,
                user_id = %user.id,
                organization_id = %user.organization_id,
                entity_type = %entity_type,
                effective = %authorization.effective,
                "List authorization granted"
            );
        }
    }

    /// Log a mutation decision
    pub fn log_mutation_decision(
        user: &User,
        entity_type: &EntityType,
        record_id: RecordId,
        action: MutationAction,
        decision: Decision,
    ) {
        match decision {
            Decision::Allow => debug!(
                target: AUDIT_TARGET,
                user_id = %user.id,
                entity_type = %entity_type,
                record_id = %record_id,
                action = %action,
                "Mutation allowed"
            ),
            Decision::Deny(DenyReason::UpstreamUnavailable) => warn!(
                target: AUDIT_TARGET,
                user_id = %user.id,
                entity_type = %entity_type,
                record_id = %record_id,
                action = %action,
                reason = DenyReason::UpstreamUnavailable.code(),
                "Mutation denied, upstream data unavailable"
            ),
            Decision::Deny(reason) => info!(
                target: AUDIT_TARGET,
                user_id = %user.id,
                entity_type = %entity_type,
                record_id = %record_id,
                action = %action,
                reason = reason.code(),
                "Mutation denied"
            ),
        }
    }
}
