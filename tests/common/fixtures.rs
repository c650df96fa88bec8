//! Test fixtures and data factories
//!
//! One organization with a three-level reporting line, a peer manager, an unmanaged
//! individual contributor, an admin and a read-only viewer.

use intime_access::core::models::{
    EntityRecord, EntityType, Organization, OrganizationId, User, UserRole,
};
use intime_access::storage::memory::Snapshot;

/// A small organization
///
/// ```text
/// manager
/// └── report
///     └── grand_report
/// peer_manager
/// ic
/// admin
/// viewer
/// ```
#[derive(Debug, Clone)]
pub struct OrgFixture {
    pub org: OrganizationId,
    pub manager: User,
    pub report: User,
    pub grand_report: User,
    pub peer_manager: User,
    pub ic: User,
    pub admin: User,
    pub viewer: User,
}

impl Default for OrgFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl OrgFixture {
    pub fn new() -> Self {
        let org = OrganizationId::new();
        let manager = User::new(org, UserRole::Manager).with_name("manager");
        let report = User::new(org, UserRole::Member)
            .with_manager(manager.id)
            .with_name("report");
        let grand_report = User::new(org, UserRole::Member)
            .with_manager(report.id)
            .with_name("grand_report");
        let peer_manager = User::new(org, UserRole::Manager).with_name("peer_manager");
        let ic = User::new(org, UserRole::Member).with_name("ic");
        let admin = User::new(org, UserRole::Admin).with_name("admin");
        let viewer = User::new(org, UserRole::Viewer).with_name("viewer");

        Self {
            org,
            manager,
            report,
            grand_report,
            peer_manager,
            ic,
            admin,
            viewer,
        }
    }

    /// Every user, managers before their reports
    pub fn users(&self) -> Vec<User> {
        vec![
            self.manager.clone(),
            self.report.clone(),
            self.grand_report.clone(),
            self.peer_manager.clone(),
            self.ic.clone(),
            self.admin.clone(),
            self.viewer.clone(),
        ]
    }

    /// Snapshot holding the users and no records
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            organizations: vec![Organization {
                id: self.org,
                name: "Fixture Org".to_string(),
            }],
            users: self.users(),
            ..Default::default()
        }
    }
}

/// Record factory
pub struct RecordFactory;

impl RecordFactory {
    /// The entity type most tests list
    pub fn job_type() -> EntityType {
        EntityType::from("job")
    }

    /// A live job owned by `owner`
    pub fn job(owner: &User) -> EntityRecord {
        EntityRecord::new(Self::job_type(), owner.organization_id, owner.id)
    }
}
