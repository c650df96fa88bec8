//! Custom test assertions
//!
//! Provides domain-specific assertions for list query results.

use intime_access::core::models::{OwnershipFilter, RecordId};
use intime_access::ListQueryResult;
use std::collections::BTreeSet;

/// Assertions for ListQueryResult
pub trait ListResultAssertions {
    /// Assert the result holds exactly `expected`, in any order
    fn assert_records(&self, expected: &[RecordId]);

    /// Assert the requested mode was applied unchanged
    fn assert_not_downgraded(&self);

    /// Assert the requested mode was narrowed to `to`
    fn assert_downgraded_to(&self, to: OwnershipFilter);
}

impl ListResultAssertions for ListQueryResult {
    fn assert_records(&self, expected: &[RecordId]) {
        let actual: BTreeSet<RecordId> = self.records.iter().map(|record| record.id).collect();
        let expected: BTreeSet<RecordId> = expected.iter().copied().collect();
        assert_eq!(
            actual, expected,
            "Unexpected record set for {} (effective {})",
            self.authorization.requested, self.authorization.effective
        );
    }

    fn assert_not_downgraded(&self) {
        assert!(
            self.authorization.downgrade.is_none(),
            "Expected no downgrade, got {:?}",
            self.authorization.downgrade
        );
        assert_eq!(self.authorization.requested, self.authorization.effective);
    }

    fn assert_downgraded_to(&self, to: OwnershipFilter) {
        let downgrade = self
            .authorization
            .downgrade
            .as_ref()
            .expect("Expected a downgrade");
        assert_eq!(downgrade.to, to);
        assert_eq!(self.authorization.effective, to);
    }
}
