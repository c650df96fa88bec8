//! Org chart built from reporting edges

use crate::core::models::{ReportingEdge, UserId};
use std::collections::{HashMap, HashSet, VecDeque};

/// Manager → direct reports adjacency of one organization
#[derive(Debug, Clone, Default)]
pub struct OrgChart {
    reports: HashMap<UserId, Vec<UserId>>,
    members: HashSet<UserId>,
}

/// Whether making `manager_id` the manager of `user_id` would close a cycle
///
/// Walks up from `manager_id` through `manager_of` until the chain ends, repeats or
/// reaches `user_id`.
pub fn closes_cycle(
    user_id: UserId,
    manager_id: UserId,
    manager_of: impl Fn(UserId) -> Option<UserId>,
) -> bool {
    let mut seen = HashSet::new();
    let mut current = Some(manager_id);
    while let Some(id) = current {
        if id == user_id {
            return true;
        }
        if !seen.insert(id) {
            return false;
        }
        current = manager_of(id);
    }
    false
}

impl OrgChart {
    /// Build the chart from the edges of one organization
    ///
    /// Edges pointing at a manager outside the edge set are dropped, so reports of
    /// deleted or foreign managers never attach to anyone.
    pub fn from_edges(edges: &[ReportingEdge]) -> Self {
        let members: HashSet<UserId> = edges.iter().map(|edge| edge.user_id).collect();
        let mut reports: HashMap<UserId, Vec<UserId>> = HashMap::new();

        for edge in edges {
            let Some(manager_id) = edge.manager_id else {
                continue;
            };
            if manager_id == edge.user_id || !members.contains(&manager_id) {
                continue;
            }
            reports.entry(manager_id).or_default().push(edge.user_id);
        }

        for direct in reports.values_mut() {
            direct.sort_unstable();
            direct.dedup();
        }

        Self { reports, members }
    }

    /// Whether the user appears in the chart
    pub fn contains(&self, user_id: UserId) -> bool {
        self.members.contains(&user_id)
    }

    /// Direct reports of a manager
    pub fn direct_reports(&self, manager_id: UserId) -> &[UserId] {
        self.reports
            .get(&manager_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Transitive reports of `root`, excluding `root` itself
    ///
    /// Breadth-first with a visited set seeded with `root`, so every id is expanded at
    /// most once even when the manager graph contains cycles.
    pub fn closure(&self, root: UserId) -> HashSet<UserId> {
        let mut visited = HashSet::from([root]);
        let mut queue = VecDeque::from([root]);

        while let Some(current) = queue.pop_front() {
            for &report in self.direct_reports(current) {
                if visited.insert(report) {
                    queue.push_back(report);
                }
            }
        }

        visited.remove(&root);
        visited
    }

    /// Number of members in the chart
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the chart has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
