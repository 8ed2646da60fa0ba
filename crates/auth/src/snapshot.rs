//! The resolved permission set of the active role.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};

use opsdesk_core::{Entity, PermissionId};

use crate::{Permission, PermissionKey, RoleCode};

/// Flattened set of [`Permission`]s held by a role at a point in time.
///
/// A snapshot is immutable. A reload builds a new one and swaps it in whole;
/// nothing is ever appended to a live snapshot.
#[derive(Debug, Clone, Default)]
pub struct PermissionSnapshot {
    role: Option<RoleCode>,
    permissions: BTreeMap<PermissionId, Permission>,
    index: HashSet<PermissionKey>,
    resolved_at: Option<DateTime<Utc>>,
}

impl PermissionSnapshot {
    /// The deny-everything snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot for `role`. Duplicate permission ids collapse to one entry.
    pub fn new(
        role: RoleCode,
        permissions: impl IntoIterator<Item = Permission>,
        resolved_at: DateTime<Utc>,
    ) -> Self {
        let permissions: BTreeMap<_, _> = permissions.into_iter().map(|p| (*p.id(), p)).collect();
        let index = permissions.values().map(Permission::key).collect();

        Self {
            role: Some(role),
            permissions,
            index,
            resolved_at: Some(resolved_at),
        }
    }

    /// Role this snapshot was resolved for; `None` for the empty snapshot.
    pub fn role(&self) -> Option<&RoleCode> {
        self.role.as_ref()
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    pub fn contains(&self, resource_type: &str, action: &str, scope: &str) -> bool {
        self.index.contains(&PermissionKey::new(resource_type, action, scope))
    }

    pub fn contains_key(&self, key: &PermissionKey) -> bool {
        self.index.contains(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.values()
    }

    /// Canonical permission strings, sorted.
    pub fn canonical_strings(&self) -> Vec<String> {
        let mut out: Vec<String> = self.index.iter().map(ToString::to_string).collect();
        out.sort();
        out
    }

    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

/// Snapshots are equal when they grant the same permissions to the same role.
impl PartialEq for PermissionSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.role == other.role && self.permissions == other.permissions
    }
}

impl Eq for PermissionSnapshot {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_collapse() {
        let p = Permission::new(PermissionId::new(), "task", "read", "own");
        let snapshot = PermissionSnapshot::new(
            RoleCode::new("viewer"),
            vec![p.clone(), p.clone(), p],
            Utc::now(),
        );
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains("task", "read", "own"));
    }

    #[test]
    fn empty_snapshot_grants_nothing() {
        let snapshot = PermissionSnapshot::empty();
        assert!(snapshot.is_empty());
        assert!(snapshot.role().is_none());
        assert!(!snapshot.contains("task", "read", "own"));
    }

    #[test]
    fn canonical_strings_are_sorted() {
        let snapshot = PermissionSnapshot::new(
            RoleCode::new("manager"),
            vec![
                Permission::new(PermissionId::new(), "task", "update", "organization"),
                Permission::new(PermissionId::new(), "asset", "read", "organization"),
            ],
            Utc::now(),
        );
        assert_eq!(
            snapshot.canonical_strings(),
            vec!["asset.read.organization", "task.update.organization"]
        );
    }
}
