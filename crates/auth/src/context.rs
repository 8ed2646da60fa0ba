//! Query API used by UI code against the live session state.

use std::sync::Arc;

use crate::{evaluate, PermissionSnapshot, RoleCode, RoleHierarchy};

/// The active role, its resolved snapshot, and the hierarchy it is ranked in.
///
/// Immutable. The permission store swaps in a new context on every load or
/// logout; readers hold an `Arc` to whichever context was live when they asked.
#[derive(Debug, Clone)]
pub struct AccessContext {
    role: Option<RoleCode>,
    snapshot: Arc<PermissionSnapshot>,
    hierarchy: Arc<RoleHierarchy>,
    generation: u64,
}

impl AccessContext {
    /// A signed-out context: no role, nothing granted.
    pub fn anonymous(hierarchy: Arc<RoleHierarchy>) -> Self {
        Self {
            role: None,
            snapshot: Arc::new(PermissionSnapshot::empty()),
            hierarchy,
            generation: 0,
        }
    }

    pub fn new(role: RoleCode, snapshot: PermissionSnapshot, hierarchy: Arc<RoleHierarchy>) -> Self {
        Self {
            role: Some(role),
            snapshot: Arc::new(snapshot),
            hierarchy,
            generation: 0,
        }
    }

    /// Stamp the load generation this context was produced by.
    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    pub fn role(&self) -> Option<&RoleCode> {
        self.role.as_ref()
    }

    pub fn snapshot(&self) -> &PermissionSnapshot {
        &self.snapshot
    }

    pub fn hierarchy(&self) -> &RoleHierarchy {
        &self.hierarchy
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Level of the active role; `None` when signed out.
    pub fn level(&self) -> Option<i32> {
        self.role.as_ref().map(|r| self.hierarchy.level_of(r.as_str()))
    }

    pub fn has_permission(&self, resource_type: &str, action: &str, scope: &str) -> bool {
        evaluate::has_permission(&self.snapshot, resource_type, action, scope)
    }

    pub fn has_permission_str(&self, permission: &str) -> bool {
        evaluate::has_permission_str(&self.snapshot, permission)
    }

    pub fn has_any_permission<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        evaluate::has_any_permission(&self.snapshot, permissions)
    }

    pub fn has_all_permissions<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        evaluate::has_all_permissions(&self.snapshot, permissions)
    }

    /// Active role is at least as powerful as `min_level`. Signed out never is.
    pub fn has_role_level(&self, min_level: i32) -> bool {
        self.role
            .as_ref()
            .is_some_and(|r| self.hierarchy.has_required_level(r.as_str(), min_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Permission;
    use chrono::Utc;
    use opsdesk_core::PermissionId;

    #[test]
    fn anonymous_context_denies_everything() {
        let ctx = AccessContext::anonymous(Arc::new(RoleHierarchy::default()));
        assert!(!ctx.has_role_level(UNREACHABLE));
        assert!(!ctx.has_permission_str("task.read.own"));
        assert_eq!(ctx.level(), None);
    }

    const UNREACHABLE: i32 = i32::MAX;

    #[test]
    fn queries_go_through_role_and_snapshot() {
        let snapshot = PermissionSnapshot::new(
            RoleCode::new("admin"),
            vec![Permission::new(PermissionId::new(), "report", "export", "organization")],
            Utc::now(),
        );
        let ctx = AccessContext::new(RoleCode::new("admin"), snapshot, Arc::new(RoleHierarchy::default()))
            .with_generation(4);

        assert_eq!(ctx.level(), Some(3));
        assert!(ctx.has_role_level(3));
        assert!(!ctx.has_role_level(2));
        assert!(ctx.has_permission("report", "export", "organization"));
        assert!(ctx.has_any_permission(&["report.export.organization", "x.y.z"]));
        assert!(!ctx.has_all_permissions(&["report.export.organization", "x.y.z"]));
        assert_eq!(ctx.generation(), 4);
    }
}
