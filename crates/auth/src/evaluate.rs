//! Pure permission checks against a [`PermissionSnapshot`].
//!
//! - No IO
//! - No panics
//! - Malformed permission strings never match (and are logged as caller bugs)

use crate::{PermissionKey, PermissionSnapshot};

/// Exact match on all three fields.
pub fn has_permission(snapshot: &PermissionSnapshot, resource_type: &str, action: &str, scope: &str) -> bool {
    snapshot.contains(resource_type, action, scope)
}

/// Check a canonical `resource_type.action.scope` string.
pub fn has_permission_str(snapshot: &PermissionSnapshot, permission: &str) -> bool {
    match PermissionKey::parse(permission) {
        Ok(key) => snapshot.contains_key(&key),
        Err(err) => {
            tracing::warn!(permission, error = %err, "malformed permission string evaluated as denied");
            false
        }
    }
}

/// `true` iff at least one entry matches. An empty list matches nothing.
pub fn has_any_permission<S: AsRef<str>>(snapshot: &PermissionSnapshot, permissions: &[S]) -> bool {
    permissions.iter().any(|p| has_permission_str(snapshot, p.as_ref()))
}

/// `true` iff every entry matches. An empty list is vacuously satisfied.
pub fn has_all_permissions<S: AsRef<str>>(snapshot: &PermissionSnapshot, permissions: &[S]) -> bool {
    permissions.iter().all(|p| has_permission_str(snapshot, p.as_ref()))
}
