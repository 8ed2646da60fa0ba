//! Directory service: the read-only source of roles, grants and permissions.
//!
//! The core only consumes three queries. Transport lives in the adapters:
//! - `InMemoryDirectory` for tests/dev
//! - `RestDirectory` (feature `http`) for the platform API

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use opsdesk_auth::{Permission, RoleCode, RoleRecord};
use opsdesk_core::{PermissionId, RoleId};

pub mod in_memory;
#[cfg(feature = "http")]
pub mod rest;

pub use in_memory::InMemoryDirectory;
#[cfg(feature = "http")]
pub use rest::RestDirectory;

/// One row of a role's grant list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrantRecord {
    pub permission_id: PermissionId,
}

/// Directory query or resolution failure.
///
/// Never surfaced to UI code: the permission store turns every variant into an
/// empty (deny-all) snapshot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),

    #[error("directory returned status {0}")]
    Status(u16),

    #[error("failed to decode directory response: {0}")]
    Decode(String),

    #[error("role '{0}' not found in directory catalog")]
    UnknownRole(RoleCode),

    #[error("grant references permission {0} missing from the catalog")]
    DanglingGrant(PermissionId),
}

/// Read-only directory contract.
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
pub trait DirectoryService: Send + Sync {
    async fn list_roles(&self) -> Result<Vec<RoleRecord>, DirectoryError>;

    async fn list_role_grants(&self, role_id: RoleId) -> Result<Vec<RoleGrantRecord>, DirectoryError>;

    async fn list_permissions(&self) -> Result<Vec<Permission>, DirectoryError>;

    /// Resolve every permission granted to `role`.
    ///
    /// Default: role catalog -> grant list -> permission catalog, joined
    /// client-side. Adapters with a single-call endpoint may override this.
    async fn resolve_role_permissions(&self, role: &RoleCode) -> Result<Vec<Permission>, DirectoryError> {
        let roles = self.list_roles().await?;
        let record = roles
            .into_iter()
            .find(|r| r.code == *role)
            .ok_or_else(|| DirectoryError::UnknownRole(role.clone()))?;

        let grants = self.list_role_grants(record.id).await?;
        let catalog = self.list_permissions().await?;

        join_grants(&grants, catalog)
    }
}

/// Map grant ids onto catalog entries. Repeated grants yield one permission.
pub fn join_grants(grants: &[RoleGrantRecord], catalog: Vec<Permission>) -> Result<Vec<Permission>, DirectoryError> {
    let mut by_id: HashMap<PermissionId, Permission> = catalog.into_iter().map(|p| (p.id, p)).collect();

    let mut resolved = Vec::with_capacity(grants.len());
    for grant in grants {
        match by_id.remove(&grant.permission_id) {
            Some(permission) => resolved.push(permission),
            None if resolved.iter().any(|p: &Permission| p.id == grant.permission_id) => {}
            None => {
                tracing::warn!(permission_id = %grant.permission_id, "grant points outside the permission catalog");
                return Err(DirectoryError::DanglingGrant(grant.permission_id));
            }
        }
    }
    Ok(resolved)
}
