use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use opsdesk_auth::{Permission, RoleCode, RoleRecord};
use opsdesk_core::{PermissionId, RoleId};

use super::{DirectoryError, DirectoryService, RoleGrantRecord};

#[derive(Debug, Default)]
struct Catalog {
    roles: Vec<RoleRecord>,
    grants: HashMap<RoleId, Vec<PermissionId>>,
    permissions: Vec<Permission>,
    grant_delays: HashMap<RoleId, Duration>,
    outage: Option<DirectoryError>,
}

/// In-memory directory for tests/dev.
///
/// Supports an injected outage (every query fails) and a per-role delay on the
/// grant query, to exercise out-of-order load completion.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    inner: RwLock<Catalog>,
    queries: AtomicUsize,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_role(&self, code: impl Into<RoleCode>, name: impl Into<String>, level: i32) -> RoleId {
        let id = RoleId::new();
        self.write().roles.push(RoleRecord {
            id,
            code: code.into(),
            name: name.into(),
            level,
        });
        id
    }

    pub fn add_permission(
        &self,
        resource_type: impl Into<String>,
        action: impl Into<String>,
        scope: impl Into<String>,
    ) -> PermissionId {
        let id = PermissionId::new();
        self.write()
            .permissions
            .push(Permission::new(id, resource_type, action, scope));
        id
    }

    pub fn grant(&self, role_id: RoleId, permission_id: PermissionId) {
        self.write().grants.entry(role_id).or_default().push(permission_id);
    }

    /// Delay the grant query for `role_id`.
    pub fn delay_grants(&self, role_id: RoleId, delay: Duration) {
        self.write().grant_delays.insert(role_id, delay);
    }

    /// Make every subsequent query fail with `error` (`None` restores service).
    pub fn set_outage(&self, error: Option<DirectoryError>) {
        self.write().outage = error;
    }

    /// Number of queries served (or refused) so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    // A panicking test thread must not hide the catalog from the rest of the test.
    fn write(&self) -> RwLockWriteGuard<'_, Catalog> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read<T>(&self, f: impl FnOnce(&Catalog) -> T) -> Result<T, DirectoryError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let catalog = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(err) = &catalog.outage {
            return Err(err.clone());
        }
        Ok(f(&catalog))
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
impl DirectoryService for InMemoryDirectory {
    async fn list_roles(&self) -> Result<Vec<RoleRecord>, DirectoryError> {
        self.read(|c| c.roles.clone())
    }

    async fn list_role_grants(&self, role_id: RoleId) -> Result<Vec<RoleGrantRecord>, DirectoryError> {
        let (grants, delay) = self.read(|c| {
            let grants: Vec<RoleGrantRecord> = c
                .grants
                .get(&role_id)
                .map(|ids| ids.iter().map(|&permission_id| RoleGrantRecord { permission_id }).collect())
                .unwrap_or_default();
            (grants, c.grant_delays.get(&role_id).copied())
        })?;

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(grants)
    }

    async fn list_permissions(&self) -> Result<Vec<Permission>, DirectoryError> {
        self.read(|c| c.permissions.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{self, AssertUnwindSafe};

    use super::*;

    #[tokio::test]
    async fn writes_land_after_a_panic_poisoned_the_catalog() {
        let directory = InMemoryDirectory::new();
        let _ = panic::catch_unwind(AssertUnwindSafe(|| {
            let _guard = directory.inner.write().unwrap();
            panic!("fixture setup failed");
        }));
        assert!(directory.inner.is_poisoned());

        let role = directory.add_role("viewer", "Viewer", 10);
        let permission = directory.add_permission("task", "read", "own");
        directory.grant(role, permission);

        let roles = directory.list_roles().await.unwrap();
        assert_eq!(roles.iter().map(|r| r.id).collect::<Vec<_>>(), vec![role]);
        let grants = directory.list_role_grants(role).await.unwrap();
        assert_eq!(grants, vec![RoleGrantRecord { permission_id: permission }]);
    }
}
