//! Session-scoped permission snapshot loading.
//!
//! One [`AccessContext`] is live at a time. Loads are last-request-wins: each
//! `load` takes a new generation number, and a response is only installed if
//! its generation is still the newest when it arrives. The generation check
//! and the swap run under the watch channel's write lock.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::watch;

use opsdesk_auth::{AccessContext, PermissionSnapshot, RoleCode, RoleHierarchy};

use crate::directory::DirectoryService;

/// Result of a [`PermissionStore::load`] call.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// This load was the newest when it completed; its context is now live.
    Applied(Arc<AccessContext>),
    /// A newer load or a logout was issued first; the result was dropped.
    Superseded,
}

impl LoadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, LoadOutcome::Applied(_))
    }

    pub fn context(&self) -> Option<&Arc<AccessContext>> {
        match self {
            LoadOutcome::Applied(ctx) => Some(ctx),
            LoadOutcome::Superseded => None,
        }
    }
}

pub struct PermissionStore {
    directory: Arc<dyn DirectoryService>,
    hierarchy: Arc<RoleHierarchy>,
    generation: AtomicU64,
    live: watch::Sender<Arc<AccessContext>>,
}

impl core::fmt::Debug for PermissionStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PermissionStore")
            .field("generation", &self.generation())
            .field("role", &self.current().role())
            .finish_non_exhaustive()
    }
}

impl PermissionStore {
    pub fn new(directory: Arc<dyn DirectoryService>, hierarchy: Arc<RoleHierarchy>) -> Self {
        let (live, _) = watch::channel(Arc::new(AccessContext::anonymous(hierarchy.clone())));
        Self {
            directory,
            hierarchy,
            generation: AtomicU64::new(0),
            live,
        }
    }

    /// Resolve `role`'s permissions and make them the live snapshot.
    ///
    /// Never fails: a directory error installs an empty snapshot for `role`
    /// (deny by default) and is logged.
    #[tracing::instrument(skip_all, fields(role = %role))]
    pub async fn load(&self, role: &RoleCode) -> LoadOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let snapshot = match self.directory.resolve_role_permissions(role).await {
            Ok(permissions) => PermissionSnapshot::new(role.clone(), permissions, Utc::now()),
            Err(err) => {
                tracing::error!(error = %err, "permission resolution failed; denying by default");
                PermissionSnapshot::new(role.clone(), Vec::new(), Utc::now())
            }
        };

        let context = Arc::new(
            AccessContext::new(role.clone(), snapshot, self.hierarchy.clone()).with_generation(generation),
        );

        let applied = self.live.send_if_modified(|current| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *current = context.clone();
            true
        });

        if applied {
            tracing::debug!(generation, permissions = context.snapshot().len(), "permission snapshot applied");
            LoadOutcome::Applied(context)
        } else {
            tracing::debug!(generation, "stale permission load discarded");
            LoadOutcome::Superseded
        }
    }

    /// Load the active role again, replacing its snapshot.
    pub async fn reload(&self) -> Option<LoadOutcome> {
        let role = self.current().role().cloned()?;
        Some(self.load(&role).await)
    }

    /// Discard the session (logout). In-flight loads are superseded.
    pub fn clear(&self) {
        self.live.send_modify(|current| {
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *current = Arc::new(AccessContext::anonymous(self.hierarchy.clone()).with_generation(generation));
        });
        tracing::debug!("permission snapshot cleared");
    }

    /// The live context.
    pub fn current(&self) -> Arc<AccessContext> {
        self.live.borrow().clone()
    }

    /// Receive every context swap (guards re-evaluate on change).
    pub fn subscribe(&self) -> watch::Receiver<Arc<AccessContext>> {
        self.live.subscribe()
    }

    pub fn hierarchy(&self) -> &Arc<RoleHierarchy> {
        &self.hierarchy
    }

    /// Number of loads/clears issued so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}
