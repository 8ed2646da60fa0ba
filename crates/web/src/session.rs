//! Session lifecycle: which role is active and when its snapshot is replaced.
//!
//! Sign-in and role changes load a fresh snapshot; sign-out discards it. The
//! authentication layer that produces these events is outside this crate.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use opsdesk_auth::{AccessContext, InvitationPolicy, InvitationRecord, RoleCode, RoleHierarchy};
use opsdesk_infra::{AccessConfig, DirectoryError, DirectoryService, LoadOutcome, PermissionStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    SignedIn { role: RoleCode },
    RoleChanged { role: RoleCode },
    SignedOut,
}

/// Owns the session's permission store and the invitation policy over the
/// same role hierarchy.
#[derive(Debug, Clone)]
pub struct SessionController {
    store: Arc<PermissionStore>,
    policy: InvitationPolicy,
}

impl SessionController {
    pub fn new(directory: Arc<dyn DirectoryService>, hierarchy: Arc<RoleHierarchy>) -> Self {
        Self {
            store: Arc::new(PermissionStore::new(directory, hierarchy.clone())),
            policy: InvitationPolicy::new(hierarchy),
        }
    }

    /// Controller backed by the platform REST directory.
    pub fn from_config(config: &AccessConfig) -> Result<Self, DirectoryError> {
        let directory = opsdesk_infra::directory::RestDirectory::new(config)?;
        Ok(Self::new(Arc::new(directory), config.hierarchy.clone()))
    }

    /// Apply a lifecycle event. Returns the load outcome for sign-in / role change.
    pub async fn handle(&self, event: SessionEvent) -> Option<LoadOutcome> {
        match event {
            SessionEvent::SignedIn { role } | SessionEvent::RoleChanged { role } => {
                tracing::info!(role = %role, "loading permissions for session role");
                Some(self.store.load(&role).await)
            }
            SessionEvent::SignedOut => {
                tracing::info!("session ended; discarding permission snapshot");
                self.store.clear();
                None
            }
        }
    }

    pub fn store(&self) -> &Arc<PermissionStore> {
        &self.store
    }

    pub fn access(&self) -> Arc<AccessContext> {
        self.store.current()
    }

    pub fn policy(&self) -> &InvitationPolicy {
        &self.policy
    }

    /// Roles the signed-in user may invite; nothing when signed out.
    pub fn invitable_roles(&self) -> Vec<RoleCode> {
        match self.access().role() {
            Some(role) => self.policy.invitable_roles(role.as_str()),
            None => Vec::new(),
        }
    }

    /// Whether the signed-in user may delete `record`.
    pub fn can_delete_invitation(&self, record: &InvitationRecord) -> bool {
        self.access()
            .role()
            .is_some_and(|role| self.policy.can_delete(record, role.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdesk_auth::InvitedBy;
    use opsdesk_infra::InMemoryDirectory;

    fn controller() -> SessionController {
        let directory = Arc::new(InMemoryDirectory::new());
        let supervisor = directory.add_role("supervisor", "Supervisor", 7);
        let manager = directory.add_role("manager", "Manager", 6);
        let checklist = directory.add_permission("checklist", "create", "organization");
        let inspection = directory.add_permission("inspection", "approve", "organization");
        directory.grant(supervisor, checklist);
        directory.grant(manager, checklist);
        directory.grant(manager, inspection);

        SessionController::new(directory, Arc::new(RoleHierarchy::default()))
    }

    #[tokio::test]
    async fn sign_in_role_change_sign_out() {
        let session = controller();

        let outcome = session
            .handle(SessionEvent::SignedIn {
                role: RoleCode::new("supervisor"),
            })
            .await
            .unwrap();
        assert!(outcome.is_applied());
        assert!(session.access().has_permission_str("checklist.create.organization"));
        assert!(!session.access().has_permission_str("inspection.approve.organization"));

        session
            .handle(SessionEvent::RoleChanged {
                role: RoleCode::new("manager"),
            })
            .await;
        assert_eq!(session.access().snapshot().len(), 2);

        assert!(session.handle(SessionEvent::SignedOut).await.is_none());
        assert!(session.access().role().is_none());
        assert!(session.access().snapshot().is_empty());
    }

    #[tokio::test]
    async fn invitation_helpers_follow_active_role() {
        let session = controller();
        assert!(session.invitable_roles().is_empty());

        session
            .handle(SessionEvent::SignedIn {
                role: RoleCode::new("supervisor"),
            })
            .await;

        let invitable: Vec<_> = session.invitable_roles().iter().map(|r| r.to_string()).collect();
        assert_eq!(invitable, vec!["supervisor", "technician", "employee", "viewer"]);

        let managers = InvitationRecord {
            invited_role: RoleCode::new("employee"),
            inviter_role: RoleCode::new("manager"),
            invited_by: InvitedBy::Other,
        };
        assert!(!session.can_delete_invitation(&managers));

        let own = InvitationRecord {
            invited_by: InvitedBy::CurrentUser,
            ..managers
        };
        assert!(session.can_delete_invitation(&own));
    }

    #[test]
    fn from_config_starts_signed_out() {
        let config = AccessConfig::default().with_api_url("https://ops.example.com/api");
        let session = SessionController::from_config(&config).unwrap();
        assert!(session.access().role().is_none());
        assert_eq!(session.policy().hierarchy().level_of("viewer"), 10);
    }

    #[test]
    fn events_deserialize_from_auth_layer_json() {
        let event: SessionEvent = serde_json::from_str(r#"{"type":"signed_in","role":"viewer"}"#).unwrap();
        assert_eq!(
            event,
            SessionEvent::SignedIn {
                role: RoleCode::new("viewer")
            }
        );
    }
}
