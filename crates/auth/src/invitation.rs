//! Relative-authority rules for invitations and account management.
//!
//! These compare two parties' levels rather than checking absolute grants.
//! Inviting is non-strict (peers may invite peers); revoking someone else's
//! invitation and managing another account are strict.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{RoleCode, RoleHierarchy};

/// Who created an invitation, from the point of view of the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitedBy {
    /// The current user sent it.
    #[serde(rename = "self")]
    CurrentUser,
    Other,
}

/// A pending or accepted invitation as seen by invitation screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationRecord {
    pub invited_role: RoleCode,
    pub inviter_role: RoleCode,
    pub invited_by: InvitedBy,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("cannot invite role at level {invitee_level} (your level: {inviter_level})")]
    CannotInvite { inviter_level: i32, invitee_level: i32 },

    #[error("cannot delete an invitation sent at level {inviter_level} (your level: {user_level})")]
    CannotDeleteInvitation { user_level: i32, inviter_level: i32 },

    #[error("cannot manage an account at level {target_level} (your level: {actor_level})")]
    CannotManageAccount { actor_level: i32, target_level: i32 },
}

#[derive(Debug, Clone, Default)]
pub struct InvitationPolicy {
    hierarchy: Arc<RoleHierarchy>,
}

impl InvitationPolicy {
    pub fn new(hierarchy: Arc<RoleHierarchy>) -> Self {
        Self { hierarchy }
    }

    pub fn hierarchy(&self) -> &RoleHierarchy {
        &self.hierarchy
    }

    pub fn can_invite_role(&self, inviter: &str, invitee: &str) -> bool {
        self.hierarchy.can_invite_role(inviter, invitee)
    }

    pub fn invitable_roles(&self, inviter: &str) -> Vec<RoleCode> {
        self.hierarchy.invitable_roles(inviter)
    }

    /// Own invitations can always be deleted; others' only from strictly above.
    pub fn can_delete_invitation(&self, user_role: &str, inviter_role: &str, invited_by: InvitedBy) -> bool {
        invited_by == InvitedBy::CurrentUser
            || self.hierarchy.level_of(user_role) < self.hierarchy.level_of(inviter_role)
    }

    pub fn can_delete(&self, record: &InvitationRecord, user_role: &str) -> bool {
        self.can_delete_invitation(user_role, record.inviter_role.as_str(), record.invited_by)
    }

    /// Suspending or editing another account needs strictly higher authority.
    pub fn can_manage_account(&self, actor_role: &str, target_role: &str) -> bool {
        self.hierarchy.level_of(actor_role) < self.hierarchy.level_of(target_role)
    }

    pub fn check_invite(&self, inviter: &str, invitee: &str) -> Result<(), PolicyError> {
        if self.can_invite_role(inviter, invitee) {
            return Ok(());
        }
        Err(PolicyError::CannotInvite {
            inviter_level: self.hierarchy.level_of(inviter),
            invitee_level: self.hierarchy.level_of(invitee),
        })
    }

    pub fn check_delete_invitation(
        &self,
        user_role: &str,
        inviter_role: &str,
        invited_by: InvitedBy,
    ) -> Result<(), PolicyError> {
        if self.can_delete_invitation(user_role, inviter_role, invited_by) {
            return Ok(());
        }
        Err(PolicyError::CannotDeleteInvitation {
            user_level: self.hierarchy.level_of(user_role),
            inviter_level: self.hierarchy.level_of(inviter_role),
        })
    }

    pub fn check_manage_account(&self, actor_role: &str, target_role: &str) -> Result<(), PolicyError> {
        if self.can_manage_account(actor_role, target_role) {
            return Ok(());
        }
        Err(PolicyError::CannotManageAccount {
            actor_level: self.hierarchy.level_of(actor_role),
            target_level: self.hierarchy.level_of(target_role),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn policy() -> InvitationPolicy {
        InvitationPolicy::default()
    }

    #[test]
    fn supervisor_cannot_delete_managers_invitation() {
        let p = policy();
        assert!(!p.can_delete_invitation("supervisor", "manager", InvitedBy::Other));
        assert!(p.can_delete_invitation("supervisor", "manager", InvitedBy::CurrentUser));
    }

    #[test]
    fn peers_can_invite_but_not_revoke_each_other() {
        let p = policy();
        assert!(p.can_invite_role("manager", "manager"));
        assert!(!p.can_delete_invitation("manager", "manager", InvitedBy::Other));
    }

    #[test]
    fn higher_authority_can_revoke() {
        let p = policy();
        assert!(p.can_delete_invitation("admin", "manager", InvitedBy::Other));
    }

    #[test]
    fn record_convenience_and_serde() {
        let record: InvitationRecord = serde_json::from_str(
            r#"{"invited_role":"viewer","inviter_role":"director","invited_by":"self"}"#,
        )
        .unwrap();
        assert_eq!(record.invited_by, InvitedBy::CurrentUser);
        assert!(policy().can_delete(&record, "viewer"));
    }

    #[test]
    fn check_variants_carry_levels() {
        let p = policy();
        assert_eq!(
            p.check_invite("viewer", "admin"),
            Err(PolicyError::CannotInvite {
                inviter_level: 10,
                invitee_level: 3
            })
        );
        assert!(p.check_manage_account("admin", "manager").is_ok());
        let err = p.check_manage_account("manager", "manager").unwrap_err();
        assert!(err.to_string().contains("level 6"));
        assert!(p.check_delete_invitation("developer", "admin", InvitedBy::Other).is_ok());
    }

    #[test]
    fn unknown_roles_never_gain_authority() {
        let p = policy();
        assert!(!p.can_manage_account("contractor", "viewer"));
        assert!(!p.can_delete_invitation("contractor", "viewer", InvitedBy::Other));
    }

    #[test]
    fn unknown_roles_stay_powerless_with_wide_tables() {
        let table = RoleHierarchy::from_json(r#"{"levels":{"owner":1,"guest":1000}}"#).unwrap();
        let p = InvitationPolicy::new(Arc::new(table));
        assert!(!p.can_invite_role("intern", "guest"));
        assert!(!p.can_manage_account("intern", "guest"));
        assert!(!p.can_delete_invitation("intern", "guest", InvitedBy::Other));
        assert!(p.can_manage_account("guest", "intern"));
    }

    fn role() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec![
            "developer", "admin", "manager", "supervisor", "viewer", "unlisted",
        ])
    }

    proptest! {
        #[test]
        fn delete_rule(user in role(), inviter in role()) {
            let p = policy();
            prop_assert!(p.can_delete_invitation(user, inviter, InvitedBy::CurrentUser));
            let h = p.hierarchy();
            prop_assert_eq!(
                p.can_delete_invitation(user, inviter, InvitedBy::Other),
                h.level_of(user) < h.level_of(inviter)
            );
        }
    }
}
