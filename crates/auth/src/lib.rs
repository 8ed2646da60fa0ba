//! `opsdesk-auth`: client-side RBAC evaluation (pure).
//!
//! Role authority ordering, permission snapshots and checks, declarative UI
//! guards and invitation authority rules. Loading snapshots from the
//! directory lives in `opsdesk-infra`; this crate does no IO.

pub mod context;
pub mod evaluate;
pub mod guard;
pub mod hierarchy;
pub mod invitation;
pub mod permissions;
pub mod roles;
pub mod snapshot;

pub use context::AccessContext;
pub use evaluate::{has_all_permissions, has_any_permission, has_permission, has_permission_str};
pub use guard::{
    present, AccessDecision, AccessGuard, AccessRequirement, DenialReason, FallbackMode, GuardView,
    DEFAULT_TOOLTIP,
};
pub use hierarchy::{RoleHierarchy, UNKNOWN_ROLE_LEVEL};
pub use invitation::{InvitationPolicy, InvitationRecord, InvitedBy, PolicyError};
pub use permissions::{Permission, PermissionKey};
pub use roles::{RoleCode, RoleRecord};
pub use snapshot::PermissionSnapshot;
