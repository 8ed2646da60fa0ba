//! `opsdesk-core`: shared building blocks for the access core.
//!
//! Typed identifiers issued by the directory and the domain error model.
//! No I/O lives here.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{PermissionId, RoleId};
