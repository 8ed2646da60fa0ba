//! Infrastructure layer: directory adapters, snapshot loading, configuration.

pub mod config;
pub mod directory;
pub mod permission_store;

pub use config::AccessConfig;
pub use directory::{DirectoryError, DirectoryService, InMemoryDirectory, RoleGrantRecord};
pub use permission_store::{LoadOutcome, PermissionStore};
