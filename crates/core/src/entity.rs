//! Entity trait: identity assigned by the directory.

/// Entity marker + minimal interface.
///
/// Directory records (roles, permissions) are identified by their id, not by
/// their attribute values; two records with the same id are the same record.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
