//! Entity trait: identity owned by the remote store.

/// Entity marker + minimal interface.
///
/// Local caches use the identifier to remove entries after a confirmed delete.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
