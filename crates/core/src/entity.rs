//! Entity trait: identity + continuity across versions.

/// Entity marker + minimal interface.
///
/// Two loaded content objects are "the same content" when their ids are
/// equal, regardless of which version or culture instance was loaded.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
