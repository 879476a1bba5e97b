//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Storage keys records by this identifier; two values with the same id are the
/// same record at different points in time.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Ord + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
