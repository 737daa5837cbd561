//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Line items are entities: two items with the same name, quantity and price
/// are still different rows if their ids differ.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Identity comparison, ignoring attribute values.
    fn same_identity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
