//! Entity trait: catalog records keyed by a primary key.

/// A persisted record with a stable identity.
///
/// Two entities are the same record when their ids match, even if other fields
/// differ (e.g. a product whose price was edited after it was put in a cart).
pub trait Entity {
    /// Strongly-typed primary key.
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the primary key.
    fn id(&self) -> Self::Id;

    /// Identity comparison (ignores field values).
    fn same_entity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
