//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values (a slug,
/// a metal type, a cart entry snapshot). Contrast with [`crate::Entity`], where
/// two records with the same primary key are the same record.
///
/// To "modify" a value object, build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
