//! `krishna-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the catalog and the
//! cart (no infrastructure concerns).

pub mod decimal;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use decimal::DecimalField;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, ProductId};
pub use value_object::ValueObject;
