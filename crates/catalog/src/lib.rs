//! Catalog domain module.
//!
//! Categories and jewellery products, plus the read interface the cart uses to
//! enrich its entries with live product records.

pub mod catalog;
pub mod category;
pub mod product;

pub use catalog::{Catalog, InMemoryCatalog};
pub use category::{Category, Slug};
pub use product::{ImageRef, MetalType, NewProduct, Product};
