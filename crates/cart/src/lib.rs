//! Session-backed shopping cart.
//!
//! The cart is a per-session mapping of product id → quantity plus a snapshot
//! of the product's price, weight and metal type taken when it was first added.
//! It lives entirely inside the web session under one configured key; a
//! [`Cart`] value is a short-lived view bound to one request's session.

pub mod cart;
pub mod entry;
pub mod lines;

pub use cart::{Cart, CartSettings};
pub use entry::{CartEntry, CartEntryRecord};
pub use lines::{CartLine, CartLines};
