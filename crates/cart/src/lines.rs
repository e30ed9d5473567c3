//! Cart entries joined against live catalog records.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::Serialize;

use krishna_catalog::{MetalType, Product};
use krishna_core::{Entity, ProductId};

use crate::entry::CartEntry;

/// One enriched cart line.
///
/// `price`, `weight` and `metal_type` come from the cart's snapshot, not from
/// `product`, so later catalog edits do not reprice what is already in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub product: Product,
    pub price: Decimal,
    pub weight: Decimal,
    pub quantity: u32,
    pub total_price: Decimal,
    pub metal_type: MetalType,
}

/// Iterator over enriched cart lines.
///
/// The catalog is queried once when the iterator is built; each line is
/// assembled on demand. Clone it before iterating to walk the lines again.
/// Order follows the catalog's bulk lookup, not insertion order.
#[derive(Debug, Clone)]
pub struct CartLines<'a> {
    products: Vec<Product>,
    entries: &'a BTreeMap<ProductId, CartEntry>,
    pos: usize,
    skipped: usize,
}

impl<'a> CartLines<'a> {
    pub(crate) fn new(entries: &'a BTreeMap<ProductId, CartEntry>, products: Vec<Product>) -> Self {
        // Keep one row per held product so `skipped` stays exact even if a
        // catalog returns extra or duplicate rows.
        let mut seen = BTreeSet::new();
        let products: Vec<Product> = products
            .into_iter()
            .filter(|p| entries.contains_key(&p.id()) && seen.insert(p.id()))
            .collect();
        let skipped = entries.len().saturating_sub(products.len());

        if skipped > 0 {
            let missing: Vec<String> = entries
                .keys()
                .filter(|id| !products.iter().any(|p| p.id() == **id))
                .map(|id| id.to_string())
                .collect();
            tracing::warn!(
                skipped,
                missing = ?missing,
                "cart holds products that are no longer in the catalog"
            );
        }

        Self {
            products,
            entries,
            pos: 0,
            skipped,
        }
    }

    /// Entries left out because their product no longer resolves.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for CartLines<'_> {
    type Item = CartLine;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(product) = self.products.get(self.pos) {
            self.pos += 1;
            let Some(entry) = self.entries.get(&product.id()) else {
                continue;
            };
            return Some(CartLine {
                product: product.clone(),
                price: entry.price(),
                weight: entry.weight(),
                quantity: entry.quantity(),
                total_price: entry.total_price(),
                metal_type: entry.metal_type(),
            });
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.products.len() - self.pos;
        (remaining, Some(remaining))
    }
}
