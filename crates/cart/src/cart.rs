use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde_json::{Map, Value as JsonValue};

use krishna_catalog::{Catalog, Product};
use krishna_core::{DomainError, DomainResult, Entity, ProductId};
use krishna_session::Session;

use crate::entry::CartEntry;
use crate::lines::{CartLine, CartLines};

/// Where the cart lives inside the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSettings {
    pub session_key: String,
}

impl CartSettings {
    pub const DEFAULT_SESSION_KEY: &'static str = "cart";

    pub fn new(session_key: impl Into<String>) -> Self {
        Self {
            session_key: session_key.into(),
        }
    }
}

impl Default for CartSettings {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SESSION_KEY)
    }
}

/// Shopping cart view over one request's session.
///
/// Every mutating call writes the whole mapping back into the session and
/// marks it modified; persisting the session itself is the session store's
/// job (see `SessionStore::save_if_modified`).
#[derive(Debug)]
pub struct Cart<'s> {
    session: &'s mut Session,
    key: String,
    entries: BTreeMap<ProductId, CartEntry>,
}

impl<'s> Cart<'s> {
    /// Bind a cart to `session`, creating an empty mapping if none exists.
    ///
    /// Stored data is validated: a value that is not a mapping is replaced by
    /// an empty one, and entries that do not decode are dropped. Any repair is
    /// written back immediately.
    pub fn load(session: &'s mut Session, settings: &CartSettings) -> Self {
        let key = settings.session_key.clone();
        let (entries, needs_write) = match session.get(&key) {
            None => (BTreeMap::new(), true),
            Some(JsonValue::Object(map)) => decode_entries(map),
            Some(other) => {
                tracing::warn!(
                    session_id = %session.id(),
                    found = %json_kind(other),
                    "cart data is not a mapping; resetting cart"
                );
                (BTreeMap::new(), true)
            }
        };

        let mut cart = Self {
            session,
            key,
            entries,
        };
        if needs_write {
            cart.save();
        }
        cart
    }

    /// Add `quantity` of `product`, or set the quantity outright when
    /// `override_quantity` is true.
    ///
    /// A new entry snapshots the product's current price, weight (zero when
    /// absent) and metal type; later adds keep that snapshot. A zero quantity
    /// is rejected rather than leaving an empty entry behind (use
    /// [`Cart::remove`]). Returns the entry's new quantity.
    pub fn add(&mut self, product: &Product, quantity: u32, override_quantity: bool) -> DomainResult<u32> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }

        let id = product.id();
        let current = self.entries.get(&id).map(CartEntry::quantity).unwrap_or(0);
        let updated = if override_quantity {
            quantity
        } else {
            current.checked_add(quantity).ok_or_else(|| {
                DomainError::validation(format!("quantity for product {id} would overflow"))
            })?
        };

        self.entries
            .entry(id)
            .or_insert_with(|| CartEntry::snapshot(product))
            .set_quantity(updated);
        self.save();

        tracing::debug!(
            product_id = %id,
            quantity = updated,
            override_quantity,
            "cart entry updated"
        );
        Ok(updated)
    }

    /// Remove a product's entry. Returns whether anything was removed.
    pub fn remove(&mut self, product: &Product) -> bool {
        self.remove_id(product.id())
    }

    /// Remove an entry by product id, including entries whose product has
    /// since disappeared from the catalog.
    pub fn remove_id(&mut self, id: ProductId) -> bool {
        if self.entries.remove(&id).is_none() {
            return false;
        }
        self.save();
        tracing::debug!(product_id = %id, "cart entry removed");
        true
    }

    /// Enriched lines for every entry whose product still exists in `catalog`.
    pub fn lines<C>(&self, catalog: &C) -> CartLines<'_>
    where
        C: Catalog + ?Sized,
    {
        let ids: BTreeSet<ProductId> = self.entries.keys().copied().collect();
        let products = if ids.is_empty() {
            Vec::new()
        } else {
            catalog.find_products_by_ids(&ids)
        };
        CartLines::new(&self.entries, products)
    }

    /// Collected form of [`Cart::lines`].
    pub fn line_items<C>(&self, catalog: &C) -> Vec<CartLine>
    where
        C: Catalog + ?Sized,
    {
        self.lines(catalog).collect()
    }

    /// Raw entry for a product, without catalog enrichment.
    pub fn get_entry(&self, id: ProductId) -> Option<&CartEntry> {
        self.entries.get(&id)
    }

    pub fn entries(&self) -> impl Iterator<Item = (ProductId, &CartEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    /// Total number of units (sum of quantities), not distinct products.
    pub fn item_count(&self) -> u64 {
        self.entries.values().map(|e| u64::from(e.quantity())).sum()
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Σ snapshot price × quantity.
    pub fn total_price(&self) -> Decimal {
        self.entries.values().map(CartEntry::total_price).sum()
    }

    /// Σ snapshot weight × quantity.
    pub fn total_weight(&self) -> Decimal {
        self.entries.values().map(CartEntry::total_weight).sum()
    }

    /// Remove the cart from the session entirely (the key is deleted, not
    /// emptied). A later [`Cart::load`] starts from a fresh empty mapping.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.session.remove(&self.key);
        self.session.mark_modified();
        tracing::debug!(session_id = %self.session.id(), "cart cleared");
    }

    fn save(&mut self) {
        let encoded: Map<String, JsonValue> = self
            .entries
            .iter()
            .map(|(id, entry)| (id.to_string(), entry.encode()))
            .collect();
        self.session.insert(self.key.clone(), JsonValue::Object(encoded));
    }
}

fn decode_entries(map: &Map<String, JsonValue>) -> (BTreeMap<ProductId, CartEntry>, bool) {
    let mut entries = BTreeMap::new();
    let mut dropped = 0usize;

    for (key, value) in map {
        let decoded = key
            .parse::<ProductId>()
            .and_then(|id| CartEntry::decode(value).map(|entry| (id, entry)));
        match decoded {
            Ok((id, entry)) => {
                entries.insert(id, entry);
            }
            Err(e) => {
                dropped += 1;
                tracing::warn!(key = %key, error = %e, "dropping malformed cart entry");
            }
        }
    }

    (entries, dropped > 0)
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
