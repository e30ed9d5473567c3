//! Cart entries and their session encoding.
//!
//! Session wire shape of one entry:
//!
//! ```json
//! { "quantity": 2, "price": "19.99", "weight": "4.50", "metal_type": "GD" }
//! ```
//!
//! `price` and `weight` are always exact decimal strings. They must never be
//! written as JSON numbers, which most session serializers round-trip through
//! binary floating point.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};

use krishna_catalog::{MetalType, Product};
use krishna_core::{DecimalField, DomainError, DomainResult, ValueObject};

/// One product's line in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEntry {
    quantity: u32,
    price: Decimal,
    weight: Decimal,
    metal_type: MetalType,
}

impl CartEntry {
    /// Snapshot a product with a zero quantity. Callers set the quantity
    /// before the entry is stored.
    pub(crate) fn snapshot(product: &Product) -> Self {
        Self {
            quantity: 0,
            price: product.price(),
            weight: product.weight_or_zero(),
            metal_type: product.metal_type(),
        }
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price captured at first add.
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Unit weight captured at first add (zero when the product had none).
    pub fn weight(&self) -> Decimal {
        self.weight
    }

    pub fn metal_type(&self) -> MetalType {
        self.metal_type
    }

    /// `price * quantity`.
    pub fn total_price(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// `weight * quantity`.
    pub fn total_weight(&self) -> Decimal {
        self.weight * Decimal::from(self.quantity)
    }

    pub fn to_record(&self) -> CartEntryRecord {
        CartEntryRecord {
            quantity: u64::from(self.quantity),
            price: self.price.to_string(),
            weight: Some(self.weight.to_string()),
            metal_type: self.metal_type.code().to_string(),
        }
    }

    pub fn encode(&self) -> JsonValue {
        json!({
            "quantity": self.quantity,
            "price": self.price.to_string(),
            "weight": self.weight.to_string(),
            "metal_type": self.metal_type.code(),
        })
    }

    /// Decode and validate one stored entry.
    pub fn decode(value: &JsonValue) -> DomainResult<Self> {
        let record: CartEntryRecord = serde_json::from_value(value.clone())
            .map_err(|e| DomainError::validation(format!("malformed cart entry: {e}")))?;
        Self::try_from(record)
    }
}

impl ValueObject for CartEntry {}

/// Serialized form of a [`CartEntry`].
///
/// `weight` may be missing in entries written before weights were tracked; it
/// decodes as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntryRecord {
    pub quantity: u64,
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    pub metal_type: String,
}

impl TryFrom<CartEntryRecord> for CartEntry {
    type Error = DomainError;

    fn try_from(record: CartEntryRecord) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(record.quantity)
            .map_err(|_| DomainError::validation(format!("quantity {} out of range", record.quantity)))?;
        if quantity == 0 {
            return Err(DomainError::validation("stored quantity must be at least 1"));
        }

        let price = DecimalField::PRICE.parse(&record.price)?;
        let weight = match record.weight.as_deref() {
            Some(raw) => DecimalField::WEIGHT.parse(raw)?,
            None => Decimal::ZERO,
        };
        let metal_type = MetalType::from_code(&record.metal_type)?;

        Ok(Self {
            quantity,
            price,
            weight,
            metal_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(quantity: u32) -> CartEntry {
        CartEntry {
            quantity,
            price: dec!(19.99),
            weight: dec!(4.50),
            metal_type: MetalType::Gold,
        }
    }

    #[test]
    fn encode_writes_decimal_strings() {
        assert_eq!(
            entry(3).encode(),
            json!({ "quantity": 3, "price": "19.99", "weight": "4.50", "metal_type": "GD" })
        );
    }

    #[test]
    fn encoded_entry_decodes_to_the_same_record() {
        let encoded = entry(2).encode();
        assert_eq!(serde_json::from_value::<CartEntryRecord>(encoded.clone()).unwrap(), entry(2).to_record());
        assert_eq!(CartEntry::decode(&encoded).unwrap(), entry(2));
    }

    #[test]
    fn decode_accepts_legacy_entry_without_weight() {
        let decoded = CartEntry::decode(&json!({ "quantity": 2, "price": "10.00", "metal_type": "SL" })).unwrap();
        assert_eq!(decoded.weight(), Decimal::ZERO);
        assert_eq!(decoded.total_weight(), Decimal::ZERO);
        assert_eq!(decoded.metal_type(), MetalType::Silver);
    }

    #[test]
    fn decode_rejects_float_prices() {
        let err = CartEntry::decode(&json!({ "quantity": 1, "price": 19.99, "metal_type": "GD" })).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn decode_rejects_zero_and_negative_quantities() {
        assert!(CartEntry::decode(&json!({ "quantity": 0, "price": "1.00", "metal_type": "GD" })).is_err());
        assert!(CartEntry::decode(&json!({ "quantity": -2, "price": "1.00", "metal_type": "GD" })).is_err());
    }

    #[test]
    fn decode_rejects_unknown_metal() {
        assert!(CartEntry::decode(&json!({ "quantity": 1, "price": "1.00", "metal_type": "Gold" })).is_err());
    }

    #[test]
    fn totals_use_exact_decimals() {
        assert_eq!(entry(3).total_price(), dec!(59.97));
        assert_eq!(entry(3).total_weight(), dec!(13.50));
    }
}
