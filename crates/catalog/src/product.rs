use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use krishna_core::{CategoryId, DecimalField, DomainError, DomainResult, Entity, ProductId, ValueObject};

const MAX_NAME_LEN: usize = 200;
const MAX_KARAT: u16 = i16::MAX as u16;

/// Metal/material a piece is made of.
///
/// Persisted (and snapshotted into carts) as its two-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetalType {
    #[serde(rename = "GD")]
    Gold,
    #[serde(rename = "DM")]
    Diamond,
    #[serde(rename = "PT")]
    Platinum,
    #[serde(rename = "SL")]
    Silver,
}

impl MetalType {
    pub const ALL: [MetalType; 4] = [
        MetalType::Gold,
        MetalType::Diamond,
        MetalType::Platinum,
        MetalType::Silver,
    ];

    pub fn code(self) -> &'static str {
        match self {
            MetalType::Gold => "GD",
            MetalType::Diamond => "DM",
            MetalType::Platinum => "PT",
            MetalType::Silver => "SL",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MetalType::Gold => "Gold",
            MetalType::Diamond => "Diamond",
            MetalType::Platinum => "Platinum",
            MetalType::Silver => "Silver",
        }
    }

    pub fn from_code(code: &str) -> DomainResult<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.code() == code)
            .ok_or_else(|| DomainError::validation(format!("unknown metal type code {code:?}")))
    }
}

impl ValueObject for MetalType {}

impl core::fmt::Display for MetalType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Opaque reference to a stored product image (e.g. `products/ring-01.jpg`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Upload directory for product images.
    pub const UPLOAD_TO: &'static str = "products/";

    /// A bare file name is placed under [`ImageRef::UPLOAD_TO`]; anything
    /// containing a `/` is kept as given.
    pub fn new(path: impl Into<String>) -> DomainResult<Self> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(DomainError::validation("image reference cannot be empty"));
        }
        if path.contains('/') {
            Ok(Self(path))
        } else {
            Ok(Self(format!("{}{path}", Self::UPLOAD_TO)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Input for creating a product record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub category: CategoryId,
    pub name: String,
    pub description: String,
    pub metal_type: MetalType,
    pub price: Decimal,
    pub weight: Option<Decimal>,
    pub karat: Option<u16>,
    pub image: ImageRef,
    pub available: bool,
}

/// Catalog product.
///
/// Immutable from the cart's point of view: the cart copies price, weight and
/// metal type into its own entry when the product is first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    id: ProductId,
    category: CategoryId,
    name: String,
    description: String,
    metal_type: MetalType,
    price: Decimal,
    weight: Option<Decimal>,
    karat: Option<u16>,
    image: ImageRef,
    available: bool,
}

impl Product {
    /// Validate `input` and build the record stored under `id`.
    pub fn create(id: ProductId, input: NewProduct) -> DomainResult<Self> {
        if input.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if input.name.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::validation(format!(
                "name must be at most {MAX_NAME_LEN} characters"
            )));
        }
        if let Some(karat) = input.karat {
            if karat == 0 || karat > MAX_KARAT {
                return Err(DomainError::validation(format!(
                    "karat must be between 1 and {MAX_KARAT} (got {karat})"
                )));
            }
        }

        let price = DecimalField::PRICE.clean(input.price)?;
        let weight = input
            .weight
            .map(|w| DecimalField::WEIGHT.clean(w))
            .transpose()?;

        Ok(Self {
            id,
            category: input.category,
            name: input.name,
            description: input.description,
            metal_type: input.metal_type,
            price,
            weight,
            karat: input.karat,
            image: input.image,
            available: input.available,
        })
    }

    pub fn category(&self) -> CategoryId {
        self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn metal_type(&self) -> MetalType {
        self.metal_type
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn weight(&self) -> Option<Decimal> {
        self.weight
    }

    /// Weight, with an absent weight treated as zero.
    pub fn weight_or_zero(&self) -> Decimal {
        self.weight.unwrap_or(Decimal::ZERO)
    }

    pub fn karat(&self) -> Option<u16> {
        self.karat
    }

    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    pub fn is_available(&self) -> bool {
        self.available
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

impl core::fmt::Display for Product {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ring() -> NewProduct {
        NewProduct {
            category: CategoryId::new(1),
            name: "Temple Ring".to_string(),
            description: "22k gold ring".to_string(),
            metal_type: MetalType::Gold,
            price: dec!(19.99),
            weight: Some(dec!(4.5)),
            karat: Some(22),
            image: ImageRef::new("products/temple-ring.jpg").unwrap(),
            available: true,
        }
    }

    #[test]
    fn create_product_normalizes_decimals() {
        let product = Product::create(ProductId::new(7), ring()).unwrap();
        assert_eq!(product.id(), ProductId::new(7));
        assert_eq!(product.price().to_string(), "19.99");
        assert_eq!(product.weight().unwrap().to_string(), "4.50");
        assert_eq!(product.to_string(), "Temple Ring");
    }

    #[test]
    fn create_product_rejects_empty_name() {
        let err = Product::create(ProductId::new(1), NewProduct { name: "   ".to_string(), ..ring() }).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for empty name"),
        }
    }

    #[test]
    fn create_product_rejects_price_with_three_decimals() {
        let err = Product::create(ProductId::new(1), NewProduct { price: dec!(10.001), ..ring() }).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn create_product_rejects_zero_karat() {
        let err = Product::create(ProductId::new(1), NewProduct { karat: Some(0), ..ring() }).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn missing_weight_reads_as_zero() {
        let product = Product::create(ProductId::new(1), NewProduct { weight: None, ..ring() }).unwrap();
        assert_eq!(product.weight(), None);
        assert_eq!(product.weight_or_zero(), Decimal::ZERO);
    }

    #[test]
    fn metal_type_codes_round_trip() {
        for metal in MetalType::ALL {
            assert_eq!(MetalType::from_code(metal.code()).unwrap(), metal);
        }
        assert!(MetalType::from_code("XX").is_err());
        assert_eq!(serde_json::to_string(&MetalType::Platinum).unwrap(), "\"PT\"");
        assert_eq!(MetalType::Diamond.to_string(), "Diamond");
    }

    #[test]
    fn bare_image_names_land_in_the_upload_directory() {
        assert_eq!(ImageRef::new("kada.jpg").unwrap().as_str(), "products/kada.jpg");
        assert_eq!(ImageRef::new("products/kada.jpg").unwrap().as_str(), "products/kada.jpg");
        assert_eq!(ImageRef::new("archive/kada.jpg").unwrap().as_str(), "archive/kada.jpg");
        assert!(ImageRef::new(" ").is_err());
    }

    #[test]
    fn same_entity_ignores_field_changes() {
        let a = Product::create(ProductId::new(3), ring()).unwrap();
        let b = Product::create(ProductId::new(3), NewProduct { price: dec!(25), ..ring() }).unwrap();
        assert!(a.same_entity(&b));
        assert_ne!(a, b);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any two-place price within the column budget is stored exactly.
            #[test]
            fn valid_prices_are_stored_exactly(cents in 0u64..10_000_000_000u64) {
                let price = Decimal::new(cents as i64, 2);
                let product = Product::create(ProductId::new(1), NewProduct { price, ..ring() }).unwrap();
                prop_assert_eq!(product.price(), price);
                prop_assert_eq!(product.price().scale(), 2);
            }
        }
    }
}
