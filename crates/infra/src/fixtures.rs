//! Catalog fixtures: seed an in-memory catalog from a JSON document.
//!
//! ```json
//! {
//!   "categories": [{ "id": 1, "name": "Rings", "slug": "rings" }],
//!   "products": [{
//!     "id": 10, "category": 1, "name": "Temple Ring", "description": "",
//!     "metal_type": "GD", "price": "18999.00", "weight": "6.20", "karat": 22,
//!     "image": "products/temple-ring.jpg", "available": true
//!   }]
//! }
//! ```
//!
//! Prices and weights are strings so they load exactly.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use krishna_catalog::{Category, ImageRef, InMemoryCatalog, MetalType, NewProduct, Product, Slug};
use krishna_core::{CategoryId, DecimalField, DomainError, ProductId};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read catalog fixture: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed catalog fixture: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid {record}: {source}")]
    Domain {
        record: String,
        #[source]
        source: DomainError,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFixture {
    #[serde(default)]
    categories: Vec<CategoryFixture>,
    #[serde(default)]
    products: Vec<ProductFixture>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CategoryFixture {
    id: u64,
    name: String,
    slug: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProductFixture {
    id: u64,
    category: u64,
    name: String,
    #[serde(default)]
    description: String,
    metal_type: MetalType,
    price: String,
    #[serde(default)]
    weight: Option<String>,
    #[serde(default)]
    karat: Option<u16>,
    image: String,
    #[serde(default = "default_available")]
    available: bool,
}

fn default_available() -> bool {
    true
}

/// Build a catalog from a JSON fixture.
pub fn load_catalog<R: Read>(reader: R) -> Result<InMemoryCatalog, FixtureError> {
    let fixture: CatalogFixture = serde_json::from_reader(reader)?;
    let catalog = InMemoryCatalog::new();

    for c in fixture.categories {
        let record = format!("category {}", c.id);
        Slug::parse(c.slug)
            .and_then(|slug| Category::new(CategoryId::new(c.id), c.name, slug))
            .and_then(|category| catalog.insert_category(category))
            .map_err(|source| FixtureError::Domain { record, source })?;
    }

    for p in fixture.products {
        let record = format!("product {}", p.id);
        product_from_fixture(p)
            .and_then(|product| catalog.insert_product(product))
            .map_err(|source| FixtureError::Domain { record, source })?;
    }

    tracing::info!(
        categories = catalog.categories().len(),
        products = catalog.product_count(),
        "catalog fixture loaded"
    );
    Ok(catalog)
}

/// [`load_catalog`] from a file path.
pub fn load_catalog_file(path: impl AsRef<Path>) -> Result<InMemoryCatalog, FixtureError> {
    let file = File::open(path.as_ref())?;
    load_catalog(BufReader::new(file))
}

fn product_from_fixture(p: ProductFixture) -> Result<Product, DomainError> {
    let price = DecimalField::PRICE.parse(&p.price)?;
    let weight = p
        .weight
        .as_deref()
        .map(|raw| DecimalField::WEIGHT.parse(raw))
        .transpose()?;

    Product::create(
        ProductId::new(p.id),
        NewProduct {
            category: CategoryId::new(p.category),
            name: p.name,
            description: p.description,
            metal_type: p.metal_type,
            price,
            weight,
            karat: p.karat,
            image: ImageRef::new(p.image)?,
            available: p.available,
        },
    )
}
