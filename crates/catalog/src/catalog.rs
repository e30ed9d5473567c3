//! Catalog read interface + in-memory implementation.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};

use krishna_core::{CategoryId, DomainError, DomainResult, Entity, ProductId};

use crate::category::{Category, Slug};
use crate::product::Product;

/// Read access to catalog records.
///
/// The cart only ever reads through this trait; catalog writes are owned by
/// whoever manages the catalog.
pub trait Catalog: Send + Sync {
    fn find_product_by_id(&self, id: ProductId) -> Option<Product>;

    /// Bulk lookup used to enrich cart entries.
    ///
    /// Unknown ids are silently absent from the result. The order of the
    /// returned products is the catalog's native order, not the order of `ids`.
    fn find_products_by_ids(&self, ids: &BTreeSet<ProductId>) -> Vec<Product>;

    fn find_category_by_slug(&self, slug: &Slug) -> Option<Category>;

    /// Products currently on sale, optionally restricted to one category.
    fn list_available_products(&self, category: Option<&Slug>) -> Vec<Product>;
}

impl<S> Catalog for Arc<S>
where
    S: Catalog + ?Sized,
{
    fn find_product_by_id(&self, id: ProductId) -> Option<Product> {
        (**self).find_product_by_id(id)
    }

    fn find_products_by_ids(&self, ids: &BTreeSet<ProductId>) -> Vec<Product> {
        (**self).find_products_by_ids(ids)
    }

    fn find_category_by_slug(&self, slug: &Slug) -> Option<Category> {
        (**self).find_category_by_slug(slug)
    }

    fn list_available_products(&self, category: Option<&Slug>) -> Vec<Product> {
        (**self).list_available_products(category)
    }
}

#[derive(Debug, Default)]
struct CatalogState {
    categories: BTreeMap<CategoryId, Category>,
    products: BTreeMap<ProductId, Product>,
}

/// In-memory catalog for tests/dev and fixture-backed deployments.
///
/// Products are kept ordered by primary key, which is the native ordering of
/// every listing and bulk lookup.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    inner: RwLock<CatalogState>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a category. Slugs are unique across categories.
    pub fn insert_category(&self, category: Category) -> DomainResult<()> {
        let mut state = self.write()?;
        let clash = state
            .categories
            .values()
            .any(|c| c.slug() == category.slug() && c.id() != category.id());
        if clash {
            return Err(DomainError::conflict(format!(
                "category slug {:?} already exists",
                category.slug().as_str()
            )));
        }
        state.categories.insert(category.id(), category);
        Ok(())
    }

    /// Insert or replace a product. Its category must already exist.
    pub fn insert_product(&self, product: Product) -> DomainResult<()> {
        let mut state = self.write()?;
        if !state.categories.contains_key(&product.category()) {
            return Err(DomainError::not_found(format!("category {}", product.category())));
        }
        state.products.insert(product.id(), product);
        Ok(())
    }

    /// Delete a product. Carts holding it keep their entry; enrichment skips it.
    pub fn remove_product(&self, id: ProductId) -> DomainResult<Option<Product>> {
        let removed = self.write()?.products.remove(&id);
        if removed.is_some() {
            tracing::info!(product_id = %id, "product removed from catalog");
        }
        Ok(removed)
    }

    /// Delete a category together with its products. Returns how many products went with it.
    pub fn remove_category(&self, id: CategoryId) -> DomainResult<usize> {
        let mut state = self.write()?;
        if state.categories.remove(&id).is_none() {
            return Ok(0);
        }
        let before = state.products.len();
        state.products.retain(|_, p| p.category() != id);
        let removed = before - state.products.len();
        tracing::info!(category_id = %id, products_removed = removed, "category removed from catalog");
        Ok(removed)
    }

    pub fn categories(&self) -> Vec<Category> {
        match self.inner.read() {
            Ok(state) => state.categories.values().cloned().collect(),
            Err(_) => vec![],
        }
    }

    pub fn product_count(&self) -> usize {
        self.inner.read().map(|s| s.products.len()).unwrap_or(0)
    }

    fn write(&self) -> DomainResult<std::sync::RwLockWriteGuard<'_, CatalogState>> {
        self.inner
            .write()
            .map_err(|_| DomainError::invariant("catalog lock poisoned"))
    }
}

impl Catalog for InMemoryCatalog {
    fn find_product_by_id(&self, id: ProductId) -> Option<Product> {
        let state = self.inner.read().ok()?;
        state.products.get(&id).cloned()
    }

    fn find_products_by_ids(&self, ids: &BTreeSet<ProductId>) -> Vec<Product> {
        let state = match self.inner.read() {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        state
            .products
            .values()
            .filter(|p| ids.contains(&p.id()))
            .cloned()
            .collect()
    }

    fn find_category_by_slug(&self, slug: &Slug) -> Option<Category> {
        let state = self.inner.read().ok()?;
        state.categories.values().find(|c| c.slug() == slug).cloned()
    }

    fn list_available_products(&self, category: Option<&Slug>) -> Vec<Product> {
        let state = match self.inner.read() {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        let category_id = match category {
            Some(slug) => match state.categories.values().find(|c| c.slug() == slug) {
                Some(c) => Some(c.id()),
                None => return vec![],
            },
            None => None,
        };

        state
            .products
            .values()
            .filter(|p| p.is_available())
            .filter(|p| category_id.is_none_or(|id| p.category() == id))
            .cloned()
            .collect()
    }
}
