//! Cart behaviour across request boundaries: each "request" loads the session
//! from a store, binds a cart, mutates it and saves the session if modified.

use std::sync::Arc;

use krishna_cart::{Cart, CartSettings};
use krishna_catalog::{Catalog, Category, ImageRef, InMemoryCatalog, MetalType, NewProduct, Product, Slug};
use krishna_core::{CategoryId, ProductId};
use krishna_session::{InMemorySessionStore, Session, SessionId, SessionStore};
use rust_decimal_macros::dec;

fn seeded_catalog() -> Arc<InMemoryCatalog> {
    let catalog = Arc::new(InMemoryCatalog::new());
    catalog
        .insert_category(Category::new(CategoryId::new(1), "Necklaces", Slug::parse("necklaces").unwrap()).unwrap())
        .unwrap();

    let pieces = [
        (1, "Kundan Necklace", MetalType::Gold, dec!(45999.00), Some(dec!(32.40))),
        (2, "Solitaire Pendant", MetalType::Diamond, dec!(74999.50), None),
        (3, "Silver Anklet", MetalType::Silver, dec!(1299.99), Some(dec!(18.00))),
    ];
    for (id, name, metal_type, price, weight) in pieces {
        let product = Product::create(
            ProductId::new(id),
            NewProduct {
                category: CategoryId::new(1),
                name: name.to_string(),
                description: String::new(),
                metal_type,
                price,
                weight,
                karat: None,
                image: ImageRef::new(format!("products/{id}.jpg")).unwrap(),
                available: true,
            },
        )
        .unwrap();
        catalog.insert_product(product).unwrap();
    }
    catalog
}

fn request<F>(store: &InMemorySessionStore, id: &SessionId, f: F)
where
    F: FnOnce(&mut Cart<'_>),
{
    let mut session: Session = store.load(id).unwrap();
    {
        let mut cart = Cart::load(&mut session, &CartSettings::default());
        f(&mut cart);
    }
    store.save_if_modified(&mut session).unwrap();
}

#[test]
fn cart_persists_between_requests() {
    let store = InMemorySessionStore::new();
    let catalog = seeded_catalog();
    let sid = SessionId::generate();

    let necklace = catalog.find_product_by_id(ProductId::new(1)).unwrap();
    let anklet = catalog.find_product_by_id(ProductId::new(3)).unwrap();

    request(&store, &sid, |cart| {
        cart.add(&necklace, 1, false).unwrap();
    });
    request(&store, &sid, |cart| {
        cart.add(&anklet, 2, false).unwrap();
        cart.add(&necklace, 1, false).unwrap();
    });

    request(&store, &sid, |cart| {
        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.total_price(), dec!(94597.98));
        assert_eq!(cart.total_weight(), dec!(100.80));
        assert_eq!(cart.line_items(&catalog).len(), 2);
    });
}

#[test]
fn clear_deletes_key_and_next_request_reinitializes() {
    let store = InMemorySessionStore::new();
    let catalog = seeded_catalog();
    let sid = SessionId::generate();
    let pendant = catalog.find_product_by_id(ProductId::new(2)).unwrap();

    request(&store, &sid, |cart| {
        cart.add(&pendant, 1, false).unwrap();
    });
    request(&store, &sid, |cart| cart.clear());

    let session = store.load(&sid).unwrap();
    assert!(!session.contains_key("cart"));

    request(&store, &sid, |cart| assert_eq!(cart.item_count(), 0));
    let session = store.load(&sid).unwrap();
    assert_eq!(session.get("cart"), Some(&serde_json::json!({})));
}

#[test]
fn deleted_product_is_skipped_but_still_counted() {
    let store = InMemorySessionStore::new();
    let catalog = seeded_catalog();
    let sid = SessionId::generate();
    let pendant = catalog.find_product_by_id(ProductId::new(2)).unwrap();
    let anklet = catalog.find_product_by_id(ProductId::new(3)).unwrap();

    request(&store, &sid, |cart| {
        cart.add(&pendant, 1, false).unwrap();
        cart.add(&anklet, 1, false).unwrap();
    });
    catalog.remove_product(pendant_id()).unwrap();

    request(&store, &sid, |cart| {
        let lines = cart.lines(&catalog);
        assert_eq!(lines.skipped(), 1);
        assert_eq!(lines.count(), 1);
        assert_eq!(cart.item_count(), 2);

        // The orphaned entry can still be removed by id.
        assert!(cart.remove_id(pendant_id()));
        assert_eq!(cart.lines(&catalog).skipped(), 0);
    });
}

fn pendant_id() -> ProductId {
    ProductId::new(2)
}

#[test]
fn read_only_request_does_not_write() {
    let store = InMemorySessionStore::new();
    let sid = SessionId::generate();

    // First touch writes the empty mapping.
    request(&store, &sid, |_| {});

    let mut session = store.load(&sid).unwrap();
    {
        let cart = Cart::load(&mut session, &CartSettings::default());
        assert!(cart.is_empty());
    }
    assert!(!store.save_if_modified(&mut session).unwrap());
}
