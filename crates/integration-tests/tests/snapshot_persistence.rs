//! Integration tests for the on-disk product snapshot.

#![allow(clippy::unwrap_used)]

use catalog_admin::db::{KeyValueStore, ProductRepository, SnapshotRepository};
use catalog_admin::models::keys;
use catalog_core::{Price, ProductId, VariantId};
use catalog_integration_tests::{TestCatalog, ground_nut_oil_form};

/// A snapshot as written by the browser-based admin panel.
const LEGACY_SNAPSHOT: &str = r#"[
  {
    "id": "k3j5h2l4m6n8p",
    "name": "Ground Nut Oil",
    "brand": "Dhara",
    "category": "Oils & Ghee",
    "description": "Cold pressed.",
    "disclaimer": "",
    "variants": [
      {"id": "1700000000000", "size": "1L", "price": 180, "mrp": 220, "stock": 40, "sku": "GNO1L"},
      {"id": "1700000000001", "size": "500ml", "price": 99.5, "mrp": 110, "stock": 3, "sku": ""}
    ],
    "images": ["blob:http://localhost:5173/1f2e"],
    "published": true,
    "createdAt": "2024-01-15T10:30:00.000Z",
    "updatedAt": "2024-01-16T08:00:00.000Z"
  }
]"#;

#[test]
fn test_missing_snapshot_loads_empty() {
    let catalog = TestCatalog::new().unwrap();
    assert!(catalog.open().is_empty());
}

#[test]
fn test_corrupt_snapshot_loads_empty() {
    let catalog = TestCatalog::new().unwrap();
    catalog.write_snapshot("[{\"id\": ").unwrap();

    let mut store = catalog.open();
    assert!(store.is_empty());

    // The next save replaces the corrupt file.
    ground_nut_oil_form().submit(&mut store).unwrap();
    assert_eq!(catalog.open().len(), 1);
}

#[test]
fn test_legacy_snapshot_loads() {
    let catalog = TestCatalog::new().unwrap();
    catalog.write_snapshot(LEGACY_SNAPSHOT).unwrap();

    let store = catalog.open();
    let product = store.get(&ProductId::new("k3j5h2l4m6n8p")).unwrap();

    assert_eq!(product.total_stock(), 43);
    assert!(!product.is_low_stock());
    assert_eq!(product.price_range().to_string(), "₹99.5 - ₹180");
    let half_litre = product.variant(&VariantId::new("1700000000001")).unwrap();
    assert_eq!(half_litre.price, "99.5".parse::<Price>().unwrap());
    assert_eq!(half_litre.discount_percent(), 10);
    assert!(!product.images[0].is_durable());
}

#[test]
fn test_null_and_fractional_numbers_keep_the_catalog() {
    let catalog = TestCatalog::new().unwrap();
    catalog
        .write_snapshot(
            r#"[
              {"id":"a1","name":"Rice","variants":[{"id":"1","size":"1kg","price":null,"mrp":80,"stock":null,"sku":""}],
               "createdAt":"2024-01-15T10:30:00.000Z","updatedAt":"2024-01-15T10:30:00.000Z"},
              {"id":"b2","name":"Dal","variants":[{"id":"2","size":"500g","price":60,"mrp":null,"stock":2.5,"sku":""}],
               "createdAt":"2024-01-15T10:30:00.000Z","updatedAt":"2024-01-15T10:30:00.000Z"}
            ]"#,
        )
        .unwrap();

    let mut store = catalog.open();
    assert_eq!(store.len(), 2);

    let rice = store.get(&ProductId::new("a1")).unwrap();
    assert_eq!(rice.total_stock(), 0);
    assert_eq!(rice.variants[0].price, Price::ZERO);
    let dal = store.get(&ProductId::new("b2")).unwrap();
    assert_eq!(dal.total_stock(), 3);
    assert_eq!(dal.variants[0].discount_percent(), 0);

    ground_nut_oil_form().submit(&mut store).unwrap();
    assert_eq!(catalog.open().len(), 3);
}

#[test]
fn test_missing_fields_take_defaults() {
    let catalog = TestCatalog::new().unwrap();
    catalog
        .write_snapshot(
            r#"[{"id":"abc","name":"Rice","createdAt":"2024-01-15T10:30:00Z","updatedAt":"2024-01-15T10:30:00Z"}]"#,
        )
        .unwrap();

    let store = catalog.open();
    let product = &store.products()[0];
    assert!(product.published);
    assert!(product.variants.is_empty());
    assert_eq!(product.price_range().to_string(), "₹0");
}

#[test]
fn test_resave_is_byte_stable() {
    let catalog = TestCatalog::new().unwrap();
    let mut store = catalog.open();
    ground_nut_oil_form().submit(&mut store).unwrap();
    let first = catalog.read_snapshot().unwrap();

    let repo = SnapshotRepository::new(catalog.store());
    repo.save(&repo.load()).unwrap();

    assert_eq!(catalog.read_snapshot().unwrap(), first);
}

#[test]
fn test_legacy_snapshot_round_trips_semantically() {
    let catalog = TestCatalog::new().unwrap();
    catalog.write_snapshot(LEGACY_SNAPSHOT).unwrap();

    let repo = SnapshotRepository::new(catalog.store());
    let loaded = repo.load();
    repo.save(&loaded).unwrap();

    assert_eq!(repo.load(), loaded);
}

#[test]
fn test_writes_leave_only_slot_files() {
    let catalog = TestCatalog::new().unwrap();
    let mut store = catalog.open();
    for _ in 0..5 {
        ground_nut_oil_form().submit(&mut store).unwrap();
    }

    assert_eq!(catalog.data_file_count().unwrap(), 1);
    assert!(catalog.snapshot_path().exists());
}

#[test]
fn test_snapshot_lives_under_products_key() {
    let catalog = TestCatalog::new().unwrap();
    let mut store = catalog.open();
    ground_nut_oil_form().submit(&mut store).unwrap();

    let raw = catalog.store().get(keys::PRODUCTS).unwrap().unwrap();
    assert_eq!(Some(raw), catalog.read_snapshot());
    assert!(catalog.root().join("data").is_dir());
}
