//! Product store: the authoritative in-memory catalog.
//!
//! The store is loaded once from a [`ProductRepository`] and writes the whole
//! collection back after every mutation. A mutation is only applied in memory
//! once the snapshot write succeeded, so memory and storage never diverge.

use tracing::{info, instrument, warn};

use catalog_core::ProductId;

use crate::db::{ProductRepository, StorageError};
use crate::models::{Product, ProductInput, timestamp_now};

/// Number of products shown in the dashboard's recent list.
pub const RECENT_LIMIT: usize = 5;

/// Aggregate figures for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogSummary {
    /// Number of products.
    pub total_products: usize,
    /// Products visible in the storefront.
    pub published: usize,
    /// Products hidden from the storefront.
    pub drafts: usize,
    /// Units in stock across all variants of all products.
    pub total_stock: i64,
    /// Products whose total stock is below the low-stock threshold.
    pub low_stock: usize,
}

/// In-memory product collection kept in sync with its repository.
#[derive(Debug)]
pub struct ProductStore<R> {
    repo: R,
    products: Vec<Product>,
}

impl<R: ProductRepository> ProductStore<R> {
    /// Load the collection from `repo`.
    pub fn open(repo: R) -> Self {
        let products = repo.load();
        info!(count = products.len(), "Product store loaded");
        Self { repo, products }
    }

    /// All products in insertion order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Find a product by ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Products whose name or category contains `query`, ignoring case.
    ///
    /// An empty query matches everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.category.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// The first `limit` products in insertion order.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &Product> {
        self.products.iter().take(limit)
    }

    /// Aggregate figures over the whole catalog.
    #[must_use]
    pub fn summary(&self) -> CatalogSummary {
        self.products
            .iter()
            .fold(CatalogSummary::default(), |mut acc, p| {
                acc.total_products += 1;
                if p.published {
                    acc.published += 1;
                } else {
                    acc.drafts += 1;
                }
                acc.total_stock = acc.total_stock.saturating_add(p.total_stock());
                if p.is_low_stock() {
                    acc.low_stock += 1;
                }
                acc
            })
    }

    /// Create a product from partial input and append it to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be written; the catalog
    /// is left unchanged.
    #[instrument(skip(self, input))]
    pub fn add(&mut self, input: ProductInput) -> Result<Product, StorageError> {
        let product = Product::from_input(self.fresh_id(), input, timestamp_now());

        let mut next = self.products.clone();
        next.push(product.clone());
        self.commit(next)?;

        info!(id = %product.id, name = %product.name, "Product added");
        Ok(product)
    }

    /// Merge `input` over the product with `id`.
    ///
    /// Returns `false` without writing anything when no such product exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be written; the catalog
    /// is left unchanged.
    #[instrument(skip(self, input), fields(id = %id))]
    pub fn update(&mut self, id: &ProductId, input: ProductInput) -> Result<bool, StorageError> {
        let Some(index) = self.products.iter().position(|p| &p.id == id) else {
            warn!("Update skipped, product not found");
            return Ok(false);
        };

        let mut next = self.products.clone();
        if let Some(product) = next.get_mut(index) {
            product.apply(input, timestamp_now());
        }
        self.commit(next)?;

        info!("Product updated");
        Ok(true)
    }

    /// Remove the product with `id`.
    ///
    /// Returns `false` without writing anything when no such product exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be written; the catalog
    /// is left unchanged.
    #[instrument(skip(self), fields(id = %id))]
    pub fn delete(&mut self, id: &ProductId) -> Result<bool, StorageError> {
        if self.get(id).is_none() {
            warn!("Delete skipped, product not found");
            return Ok(false);
        }

        let next: Vec<Product> = self
            .products
            .iter()
            .filter(|p| &p.id != id)
            .cloned()
            .collect();
        self.commit(next)?;

        info!("Product deleted");
        Ok(true)
    }

    /// Write `next` and adopt it only if the write succeeded.
    fn commit(&mut self, next: Vec<Product>) -> Result<(), StorageError> {
        self.repo.save(&next)?;
        self.products = next;
        Ok(())
    }

    fn fresh_id(&self) -> ProductId {
        loop {
            let id = ProductId::generate();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::cell::Cell;
    use std::collections::HashSet;
    use std::sync::Arc;

    use catalog_core::{Price, VariantId};

    use super::*;
    use crate::db::{KeyValueStore, MemoryStore, SnapshotRepository};
    use crate::models::{ProductVariant, keys};

    /// Repository whose writes can be made to fail.
    pub(crate) struct FlakyRepository {
        pub(crate) inner: SnapshotRepository<MemoryStore>,
        pub(crate) fail_writes: Cell<bool>,
        pub(crate) writes: Cell<usize>,
    }

    impl Default for FlakyRepository {
        fn default() -> Self {
            Self {
                inner: SnapshotRepository::new(MemoryStore::new()),
                fail_writes: Cell::new(false),
                writes: Cell::new(0),
            }
        }
    }

    impl ProductRepository for FlakyRepository {
        fn load(&self) -> Vec<Product> {
            self.inner.load()
        }

        fn save(&self, products: &[Product]) -> Result<(), StorageError> {
            if self.fail_writes.get() {
                return Err(StorageError::Io(std::io::Error::other("quota exceeded")));
            }
            self.writes.set(self.writes.get() + 1);
            self.inner.save(products)
        }
    }

    fn named(name: &str) -> ProductInput {
        ProductInput {
            name: Some(name.to_string()),
            category: Some("Oils & Ghee".to_string()),
            ..ProductInput::default()
        }
    }

    fn memory_store() -> ProductStore<SnapshotRepository<MemoryStore>> {
        ProductStore::open(SnapshotRepository::new(MemoryStore::new()))
    }

    #[test]
    fn test_add_assigns_unique_id_and_equal_timestamps() {
        let mut store = memory_store();
        let mut seen = HashSet::new();

        for i in 0..50 {
            let product = store.add(named(&format!("Product {i}"))).unwrap();
            assert_eq!(product.created_at, product.updated_at);
            assert!(seen.insert(product.id.clone()), "duplicate id");
        }
        assert_eq!(store.len(), 50);
    }

    #[test]
    fn test_add_appends_and_persists() {
        let kv = Arc::new(MemoryStore::new());
        let mut store = ProductStore::open(SnapshotRepository::new(Arc::clone(&kv)));
        let first = store.add(named("Ghee")).unwrap();
        let second = store.add(named("Oil")).unwrap();

        assert_eq!(store.products()[0].id, first.id);
        assert_eq!(store.products()[1].id, second.id);
        assert!(kv.get(keys::PRODUCTS).unwrap().is_some());

        let reloaded = ProductStore::open(SnapshotRepository::new(kv));
        assert_eq!(reloaded.products(), store.products());
    }

    #[test]
    fn test_add_fills_defaults() {
        let mut store = memory_store();
        let product = store.add(ProductInput::default()).unwrap();
        assert!(product.published);
        assert!(product.variants.is_empty());
        assert!(product.images.is_empty());
        assert_eq!(product.disclaimer, "");
    }

    #[test]
    fn test_update_changes_only_given_field() {
        let mut store = memory_store();
        let original = store.add(named("Ghee")).unwrap();

        let changed = store
            .update(
                &original.id,
                ProductInput {
                    description: Some("Pure cow ghee.".to_string()),
                    ..ProductInput::default()
                },
            )
            .unwrap();
        assert!(changed);

        let updated = store.get(&original.id).unwrap();
        assert_eq!(updated.description, "Pure cow ghee.");
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.name, original.name);
        assert_eq!(updated.category, original.category);
        assert!(updated.updated_at >= original.updated_at);
    }

    #[test]
    fn test_update_missing_is_noop_without_write() {
        let repo = FlakyRepository::default();
        let mut store = ProductStore::open(repo);
        store.add(named("Ghee")).unwrap();
        let before = store.products().to_vec();
        let writes = store.repo.writes.get();

        let changed = store
            .update(&ProductId::new("missing"), named("Other"))
            .unwrap();

        assert!(!changed);
        assert_eq!(store.products(), before.as_slice());
        assert_eq!(store.repo.writes.get(), writes);
    }

    #[test]
    fn test_delete_removes_and_missing_is_noop() {
        let mut store = memory_store();
        let a = store.add(named("A")).unwrap();
        let b = store.add(named("B")).unwrap();

        assert!(store.delete(&a.id).unwrap());
        assert_eq!(store.len(), 1);
        assert_eq!(store.products()[0].id, b.id);

        assert!(!store.delete(&a.id).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_failed_write_leaves_memory_and_snapshot_untouched() {
        let mut store = ProductStore::open(FlakyRepository::default());
        let kept = store.add(named("Kept")).unwrap();
        let snapshot = store.repo.inner.load();

        store.repo.fail_writes.set(true);
        assert!(store.add(named("Lost")).is_err());
        assert!(store.update(&kept.id, named("Renamed")).is_err());
        assert!(store.delete(&kept.id).is_err());

        assert_eq!(store.products(), snapshot.as_slice());
        assert_eq!(store.repo.inner.load(), snapshot);
        assert_eq!(store.get(&kept.id).unwrap().name, "Kept");
    }

    #[test]
    fn test_search_matches_name_or_category_case_insensitively() {
        let mut store = memory_store();
        store.add(named("Ground Nut Oil")).unwrap();
        store
            .add(ProductInput {
                name: Some("Basmati".to_string()),
                category: Some("Rice & Flour".to_string()),
                ..ProductInput::default()
            })
            .unwrap();

        assert_eq!(store.search("nut").len(), 1);
        assert_eq!(store.search("RICE").len(), 1);
        assert_eq!(store.search("oils").len(), 1);
        assert_eq!(store.search("").len(), 2);
        assert!(store.search("tea").is_empty());
    }

    #[test]
    fn test_recent_takes_first_in_insertion_order() {
        let mut store = memory_store();
        for i in 0..7 {
            store.add(named(&format!("P{i}"))).unwrap();
        }
        let names: Vec<_> = store.recent(RECENT_LIMIT).map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["P0", "P1", "P2", "P3", "P4"]);
    }

    #[test]
    fn test_summary() {
        let mut store = memory_store();
        let variant = |stock| ProductVariant {
            stock,
            price: Price::from_units(10),
            ..ProductVariant::blank(VariantId::generate())
        };
        store
            .add(ProductInput {
                variants: Some(vec![variant(40)]),
                ..named("Oil")
            })
            .unwrap();
        store
            .add(ProductInput {
                variants: Some(vec![variant(3), variant(2)]),
                published: Some(false),
                ..named("Ghee")
            })
            .unwrap();

        assert_eq!(
            store.summary(),
            CatalogSummary {
                total_products: 2,
                published: 1,
                drafts: 1,
                total_stock: 45,
                low_stock: 1,
            }
        );
    }

    #[test]
    fn test_summary_stock_saturates() {
        let mut store = memory_store();
        for _ in 0..2 {
            store
                .add(ProductInput {
                    variants: Some(vec![ProductVariant {
                        stock: i64::MAX,
                        ..ProductVariant::blank(VariantId::generate())
                    }]),
                    ..named("Bulk")
                })
                .unwrap();
        }

        assert_eq!(store.summary().total_stock, i64::MAX);
    }
}
