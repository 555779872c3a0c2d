//! Product collection snapshot persistence.

use tracing::warn;

use crate::models::{Product, keys};

use super::{KeyValueStore, StorageError};

/// Loads and saves the complete product collection.
pub trait ProductRepository {
    /// Load the stored collection.
    ///
    /// Missing, unreadable or unparsable data loads as an empty collection.
    fn load(&self) -> Vec<Product>;

    /// Replace the stored collection with `products`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the write fails. The previous
    /// snapshot is left untouched in that case.
    fn save(&self, products: &[Product]) -> Result<(), StorageError>;
}

/// Keeps the collection as a JSON array in a single key-value slot.
#[derive(Debug, Clone)]
pub struct SnapshotRepository<S> {
    store: S,
}

impl<S: KeyValueStore> SnapshotRepository<S> {
    /// Create a repository writing to `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying key-value store.
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> ProductRepository for SnapshotRepository<S> {
    fn load(&self) -> Vec<Product> {
        let raw = match self.store.get(keys::PRODUCTS) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read product snapshot, starting empty");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "Stored product snapshot is corrupt, starting empty");
            Vec::new()
        })
    }

    fn save(&self, products: &[Product]) -> Result<(), StorageError> {
        let json = serde_json::to_string(products)?;
        self.store.set(keys::PRODUCTS, &json)
    }
}
