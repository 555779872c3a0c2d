//! Integration tests for the catalog admin.
//!
//! Every test runs against a [`FileStore`] rooted in its own temporary
//! directory, so tests are independent and leave nothing behind.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catalog-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_workflow` - Form, store and snapshot working together
//! - `snapshot_persistence` - On-disk format, recovery and atomic writes
//! - `auth_gate` - Sign-in persistence across sessions

use std::fs;
use std::io;
use std::path::PathBuf;

use tempfile::TempDir;

use catalog_admin::db::{FileStore, SnapshotRepository};
use catalog_admin::models::keys;
use catalog_admin::services::{ProductForm, ProductStore, VariantField};
use catalog_core::Price;

/// A data directory holding one catalog.
#[derive(Debug)]
pub struct TestCatalog {
    dir: TempDir,
    store: FileStore,
}

impl TestCatalog {
    /// Create an empty catalog in a fresh temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let store = FileStore::new(dir.path().join("data"));
        Ok(Self { dir, store })
    }

    /// The key-value store backing this catalog.
    #[must_use]
    pub const fn store(&self) -> &FileStore {
        &self.store
    }

    /// Open a product store, as a new session would.
    #[must_use]
    pub fn open(&self) -> ProductStore<SnapshotRepository<&FileStore>> {
        ProductStore::open(SnapshotRepository::new(&self.store))
    }

    /// Path of the product snapshot file.
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.store.dir().join(format!("{}.json", keys::PRODUCTS))
    }

    /// Raw snapshot contents, if a snapshot has been written.
    #[must_use]
    pub fn read_snapshot(&self) -> Option<String> {
        fs::read_to_string(self.snapshot_path()).ok()
    }

    /// Overwrite the snapshot file with `raw`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_snapshot(&self, raw: &str) -> io::Result<()> {
        fs::create_dir_all(self.store.dir())?;
        fs::write(self.snapshot_path(), raw)
    }

    /// Number of entries in the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed.
    pub fn data_file_count(&self) -> io::Result<usize> {
        Ok(fs::read_dir(self.store.dir())?.count())
    }

    /// Root of the temporary directory.
    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        self.dir.path()
    }
}

/// A create form for "Ground Nut Oil" by Dhara with one 1L variant at
/// ₹180 (MRP ₹220, 40 in stock).
#[must_use]
pub fn ground_nut_oil_form() -> ProductForm {
    let mut form = ProductForm::new();
    form.set_name("Ground Nut Oil");
    form.set_brand("Dhara");
    form.set_category("Oils & Ghee");
    let id = form.add_variant();
    for field in [
        VariantField::Size("1L".to_string()),
        VariantField::Price(Price::from_units(180)),
        VariantField::Mrp(Price::from_units(220)),
        VariantField::Stock(40),
        VariantField::Sku("GNO1L".to_string()),
    ] {
        form.update_variant(&id, field);
    }
    form
}
