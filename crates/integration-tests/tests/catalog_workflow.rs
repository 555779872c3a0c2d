//! Integration tests for the product workflow: form, store and snapshot.

#![allow(clippy::unwrap_used)]

use std::future::Future;

use catalog_admin::claude::TextGenerator;
use catalog_admin::models::ImageRef;
use catalog_admin::services::{FormError, ProductForm, SubmitOutcome, VariantField};
use catalog_core::{Price, ProductId, discount_percent};
use catalog_integration_tests::{TestCatalog, ground_nut_oil_form};

/// Text service answering with fixed copy.
struct FixedCopy;

impl TextGenerator for FixedCopy {
    fn generate_description(
        &self,
        name: &str,
        brand: &str,
        _category: &str,
    ) -> impl Future<Output = Option<String>> + Send {
        let text = format!("  {brand} {name} is pressed from fresh groundnuts.\n");
        async move { Some(text) }
    }

    fn generate_disclaimer(&self, _category: &str) -> impl Future<Output = Option<String>> + Send {
        async { None }
    }
}

// =============================================================================
// Create
// =============================================================================

#[test]
fn test_ground_nut_oil_end_to_end() {
    let catalog = TestCatalog::new().unwrap();
    let mut store = catalog.open();

    let SubmitOutcome::Created(product) = ground_nut_oil_form().submit(&mut store).unwrap() else {
        panic!("expected a new product");
    };

    assert_eq!(product.id.as_str().len(), 13);
    assert!(product.published);
    assert_eq!(product.total_stock(), 40);
    assert_eq!(product.price_range().to_string(), "₹180");
    let variant = &product.variants[0];
    assert_eq!(discount_percent(variant.price, variant.mrp), 18);

    // A new session sees the same product.
    let reopened = catalog.open();
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.get(&product.id), Some(&product));
}

#[test]
fn test_fractional_prices_match_after_reopen() {
    let catalog = TestCatalog::new().unwrap();
    let mut store = catalog.open();

    let mut form = ground_nut_oil_form();
    let variant = form.draft().variants[0].id.clone();
    form.update_variant(
        &variant,
        VariantField::Price("33.333333333333333333".parse::<Price>().unwrap()),
    );
    form.update_variant(&variant, VariantField::Mrp("49.995".parse::<Price>().unwrap()));

    let SubmitOutcome::Created(product) = form.submit(&mut store).unwrap() else {
        panic!("expected a new product");
    };
    assert_eq!(product.variants[0].price.to_string(), "₹33.33");
    assert_eq!(store.get(&product.id), Some(&product));

    let reopened = catalog.open();
    assert_eq!(reopened.get(&product.id), Some(&product));
}

#[test]
fn test_snapshot_uses_catalog_json_shape() {
    let catalog = TestCatalog::new().unwrap();
    let mut store = catalog.open();
    ground_nut_oil_form().submit(&mut store).unwrap();

    let raw = catalog.read_snapshot().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let product = &json[0];

    assert_eq!(product["name"], "Ground Nut Oil");
    assert_eq!(product["published"], true);
    assert!(product["createdAt"].is_string());
    assert!(product["updatedAt"].is_string());
    assert_eq!(product["variants"][0]["price"], 180.0);
    assert_eq!(product["variants"][0]["mrp"], 220.0);
    assert_eq!(product["variants"][0]["stock"], 40);
    assert_eq!(product["variants"][0]["sku"], "GNO1L");
}

#[test]
fn test_invalid_submissions_leave_catalog_untouched() {
    let catalog = TestCatalog::new().unwrap();
    let mut store = catalog.open();

    let mut form = ground_nut_oil_form();
    form.set_name("  ");
    assert!(matches!(
        form.submit(&mut store),
        Err(FormError::MissingName)
    ));

    let mut form = ground_nut_oil_form();
    let variant = form.draft().variants[0].id.clone();
    form.remove_variant(&variant);
    assert!(matches!(form.submit(&mut store), Err(FormError::NoVariants)));

    assert!(store.is_empty());
    assert_eq!(catalog.read_snapshot(), None);
}

#[test]
fn test_ids_are_unique_across_many_products() {
    let catalog = TestCatalog::new().unwrap();
    let mut store = catalog.open();

    for _ in 0..50 {
        ground_nut_oil_form().submit(&mut store).unwrap();
    }

    let mut ids: Vec<&ProductId> = store.products().iter().map(|p| &p.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 50);
}

// =============================================================================
// Edit and delete
// =============================================================================

#[test]
fn test_edit_preserves_identity_and_creation_time() {
    let catalog = TestCatalog::new().unwrap();
    let mut store = catalog.open();
    let SubmitOutcome::Created(original) = ground_nut_oil_form().submit(&mut store).unwrap() else {
        panic!("expected a new product");
    };

    let mut form = ProductForm::edit(&original);
    let variant = form.draft().variants[0].id.clone();
    form.update_variant(&variant, VariantField::Price(Price::from_units(200)));
    form.add_image(ImageRef::parse("https://cdn.example.com/oil.png").unwrap());
    form.set_published(false);
    form.submit(&mut store).unwrap();

    let reopened = catalog.open();
    let edited = reopened.get(&original.id).unwrap();
    assert_eq!(edited.created_at, original.created_at);
    assert!(edited.updated_at >= original.updated_at);
    assert!(!edited.published);
    assert_eq!(edited.variants[0].price, Price::from_units(200));
    assert_eq!(edited.variants[0].discount_percent(), 9);
    assert_eq!(
        edited.primary_image().map(ImageRef::as_str),
        Some("https://cdn.example.com/oil.png")
    );
}

#[test]
fn test_missing_ids_do_not_write() {
    let catalog = TestCatalog::new().unwrap();
    let mut store = catalog.open();
    ground_nut_oil_form().submit(&mut store).unwrap();
    let before = catalog.read_snapshot().unwrap();

    let missing = ProductId::new("doesnotexist1");
    assert!(!store.delete(&missing).unwrap());
    assert!(!store.update(&missing, Default::default()).unwrap());

    assert_eq!(catalog.read_snapshot().unwrap(), before);
}

#[test]
fn test_delete_persists() {
    let catalog = TestCatalog::new().unwrap();
    let mut store = catalog.open();
    let SubmitOutcome::Created(oil) = ground_nut_oil_form().submit(&mut store).unwrap() else {
        panic!("expected a new product");
    };
    let mut ghee = ground_nut_oil_form();
    ghee.set_name("Cow Ghee");
    ghee.submit(&mut store).unwrap();

    assert!(store.delete(&oil.id).unwrap());

    let reopened = catalog.open();
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.products()[0].name, "Cow Ghee");
}

// =============================================================================
// AI copy
// =============================================================================

#[tokio::test]
async fn test_generated_description_is_saved_trimmed() {
    let catalog = TestCatalog::new().unwrap();
    let mut store = catalog.open();

    let mut form = ground_nut_oil_form();
    assert!(form.generate_description(&FixedCopy).await.unwrap());
    assert!(!form.generate_disclaimer(&FixedCopy).await);
    let SubmitOutcome::Created(product) = form.submit(&mut store).unwrap() else {
        panic!("expected a new product");
    };

    assert_eq!(
        product.description,
        "Dhara Ground Nut Oil is pressed from fresh groundnuts."
    );
    assert_eq!(product.disclaimer, "");
}

#[tokio::test]
async fn test_late_response_after_reset_is_not_saved() {
    let catalog = TestCatalog::new().unwrap();
    let mut store = catalog.open();

    let mut form = ground_nut_oil_form();
    let ticket = form.request_description().unwrap();
    let text = ticket.request().run(&FixedCopy).await;

    // The form moves on to a different product before the reply lands.
    form.reset();
    form.set_name("Basmati Rice");
    form.set_brand("Fortune");
    form.set_category("Rice & Flour");
    form.add_variant();

    assert!(!form.apply_generated(ticket, text));
    let SubmitOutcome::Created(rice) = form.submit(&mut store).unwrap() else {
        panic!("expected a new product");
    };
    assert_eq!(rice.description, "");
}
