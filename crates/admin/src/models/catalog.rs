//! Fixed brand and category lists offered when editing a product.
//!
//! The lists are presentation data: the store accepts any string, and the
//! form only requires that something was selected.

/// Brands offered in the product form.
pub const BRANDS: &[&str] = &[
    "Pro Nature",
    "Organic India",
    "Patanjali",
    "Dhara",
    "Fortune",
    "Saffola",
    "Aashirvaad",
    "Tata Sampann",
    "Mother Dairy",
    "Amul",
];

/// Categories offered in the product form.
pub const CATEGORIES: &[&str] = &[
    "Oils & Ghee",
    "Pulses & Grains",
    "Spices & Masalas",
    "Rice & Flour",
    "Dairy Products",
    "Snacks & Namkeen",
    "Tea & Coffee",
    "Sugar & Jaggery",
    "Dry Fruits & Nuts",
    "Organic Products",
];

/// Whether `brand` is one of [`BRANDS`].
#[must_use]
pub fn is_known_brand(brand: &str) -> bool {
    BRANDS.contains(&brand)
}

/// Whether `category` is one of [`CATEGORIES`].
#[must_use]
pub fn is_known_category(category: &str) -> bool {
    CATEGORIES.contains(&category)
}
