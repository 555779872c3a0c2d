//! Product and variant domain models.
//!
//! Field names serialize in camelCase so the stored snapshot matches the
//! catalog's JSON schema (`createdAt`, `updatedAt`, ...).

use core::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use catalog_core::{Price, ProductId, VariantId, discount_percent};

use super::image::ImageRef;

/// Total stock below which a product counts as running low.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// A purchasable size/SKU option of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Unique within the owning product.
    pub id: VariantId,
    /// Free-text unit label (e.g. "1L").
    #[serde(default)]
    pub size: String,
    /// Selling price.
    #[serde(default, deserialize_with = "price_or_zero")]
    pub price: Price,
    /// Maximum retail price.
    #[serde(default, deserialize_with = "price_or_zero")]
    pub mrp: Price,
    /// Units available.
    #[serde(default, deserialize_with = "stock_or_zero")]
    pub stock: i64,
    /// Stock-keeping code. Not required to be unique.
    #[serde(default)]
    pub sku: String,
}

impl ProductVariant {
    /// Create an empty variant with zero price, MRP and stock.
    #[must_use]
    pub fn blank(id: VariantId) -> Self {
        Self {
            id,
            size: String::new(),
            price: Price::ZERO,
            mrp: Price::ZERO,
            stock: 0,
            sku: String::new(),
        }
    }

    /// Discount of this variant's price against its MRP, in whole percent.
    #[must_use]
    pub fn discount_percent(&self) -> i64 {
        discount_percent(self.price, self.mrp)
    }
}

/// Stock as older snapshots may hold it.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredStock {
    Whole(i64),
    Fractional(f64),
}

/// `null` reads as zero; fractional counts round to the nearest unit.
fn stock_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(match Option::<StoredStock>::deserialize(deserializer)? {
        Some(StoredStock::Whole(units)) => units,
        // `as` saturates at the i64 bounds and maps NaN to 0
        #[allow(clippy::cast_possible_truncation)]
        Some(StoredStock::Fractional(units)) => units.round() as i64,
        None => 0,
    })
}

fn price_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Price, D::Error> {
    Ok(Option::<Price>::deserialize(deserializer)?.unwrap_or_default())
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID, never reassigned.
    pub id: ProductId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Brand, normally one of [`crate::models::catalog::BRANDS`].
    #[serde(default)]
    pub brand: String,
    /// Category, normally one of [`crate::models::catalog::CATEGORIES`].
    #[serde(default)]
    pub category: String,
    /// Long-form description, possibly AI-generated.
    #[serde(default)]
    pub description: String,
    /// Legal disclaimer, possibly AI-generated.
    #[serde(default)]
    pub disclaimer: String,
    /// Variants in display order.
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    /// Image references; the first one is the cover image.
    #[serde(default)]
    pub images: Vec<ImageRef>,
    /// Whether the product is visible in the storefront.
    #[serde(default = "default_published")]
    pub published: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last changed.
    pub updated_at: DateTime<Utc>,
}

const fn default_published() -> bool {
    true
}

/// Partial product used for both creation and updates.
///
/// `None` means "not supplied": on creation the field takes its default, on
/// update the existing value is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductInput {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub disclaimer: Option<String>,
    pub variants: Option<Vec<ProductVariant>>,
    pub images: Option<Vec<ImageRef>>,
    pub published: Option<bool>,
}

impl ProductInput {
    /// Whether no field was supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.brand.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.disclaimer.is_none()
            && self.variants.is_none()
            && self.images.is_none()
            && self.published.is_none()
    }
}

impl Product {
    /// Build a new product from partial input, filling defaults.
    ///
    /// `created_at` and `updated_at` are both set to `now`.
    #[must_use]
    pub fn from_input(id: ProductId, input: ProductInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name.unwrap_or_default(),
            brand: input.brand.unwrap_or_default(),
            category: input.category.unwrap_or_default(),
            description: input.description.unwrap_or_default(),
            disclaimer: input.disclaimer.unwrap_or_default(),
            variants: input.variants.unwrap_or_default(),
            images: input.images.unwrap_or_default(),
            published: input.published.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every supplied field and refresh `updated_at`.
    ///
    /// `id` and `created_at` are never touched. `updated_at` never moves
    /// behind `created_at`, even if the wall clock stepped backwards.
    pub fn apply(&mut self, input: ProductInput, now: DateTime<Utc>) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(brand) = input.brand {
            self.brand = brand;
        }
        if let Some(category) = input.category {
            self.category = category;
        }
        if let Some(description) = input.description {
            self.description = description;
        }
        if let Some(disclaimer) = input.disclaimer {
            self.disclaimer = disclaimer;
        }
        if let Some(variants) = input.variants {
            self.variants = variants;
        }
        if let Some(images) = input.images {
            self.images = images;
        }
        if let Some(published) = input.published {
            self.published = published;
        }
        self.updated_at = now.max(self.created_at);
    }

    /// Sum of all variants' stock.
    ///
    /// Saturates at the `i64` bounds instead of overflowing.
    #[must_use]
    pub fn total_stock(&self) -> i64 {
        self.variants
            .iter()
            .fold(0_i64, |total, v| total.saturating_add(v.stock))
    }

    /// Lowest and highest variant price.
    #[must_use]
    pub fn price_range(&self) -> PriceRange {
        let mut prices = self.variants.iter().map(|v| v.price);
        let Some(first) = prices.next() else {
            return PriceRange::Single(Price::ZERO);
        };

        let (min, max) = prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        if min == max {
            PriceRange::Single(min)
        } else {
            PriceRange::Range { min, max }
        }
    }

    /// The cover image, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&ImageRef> {
        self.images.first()
    }

    /// Whether total stock has fallen below [`LOW_STOCK_THRESHOLD`].
    #[must_use]
    pub fn is_low_stock(&self) -> bool {
        self.total_stock() < LOW_STOCK_THRESHOLD
    }

    /// Find a variant by ID.
    #[must_use]
    pub fn variant(&self, id: &VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| &v.id == id)
    }
}

/// Display form of a product's price spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceRange {
    /// All variants share one price (or there are no variants).
    Single(Price),
    /// Variants span a range of prices.
    Range {
        /// Cheapest variant price.
        min: Price,
        /// Most expensive variant price.
        max: Price,
    },
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(price) => write!(f, "{price}"),
            Self::Range { min, max } => write!(f, "{min} - {max}"),
        }
    }
}

/// Current time at millisecond precision, the resolution stored timestamps use.
#[must_use]
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
