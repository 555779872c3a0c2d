//! Domain models for the catalog admin.

pub mod catalog;
pub mod image;
pub mod product;
pub mod session;

pub use catalog::{BRANDS, CATEGORIES, is_known_brand, is_known_category};
pub use image::{ImageRef, ImageRefError};
pub use product::{
    LOW_STOCK_THRESHOLD, PriceRange, Product, ProductInput, ProductVariant, timestamp_now,
};
pub use session::{AdminIdentity, keys};
