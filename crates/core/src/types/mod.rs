//! Core types for the catalog.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;

pub use id::*;
pub use price::{CURRENCY_SYMBOL, MAX_PRICE_UNITS, PRICE_SCALE, Price, PriceError, discount_percent};
