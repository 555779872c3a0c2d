//! Catalog Core - Shared types library.
//!
//! This crate provides common types used across all catalog components:
//! - `admin` - Product store, form controller, persistence and AI copywriting
//! - `cli` - Command-line admin panel
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
