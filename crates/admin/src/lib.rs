//! Catalog admin library.
//!
//! Everything behind the product catalog admin panel except the user
//! interface: the product store and its durable snapshot, the product form
//! controller, the sign-in gate and AI copywriting.
//!
//! # Layout
//!
//! - [`models`] - products, variants, image references, fixed brand and category lists
//! - [`db`] - key-value slots and the product snapshot repository
//! - [`services`] - product store, form controller, auth
//! - [`claude`] - Claude client and the description/disclaimer copywriter
//! - [`config`] - environment configuration
//! - [`error`] - the aggregate `AppError` and its user-facing messages

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod claude;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use config::{AdminConfig, ClaudeConfig, ConfigError, LogFormat};
pub use error::AppError;
