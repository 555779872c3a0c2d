//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Placeholder email/password sign-in gate
//! - `form` - Draft, validation and AI generation for one product
//! - `products` - Product collection with snapshot persistence

pub mod auth;
pub mod form;
pub mod products;

pub use auth::{AuthError, AuthService, MIN_PASSWORD_LENGTH};
pub use form::{
    AiField, FormError, FormMode, GenerationRequest, GenerationTicket, ProductDraft, ProductForm,
    SubmitOutcome, VariantField,
};
pub use products::{CatalogSummary, ProductStore, RECENT_LIMIT};
