//! Unified error handling for admin.

use std::io;

use thiserror::Error;

use catalog_core::{PriceError, ProductId};

use crate::config::ConfigError;
use crate::db::StorageError;
use crate::models::ImageRefError;
use crate::services::{AuthError, FormError};

/// Application-level error type for the catalog admin.
#[derive(Debug, Error)]
pub enum AppError {
    /// Product form was rejected or could not be saved.
    #[error("Form error: {0}")]
    Form(#[from] FormError),

    /// Sign-in failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration is invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Image reference was rejected.
    #[error("Image error: {0}")]
    Image(#[from] ImageRefError),

    /// Price could not be parsed.
    #[error("Price error: {0}")]
    Price(#[from] PriceError),

    /// Product does not exist.
    #[error("Not found: {0}")]
    NotFound(ProductId),

    /// No admin is signed in.
    #[error("Unauthorized")]
    Unauthorized,

    /// Malformed input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Writing command output failed.
    #[error("Output error: {0}")]
    Output(#[from] io::Error),
}

impl AppError {
    /// Message safe to show the person using the panel.
    ///
    /// Storage and API faults are reduced to a generic sentence; the details
    /// belong in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Form(FormError::Storage(_)) | Self::Storage(_) => {
                "Could not save changes. Please try again.".to_string()
            }
            Self::Form(e) => e.to_string(),
            Self::Auth(AuthError::Storage(_) | AuthError::Corrupt(_)) => {
                "Authentication failed".to_string()
            }
            Self::Auth(e) => e.to_string(),
            Self::Config(e) => format!("Configuration problem: {e}"),
            Self::Image(e) => format!("Invalid image: {e}"),
            Self::Price(e) => format!("Invalid price: {e}"),
            Self::NotFound(_) => "Product not found".to_string(),
            Self::Unauthorized => "Please sign in first.".to_string(),
            Self::BadRequest(message) => message.clone(),
            Self::Output(_) => "Could not write output".to_string(),
        }
    }
}
