//! Admin authentication error types.

use thiserror::Error;

use crate::db::StorageError;

/// Errors that can occur during sign-in and sign-up.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password was left blank.
    #[error("Please fill in all fields")]
    MissingFields,

    /// Password is shorter than the minimum length.
    #[error("Password must be at least {min} characters")]
    PasswordTooShort {
        /// Required number of characters.
        min: usize,
    },

    /// The stored identity could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The stored identity is not valid JSON.
    #[error("stored identity is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
