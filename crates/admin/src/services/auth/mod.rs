//! Admin sign-in gate.
//!
//! A local placeholder: any non-empty email with a password of at least
//! [`MIN_PASSWORD_LENGTH`] characters is accepted and remembered under the
//! `admin_user` slot. No credential is checked or stored. Replace with a real
//! identity provider before exposing the panel beyond a single machine.

mod error;

pub use error::AuthError;

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};

use crate::db::KeyValueStore;
use crate::models::{AdminIdentity, keys};

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Admin sign-in service backed by a key-value store.
#[derive(Debug, Clone)]
pub struct AuthService<S> {
    store: S,
}

impl<S: KeyValueStore> AuthService<S> {
    /// Create a new auth service persisting into `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Sign in an existing admin.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` if either field is blank,
    /// `AuthError::PasswordTooShort` for short passwords, or
    /// `AuthError::Storage` if the identity cannot be persisted.
    #[instrument(skip(self, password))]
    pub fn login(&self, email: &str, password: &SecretString) -> Result<AdminIdentity, AuthError> {
        let identity = Self::check(email, password)?;
        self.remember(&identity)?;
        info!("Admin signed in");
        Ok(identity)
    }

    /// Register a new admin and sign them in.
    ///
    /// The placeholder gate keeps no account list, so this behaves like
    /// [`Self::login`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::login`].
    #[instrument(skip(self, password))]
    pub fn signup(&self, email: &str, password: &SecretString) -> Result<AdminIdentity, AuthError> {
        let identity = Self::check(email, password)?;
        self.remember(&identity)?;
        info!("Admin account created");
        Ok(identity)
    }

    /// Forget the signed-in identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the slot cannot be removed.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), AuthError> {
        self.store.remove(keys::CURRENT_ADMIN)?;
        info!("Admin signed out");
        Ok(())
    }

    /// The currently signed-in identity, if any.
    ///
    /// A corrupt slot is treated as signed out.
    #[must_use]
    pub fn current(&self) -> Option<AdminIdentity> {
        match self.load() {
            Ok(identity) => identity,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable admin identity");
                None
            }
        }
    }

    fn load(&self) -> Result<Option<AdminIdentity>, AuthError> {
        let Some(raw) = self.store.get(keys::CURRENT_ADMIN)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn remember(&self, identity: &AdminIdentity) -> Result<(), AuthError> {
        let json = serde_json::to_string(identity)?;
        self.store.set(keys::CURRENT_ADMIN, &json)?;
        Ok(())
    }

    fn check(email: &str, password: &SecretString) -> Result<AdminIdentity, AuthError> {
        let email = email.trim();
        let password = password.expose_secret();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }
        Ok(AdminIdentity {
            email: email.to_owned(),
        })
    }
}
