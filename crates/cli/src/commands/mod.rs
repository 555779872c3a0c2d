//! Command implementations.
//!
//! Each command writes its result to the `out` writer it is given and logs
//! through `tracing`.

pub mod auth;
pub mod catalog;
pub mod products;
mod render;

use catalog_admin::AdminConfig;
use catalog_admin::AppError;
use catalog_admin::claude::Copywriter;
use catalog_admin::db::{FileStore, SnapshotRepository};
use catalog_admin::models::AdminIdentity;
use catalog_admin::services::{AuthService, ProductStore};

/// Store handles shared by every command.
#[derive(Debug)]
pub struct Context {
    store: FileStore,
    copywriter: Copywriter,
}

impl Context {
    /// Build the context from loaded configuration.
    #[must_use]
    pub fn new(config: &AdminConfig) -> Self {
        Self::with_parts(
            FileStore::new(&config.data_dir),
            Copywriter::from_config(config.claude()),
        )
    }

    /// Build the context from explicit parts.
    #[must_use]
    pub const fn with_parts(store: FileStore, copywriter: Copywriter) -> Self {
        Self { store, copywriter }
    }

    /// The sign-in gate.
    #[must_use]
    pub const fn auth(&self) -> AuthService<&FileStore> {
        AuthService::new(&self.store)
    }

    /// Load the product collection.
    #[must_use]
    pub fn products(&self) -> ProductStore<SnapshotRepository<&FileStore>> {
        ProductStore::open(SnapshotRepository::new(&self.store))
    }

    /// The AI copywriter.
    #[must_use]
    pub const fn copywriter(&self) -> &Copywriter {
        &self.copywriter
    }

    /// The signed-in admin.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` if nobody is signed in.
    pub fn require_admin(&self) -> Result<AdminIdentity, AppError> {
        self.auth().current().ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use secrecy::SecretString;
    use tempfile::TempDir;

    use super::*;

    /// A context over a fresh temporary directory, AI disabled.
    pub(crate) fn context() -> (TempDir, Context) {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = Context::with_parts(FileStore::new(dir.path()), Copywriter::disabled());
        (dir, ctx)
    }

    /// Same as [`context`], with an admin signed in.
    pub(crate) fn signed_in_context() -> (TempDir, Context) {
        let (dir, ctx) = context();
        ctx.auth()
            .login(
                "admin@shop.in",
                &SecretString::from("hunter22".to_string()),
            )
            .expect("login");
        (dir, ctx)
    }

    /// Captured output as a string.
    pub(crate) fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).expect("utf-8 output")
    }
}
