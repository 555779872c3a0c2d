//! Signed-in identity and the storage keys of the persisted state.

use serde::{Deserialize, Serialize};

/// The identity persisted after a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    /// Email the admin signed in with.
    pub email: String,
}

/// Keys of the durable key-value slots.
pub mod keys {
    /// Key holding the JSON array of all products.
    pub const PRODUCTS: &str = "admin_products";

    /// Key holding the current signed-in identity.
    pub const CURRENT_ADMIN: &str = "admin_user";
}
