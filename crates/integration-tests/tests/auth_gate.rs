//! Integration tests for the sign-in gate.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;

use catalog_admin::AppError;
use catalog_admin::models::keys;
use catalog_admin::services::AuthService;
use catalog_admin::db::KeyValueStore;
use catalog_integration_tests::TestCatalog;

fn password(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

#[test]
fn test_identity_survives_new_session() {
    let catalog = TestCatalog::new().unwrap();
    AuthService::new(catalog.store())
        .login("admin@shop.in", &password("hunter22"))
        .unwrap();

    let later = AuthService::new(catalog.store());
    assert_eq!(later.current().unwrap().email, "admin@shop.in");
}

#[test]
fn test_password_is_never_stored() {
    let catalog = TestCatalog::new().unwrap();
    AuthService::new(catalog.store())
        .signup("admin@shop.in", &password("hunter22"))
        .unwrap();

    let raw = catalog.store().get(keys::CURRENT_ADMIN).unwrap().unwrap();
    assert!(!raw.contains("hunter22"));
}

#[test]
fn test_logout_survives_new_session() {
    let catalog = TestCatalog::new().unwrap();
    let auth = AuthService::new(catalog.store());
    auth.login("admin@shop.in", &password("hunter22")).unwrap();
    auth.logout().unwrap();

    assert!(AuthService::new(catalog.store()).current().is_none());
}

#[test]
fn test_rejections_have_user_messages() {
    let catalog = TestCatalog::new().unwrap();
    let auth = AuthService::new(catalog.store());

    let err = AppError::from(auth.login("", &password("hunter22")).unwrap_err());
    assert_eq!(err.user_message(), "Please fill in all fields");

    let err = AppError::from(auth.login("admin@shop.in", &password("abc")).unwrap_err());
    assert_eq!(err.user_message(), "Password must be at least 6 characters");
}
