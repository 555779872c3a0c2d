//! Admin identity commands.

use std::io::Write;

use secrecy::SecretString;
use tracing::info;

use catalog_admin::AppError;

use super::Context;

/// Sign in and remember the identity.
///
/// # Errors
///
/// Returns `AppError::Auth` if the credentials are rejected.
pub fn login(
    ctx: &Context,
    email: &str,
    password: String,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let identity = ctx.auth().login(email, &SecretString::from(password))?;
    writeln!(out, "Welcome back! Signed in as {}", identity.email)?;
    Ok(())
}

/// Create an account and sign in.
///
/// # Errors
///
/// Returns `AppError::Auth` if the credentials are rejected.
pub fn signup(
    ctx: &Context,
    email: &str,
    password: String,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let identity = ctx.auth().signup(email, &SecretString::from(password))?;
    writeln!(out, "Account created successfully! Signed in as {}", identity.email)?;
    Ok(())
}

/// Forget the signed-in identity.
///
/// # Errors
///
/// Returns `AppError::Auth` if the identity slot cannot be removed.
pub fn logout(ctx: &Context, out: &mut impl Write) -> Result<(), AppError> {
    let previous = ctx.auth().current();
    ctx.auth().logout()?;
    match previous {
        Some(identity) => writeln!(out, "Signed out {}", identity.email)?,
        None => {
            info!("Nobody was signed in");
            writeln!(out, "Signed out")?;
        }
    }
    Ok(())
}

/// Print the signed-in identity.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` if nobody is signed in.
pub fn whoami(ctx: &Context, out: &mut impl Write) -> Result<(), AppError> {
    let identity = ctx.require_admin()?;
    writeln!(out, "{}", identity.email)?;
    Ok(())
}
