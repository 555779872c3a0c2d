//! Reference lists shown when picking a brand or category.

use std::io::Write;

use catalog_admin::AppError;
use catalog_admin::models::{BRANDS, CATEGORIES};

/// Print the known brands, one per line.
///
/// # Errors
///
/// Returns `AppError::Output` if writing fails.
pub fn brands(out: &mut impl Write) -> Result<(), AppError> {
    for brand in BRANDS {
        writeln!(out, "{brand}")?;
    }
    Ok(())
}

/// Print the known categories, one per line.
///
/// # Errors
///
/// Returns `AppError::Output` if writing fails.
pub fn categories(out: &mut impl Write) -> Result<(), AppError> {
    for category in CATEGORIES {
        writeln!(out, "{category}")?;
    }
    Ok(())
}
