//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored in the currency's standard unit (rupees, not paise) and
//! serialize as plain JSON numbers so snapshots stay readable by any client.

use core::fmt;
use core::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Currency symbol used when rendering prices.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Decimal places kept for an amount (whole paise).
pub const PRICE_SCALE: u32 = 2;

/// Parsed amounts must stay strictly below this many currency units.
///
/// Together with [`PRICE_SCALE`] this keeps every amount within the digits a
/// JSON number carries exactly.
pub const MAX_PRICE_UNITS: i64 = 1_000_000_000_000;

/// Errors that can occur when parsing a [`Price`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),

    /// The amount is too large to store.
    #[error("price out of range: {0}")]
    OutOfRange(String),
}

/// A monetary amount, held to [`PRICE_SCALE`] decimal places.
///
/// No sign or ordering against MRP is enforced here; callers that need a
/// non-negative price must check it themselves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount, rounded to whole paise.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self(amount.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CURRENCY_SYMBOL}{}", self.0.normalize())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches(CURRENCY_SYMBOL);
        let amount = Decimal::from_str(trimmed).map_err(|_| PriceError::Invalid(s.to_owned()))?;
        if amount.abs() >= Decimal::from(MAX_PRICE_UNITS) {
            return Err(PriceError::OutOfRange(s.to_owned()));
        }
        Ok(Self::new(amount))
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

/// Percentage discount of `price` relative to `mrp`, rounded half away from zero.
///
/// Returns 0 when `mrp` is not positive or when `price` is not below `mrp`.
///
/// ```
/// use catalog_core::{Price, discount_percent};
///
/// assert_eq!(discount_percent(Price::from_units(80), Price::from_units(100)), 20);
/// assert_eq!(discount_percent(Price::from_units(120), Price::from_units(100)), 0);
/// ```
#[must_use]
pub fn discount_percent(price: Price, mrp: Price) -> i64 {
    if mrp.0 <= Decimal::ZERO || price.0 >= mrp.0 {
        return 0;
    }

    mrp.0
        .checked_sub(price.0)
        .and_then(|off| off.checked_div(mrp.0))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|pct| {
            pct.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .unwrap_or(0)
}
