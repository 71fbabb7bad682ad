//! Money calculation utilities using rust_decimal for precision
//!
//! Prices are stored as `f64`. Every sum and product goes through `Decimal`.
//! Per-row amounts keep full precision; totals are converted back with
//! 2 decimal places, half away from zero.

use rust_decimal::prelude::*;
use thiserror::Error;

use crate::views::AmountPolicy;

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per food or item (1,000,000)
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per order item
pub const MAX_QUANTITY: i32 = 9999;

/// Rejected monetary input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AmountError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} exceeds maximum allowed ({max}), got {value}")]
    TooLarge {
        field: &'static str,
        value: f64,
        max: f64,
    },

    #[error("quantity must be between 1 and {max}, got {value}")]
    Quantity { value: i32, max: i32 },
}

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
pub fn require_finite(value: f64, field: &'static str) -> Result<(), AmountError> {
    if !value.is_finite() {
        return Err(AmountError::NotFinite { field, value });
    }
    Ok(())
}

/// Price must be finite and within `0..=MAX_PRICE`
pub fn validate_price(value: f64, field: &'static str) -> Result<(), AmountError> {
    require_finite(value, field)?;
    if value < 0.0 {
        return Err(AmountError::Negative { field, value });
    }
    if value > MAX_PRICE {
        return Err(AmountError::TooLarge {
            field,
            value,
            max: MAX_PRICE,
        });
    }
    Ok(())
}

pub fn validate_quantity(value: i32) -> Result<(), AmountError> {
    if !(1..=MAX_QUANTITY).contains(&value) {
        return Err(AmountError::Quantity {
            value,
            max: MAX_QUANTITY,
        });
    }
    Ok(())
}

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Round a stored price to 2 decimal places
pub fn round_price(value: f64) -> f64 {
    to_f64(to_decimal(value))
}

/// Amount a single order item row contributes, unrounded
///
/// `None` when the food record is absent. Under [`AmountPolicy::UnitPrice`]
/// this is the food price exactly as stored.
pub fn line_amount(price: Option<f64>, quantity: i32, policy: AmountPolicy) -> Option<f64> {
    let price = price?;
    match policy {
        AmountPolicy::UnitPrice => Some(price),
        AmountPolicy::Extended => {
            let amount = to_decimal(price) * Decimal::from(quantity);
            Some(amount.to_f64().unwrap_or_default())
        }
    }
}

/// Sum row amounts, absent amounts counting as zero
///
/// Only the total is rounded.
pub fn sum_amounts<I>(amounts: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    let total: Decimal = amounts.into_iter().flatten().map(to_decimal).sum();
    to_f64(total)
}
