//! Price handling using rust_decimal for rounding
//!
//! Prices travel as `f64` on the wire. Zone prices entered in the editor are
//! coerced (never rejected); fixed prices are validated before a save.

use rust_decimal::prelude::*;
use shared::error::AppError;

use crate::error::{EditorError, EditorResult};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal; non-finite input becomes zero
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::warn!(value = ?value, "Non-finite price, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Coerce an arbitrary number into a zone price
///
/// NaN, infinities and negative values become 0.
pub fn coerce_price(value: f64) -> f64 {
    if !value.is_finite() || value < 0.0 {
        return 0.0;
    }
    to_f64(to_decimal(value))
}

/// Parse text typed into a price field; unparseable text is 0
pub fn parse_price_input(text: &str) -> f64 {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .map(coerce_price)
        .unwrap_or(0.0)
}

/// Require a fixed price to be a finite number `>= 0`
pub fn require_valid_price(value: f64, field: &str) -> EditorResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(EditorError::Validation(AppError::invalid_price(field)));
    }
    Ok(())
}
