use rust_decimal::prelude::*;

use crate::constants::{CURRENCY_SUFFIX, DISPLAY_DECIMAL_PRECISION};

/// Rounds an amount to display precision, half away from zero.
///
/// Returns `None` for non-finite values, which have no decimal form.
pub fn round_for_display(value: f64) -> Option<Decimal> {
    let mut rounded = Decimal::from_f64_retain(value)?.round_dp_with_strategy(
        DISPLAY_DECIMAL_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
    );
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(DISPLAY_DECIMAL_PRECISION);
    Some(rounded)
}

/// Formats an amount with exactly two decimals. Non-finite values are shown as-is.
///
/// A negative amount that rounds to zero keeps its sign (`-0.00`).
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    match round_for_display(value) {
        Some(rounded) if rounded.is_zero() && value < 0.0 => format!("-{}", rounded),
        Some(rounded) => rounded.to_string(),
        // Outside the range of `Decimal`.
        None => format!("{:.*}", DISPLAY_DECIMAL_PRECISION as usize, value),
    }
}

/// Formats an amount for display, e.g. `1234.50 €`.
pub fn format_currency(value: f64) -> String {
    format!("{} {}", format_amount(value), CURRENCY_SUFFIX)
}
