//! Fixed-point money utilities.
//!
//! ## Overview
//!
//! Entry fees, pools and payouts are carried internally as integer cents
//! (`u64`) and converted to [`Decimal`] only at the API boundary. Splitting a
//! pool in cents is what lets the prize policy account for every cent.
//!
//! ## Examples
//!
//! ```
//! use puzzle_arena::types::money::{to_cents, format_cents};
//!
//! let fee = to_cents("10.00").unwrap();
//! assert_eq!(fee, 1_000);
//! assert_eq!(format_cents(fee * 3), "30.00");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Cents per currency unit: 2 decimal places.
pub const CENTS_PER_UNIT: u64 = 100;

/// Decimal places carried by every amount.
pub const MONEY_DP: u32 = 2;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Parse a decimal string into cents, rounding half away from zero.
///
/// ```
/// use puzzle_arena::types::money::to_cents;
///
/// assert_eq!(to_cents("4.70"), Some(470));
/// assert_eq!(to_cents("0.005"), Some(1));
/// assert_eq!(to_cents("-1"), None);
/// ```
pub fn to_cents(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_cents(decimal)
}

/// Convert a Decimal to cents, rounding half away from zero.
///
/// Returns `None` for negative or out-of-range values.
pub fn decimal_to_cents(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() && !d.is_zero() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(CENTS_PER_UNIT))?;
    scaled
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
}

/// Convert a Decimal to cents only if it has no sub-cent component.
///
/// ```
/// use rust_decimal::Decimal;
/// use puzzle_arena::types::money::exact_cents;
///
/// assert_eq!(exact_cents(Decimal::new(1050, 2)), Some(1050));
/// assert_eq!(exact_cents(Decimal::new(10501, 3)), None);
/// ```
pub fn exact_cents(d: Decimal) -> Option<u64> {
    if d.round_dp(MONEY_DP) != d {
        return None;
    }
    decimal_to_cents(d)
}

/// Convert cents to a Decimal with exactly 2 decimal places.
pub fn cents_to_decimal(cents: u64) -> Decimal {
    Decimal::from_i128_with_scale(cents as i128, MONEY_DP)
}

/// Format cents with 2 decimal places.
///
/// ```
/// use puzzle_arena::types::money::format_cents;
///
/// assert_eq!(format_cents(2_820), "28.20");
/// assert_eq!(format_cents(5), "0.05");
/// ```
pub fn format_cents(cents: u64) -> String {
    format!("{:.2}", cents_to_decimal(cents))
}

// ============================================================================
// Arithmetic
// ============================================================================

/// Apply a fractional rate to an amount in cents.
///
/// The product is rounded to the cent, half away from zero.
///
/// ```
/// use rust_decimal::Decimal;
/// use puzzle_arena::types::money::apply_rate;
///
/// // 6% of 30.00 = 1.80
/// assert_eq!(apply_rate(3_000, Decimal::new(6, 2)), Some(180));
/// ```
pub fn apply_rate(cents: u64, rate: Decimal) -> Option<u64> {
    let amount = cents_to_decimal(cents).checked_mul(rate)?;
    decimal_to_cents(amount)
}

/// Multiply a per-head amount by a head count, checking for overflow.
pub fn checked_total(per_head_cents: u64, count: usize) -> Option<u64> {
    per_head_cents.checked_mul(u64::try_from(count).ok()?)
}

// ============================================================================
// Unit Tests
// ============================================================================
