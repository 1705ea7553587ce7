//! Common utility functions for tax calculations.
//!
//! Shared by the bracket calculator, the deduction aggregator and the
//! estimator: rounding, and the min/max clamps that every cap rule reduces to.

use rust_decimal::Decimal;
use tracing::warn;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-5000.00), dec!(0)), dec!(0));
/// assert_eq!(max(dec!(200.00), dec!(100.00)), dec!(200.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Returns the smaller of two decimal values.
///
/// This is the shape of every cap rule: `min(claimed, ceiling)`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::min;
///
/// assert_eq!(min(dec!(40000), dec!(25000)), dec!(25000));
/// assert_eq!(min(dec!(10000), dec!(25000)), dec!(10000));
/// ```
pub fn min(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a < b { a } else { b }
}

/// Floors `value` at zero, logging a warning when a negative amount had to
/// be discarded.
pub fn non_negative(
    field: &'static str,
    value: Decimal,
) -> Decimal {
    if value < Decimal::ZERO {
        warn!(field, value = %value, "negative amount treated as zero");
        Decimal::ZERO
    } else {
        value
    }
}

/// Applies an optional ceiling; `None` means unlimited.
pub fn cap(
    value: Decimal,
    ceiling: Option<Decimal>,
) -> Decimal {
    match ceiling {
        Some(ceiling) => min(value, ceiling),
        None => value,
    }
}
