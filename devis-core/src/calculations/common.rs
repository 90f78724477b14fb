//! Common utility functions for quote calculations.
//!
//! This module provides shared functionality used across line, total and
//! settlement calculations, including rounding and percentage application.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use devis_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Applies a percentage to an amount (`amount × percent / 100`), unrounded.
///
/// Saturates at [`Decimal::MAX`] / [`Decimal::MIN`] instead of overflowing.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use devis_core::calculations::common::percent_of;
///
/// assert_eq!(percent_of(dec!(200), dec!(20)), dec!(40));
/// assert_eq!(percent_of(dec!(180), dec!(5.5)), dec!(9.9));
/// ```
pub fn percent_of(
    amount: Decimal,
    percent: Decimal,
) -> Decimal {
    amount.saturating_mul(percent / Decimal::ONE_HUNDRED)
}
