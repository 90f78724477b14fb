use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Quote-level discount, as a percentage of the pre-discount total.
///
/// The form owning the quote lines does not own this value; callers read it
/// from the surrounding form each time totals are computed and pass it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscountPercent(Decimal);

impl DiscountPercent {
    pub const ZERO: DiscountPercent = DiscountPercent(Decimal::ZERO);

    pub fn new(percent: Decimal) -> Self {
        Self(percent)
    }

    pub fn percent(&self) -> Decimal {
        self.0
    }

    /// The discount as a fraction (`10%` → `0.10`).
    pub fn rate(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// Share of the amount left after the discount (`10%` → `0.90`).
    pub fn remaining_rate(&self) -> Decimal {
        Decimal::ONE - self.rate()
    }

    /// Returns `true` when the percentage lies in the range the quote form accepts.
    pub fn is_in_range(&self) -> bool {
        self.0 >= Decimal::ZERO && self.0 <= Decimal::ONE_HUNDRED
    }
}

impl From<Decimal> for DiscountPercent {
    fn from(percent: Decimal) -> Self {
        Self(percent)
    }
}

impl fmt::Display for DiscountPercent {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn rate_is_percent_over_one_hundred() {
        let discount = DiscountPercent::new(dec!(10));

        assert_eq!(discount.rate(), dec!(0.10));
        assert_eq!(discount.remaining_rate(), dec!(0.90));
    }

    #[test]
    fn zero_discount_keeps_full_amount() {
        assert_eq!(DiscountPercent::ZERO.remaining_rate(), dec!(1));
        assert_eq!(DiscountPercent::default(), DiscountPercent::ZERO);
    }

    #[test]
    fn range_check_accepts_bounds() {
        assert!(DiscountPercent::new(dec!(0)).is_in_range());
        assert!(DiscountPercent::new(dec!(100)).is_in_range());
        assert!(!DiscountPercent::new(dec!(100.01)).is_in_range());
        assert!(!DiscountPercent::new(dec!(-1)).is_in_range());
    }

    #[test]
    fn displays_as_percentage() {
        assert_eq!(DiscountPercent::new(dec!(12.50)).to_string(), "12.5%");
    }
}
