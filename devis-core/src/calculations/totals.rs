//! Quote line and quote total calculations.
//!
//! # Totals
//!
//! | Total                          | Formula |
//! |--------------------------------|---------|
//! | Total excl. tax (HT)           | Σ unit price × quantity |
//! | Discount amount                | Total HT × discount % |
//! | Total HT after discount        | Total HT − discount amount |
//! | Total VAT (TVA)                | Σ per line: unit price × quantity × (1 − discount %) × VAT % |
//! | Total incl. tax (TTC)          | Total HT after discount + total VAT |
//!
//! VAT is computed on each line's discounted amount and then summed, because
//! lines may carry different VAT rates. The per-line cached total
//! ([`line_total_incl_tax`]) deliberately ignores the quote discount: the
//! discount only shows up in the quote totals.
//!
//! No rounding is applied; use [`QuoteTotals::rounded`] for display or
//! storage. Arithmetic saturates at the `Decimal` bounds, so oversized input
//! yields `Decimal::MAX` rather than a panic.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use devis_core::calculations::QuoteCalculator;
//! use devis_core::{DiscountPercent, LineItem};
//!
//! let lines = vec![LineItem {
//!     unit_price_excl_tax: dec!(100),
//!     quantity: dec!(2),
//!     tax_percent: dec!(20),
//!     ..Default::default()
//! }];
//!
//! let totals = QuoteCalculator::new(&lines).calculate(DiscountPercent::new(dec!(10)));
//!
//! assert_eq!(totals.total_excl_tax, dec!(200));
//! assert_eq!(totals.discount_amount, dec!(20));
//! assert_eq!(totals.total_tax, dec!(36));
//! assert_eq!(totals.total_incl_tax, dec!(216));
//! ```

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{percent_of, round_half_up};
use crate::models::{DiscountPercent, LineItem};

/// Line total including VAT, without the quote discount:
/// `price × qty + price × qty × VAT%`.
pub fn line_total_incl_tax(line: &LineItem) -> Decimal {
    let amount = line.amount_excl_tax();
    amount.saturating_add(percent_of(amount, line.tax_percent))
}

/// Refreshes the cached [`LineItem::total_incl_tax`] from the line's own fields.
pub fn recompute_line(line: &mut LineItem) {
    line.total_incl_tax = line_total_incl_tax(line);
}

/// Every derived total of a quote for a given discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuoteTotals {
    pub total_excl_tax: Decimal,
    pub discount_amount: Decimal,
    pub total_excl_tax_after_discount: Decimal,
    pub total_tax: Decimal,
    pub total_incl_tax: Decimal,
}

impl QuoteTotals {
    /// Rounds every total half-up to the cent.
    ///
    /// Each figure is rounded independently, so the rounded TTC can differ by
    /// a cent from the sum of the rounded HT and VAT.
    pub fn rounded(&self) -> Self {
        Self {
            total_excl_tax: round_half_up(self.total_excl_tax),
            discount_amount: round_half_up(self.discount_amount),
            total_excl_tax_after_discount: round_half_up(self.total_excl_tax_after_discount),
            total_tax: round_half_up(self.total_tax),
            total_incl_tax: round_half_up(self.total_incl_tax),
        }
    }
}

impl fmt::Display for QuoteTotals {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let rounded = self.rounded();
        writeln!(f, "Total HT:              {:>12}", rounded.total_excl_tax)?;
        writeln!(f, "Remise:                {:>12}", rounded.discount_amount)?;
        writeln!(
            f,
            "Total HT après remise: {:>12}",
            rounded.total_excl_tax_after_discount
        )?;
        writeln!(f, "Total TVA:             {:>12}", rounded.total_tax)?;
        write!(f, "Total TTC:             {:>12}", rounded.total_incl_tax)
    }
}

/// Calculator over a borrowed list of quote lines.
#[derive(Debug, Clone, Copy)]
pub struct QuoteCalculator<'a> {
    lines: &'a [LineItem],
}

impl<'a> QuoteCalculator<'a> {
    pub fn new(lines: &'a [LineItem]) -> Self {
        Self { lines }
    }

    /// Computes every total for `discount`.
    pub fn calculate(
        &self,
        discount: DiscountPercent,
    ) -> QuoteTotals {
        let total_excl_tax = self.total_excl_tax();
        let discount_amount = self.discount_amount(discount);
        let total_excl_tax_after_discount = total_excl_tax.saturating_sub(discount_amount);
        let total_tax = self.total_tax(discount);

        QuoteTotals {
            total_excl_tax,
            discount_amount,
            total_excl_tax_after_discount,
            total_tax,
            total_incl_tax: total_excl_tax_after_discount.saturating_add(total_tax),
        }
    }

    /// Sum of unit price × quantity over all lines.
    pub fn total_excl_tax(&self) -> Decimal {
        saturating_sum(self.lines.iter().map(LineItem::amount_excl_tax))
    }

    pub fn discount_amount(
        &self,
        discount: DiscountPercent,
    ) -> Decimal {
        self.total_excl_tax().saturating_mul(discount.rate())
    }

    pub fn total_excl_tax_after_discount(
        &self,
        discount: DiscountPercent,
    ) -> Decimal {
        self.total_excl_tax()
            .saturating_sub(self.discount_amount(discount))
    }

    /// VAT computed on each line's discounted amount, then summed.
    pub fn total_tax(
        &self,
        discount: DiscountPercent,
    ) -> Decimal {
        saturating_sum(self.lines.iter().map(|line| {
            let discounted = line.amount_excl_tax().saturating_mul(discount.remaining_rate());
            percent_of(discounted, line.tax_percent)
        }))
    }

    pub fn total_incl_tax(
        &self,
        discount: DiscountPercent,
    ) -> Decimal {
        self.total_excl_tax_after_discount(discount)
            .saturating_add(self.total_tax(discount))
    }
}

fn saturating_sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, Decimal::saturating_add)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn line(
        price: Decimal,
        quantity: Decimal,
        tax_percent: Decimal,
    ) -> LineItem {
        LineItem {
            unit_price_excl_tax: price,
            quantity,
            tax_percent,
            ..Default::default()
        }
    }

    // =========================================================================
    // line total tests
    // =========================================================================

    #[test]
    fn recompute_line_adds_vat_to_amount() {
        let mut item = line(dec!(100), dec!(2), dec!(20));

        recompute_line(&mut item);

        assert_eq!(item.total_incl_tax, dec!(240));
    }

    #[test]
    fn recompute_line_matches_closed_form() {
        let cases = [
            (dec!(100), dec!(2), dec!(20)),
            (dec!(19.99), dec!(3), dec!(5.5)),
            (dec!(0), dec!(7), dec!(20)),
            (dec!(42.42), dec!(1.5), dec!(0)),
            (dec!(1234.56), dec!(0.25), dec!(10)),
        ];

        for (price, quantity, tax) in cases {
            let mut item = line(price, quantity, tax);
            recompute_line(&mut item);

            let expected = price * quantity * (dec!(1) + tax / dec!(100));
            assert_eq!(item.total_incl_tax, expected, "price={price} qty={quantity} tax={tax}");
        }
    }

    #[test]
    fn recompute_line_overwrites_stale_cache() {
        let mut item = line(dec!(10), dec!(1), dec!(20));
        item.total_incl_tax = dec!(999);

        recompute_line(&mut item);

        assert_eq!(item.total_incl_tax, dec!(12));
    }

    // =========================================================================
    // quote total tests
    // =========================================================================

    #[test]
    fn totals_without_discount() {
        let lines = vec![line(dec!(100), dec!(2), dec!(20))];

        let totals = QuoteCalculator::new(&lines).calculate(DiscountPercent::ZERO);

        assert_eq!(totals.total_excl_tax, dec!(200));
        assert_eq!(totals.discount_amount, dec!(0));
        assert_eq!(totals.total_excl_tax_after_discount, dec!(200));
        assert_eq!(totals.total_tax, dec!(40));
        assert_eq!(totals.total_incl_tax, dec!(240));
    }

    #[test]
    fn totals_with_ten_percent_discount() {
        let lines = vec![line(dec!(100), dec!(2), dec!(20))];

        let totals = QuoteCalculator::new(&lines).calculate(DiscountPercent::new(dec!(10)));

        assert_eq!(totals.total_excl_tax, dec!(200));
        assert_eq!(totals.discount_amount, dec!(20));
        assert_eq!(totals.total_excl_tax_after_discount, dec!(180));
        assert_eq!(totals.total_tax, dec!(36));
        assert_eq!(totals.total_incl_tax, dec!(216));
    }

    #[test]
    fn line_total_ignores_discount_but_quote_total_applies_it() {
        let mut item = line(dec!(100), dec!(2), dec!(20));
        recompute_line(&mut item);
        let lines = vec![item];

        let totals = QuoteCalculator::new(&lines).calculate(DiscountPercent::new(dec!(10)));

        assert_eq!(lines[0].total_incl_tax, dec!(240));
        assert_eq!(totals.total_incl_tax, dec!(216));
    }

    #[test]
    fn tax_is_summed_per_line_with_mixed_rates() {
        let lines = vec![
            line(dec!(100), dec!(1), dec!(20)),
            line(dec!(50), dec!(2), dec!(10)),
        ];

        let totals = QuoteCalculator::new(&lines).calculate(DiscountPercent::new(dec!(50)));

        // (100 × 0.5 × 0.20) + (100 × 0.5 × 0.10) = 10 + 5
        assert_eq!(totals.total_tax, dec!(15));
        assert_eq!(totals.total_incl_tax, dec!(115));
    }

    #[test]
    fn total_excl_tax_is_additive_over_concatenation() {
        let a = vec![line(dec!(12.34), dec!(3), dec!(20)), line(dec!(5), dec!(1), dec!(5.5))];
        let b = vec![line(dec!(99.99), dec!(2), dec!(10))];
        let joined: Vec<LineItem> = a.iter().chain(b.iter()).cloned().collect();

        let sum = QuoteCalculator::new(&a).total_excl_tax() + QuoteCalculator::new(&b).total_excl_tax();

        assert_eq!(QuoteCalculator::new(&joined).total_excl_tax(), sum);
    }

    #[test]
    fn ttc_is_after_discount_plus_tax_for_any_discount() {
        let lines = vec![
            line(dec!(19.99), dec!(3), dec!(20)),
            line(dec!(7.35), dec!(2.5), dec!(5.5)),
            line(dec!(250), dec!(1), dec!(0)),
        ];
        let calc = QuoteCalculator::new(&lines);

        for percent in [dec!(0), dec!(3.5), dec!(10), dec!(33.33), dec!(100)] {
            let totals = calc.calculate(DiscountPercent::new(percent));
            assert_eq!(
                totals.total_incl_tax,
                totals.total_excl_tax_after_discount + totals.total_tax
            );
            assert_eq!(totals.total_incl_tax, calc.total_incl_tax(DiscountPercent::new(percent)));
        }
    }

    #[test]
    fn empty_quote_has_zero_totals() {
        let totals = QuoteCalculator::new(&[]).calculate(DiscountPercent::new(dec!(10)));

        assert_eq!(totals, QuoteTotals::default());
    }

    #[test]
    fn full_discount_leaves_nothing_to_pay() {
        let lines = vec![line(dec!(80), dec!(1), dec!(20))];

        let totals = QuoteCalculator::new(&lines).calculate(DiscountPercent::new(dec!(100)));

        assert_eq!(totals.total_excl_tax_after_discount, dec!(0));
        assert_eq!(totals.total_tax, dec!(0));
        assert_eq!(totals.total_incl_tax, dec!(0));
    }

    #[test]
    fn rounded_rounds_each_total_to_cents() {
        let lines = vec![line(dec!(33.333), dec!(1), dec!(20))];

        let totals = QuoteCalculator::new(&lines)
            .calculate(DiscountPercent::ZERO)
            .rounded();

        assert_eq!(totals.total_excl_tax, dec!(33.33));
        assert_eq!(totals.total_tax, dec!(6.67));
        assert_eq!(totals.total_incl_tax, dec!(40.00));
    }

    // =========================================================================
    // oversized input tests
    // =========================================================================

    #[test]
    fn oversized_line_saturates_instead_of_panicking() {
        let mut item = line(Decimal::MAX, dec!(1), dec!(20));

        recompute_line(&mut item);

        assert_eq!(item.total_incl_tax, Decimal::MAX);
    }

    #[test]
    fn oversized_quote_totals_saturate() {
        let lines = vec![
            line(dec!(100000000000000000000), dec!(100000000000000000000), dec!(20)),
            line(dec!(10), dec!(1), dec!(20)),
        ];

        let totals = QuoteCalculator::new(&lines).calculate(DiscountPercent::new(dec!(10)));

        assert_eq!(totals.total_excl_tax, Decimal::MAX);
        assert_eq!(totals.total_incl_tax, Decimal::MAX);
        assert!(totals.total_tax > Decimal::ZERO);
        assert_eq!(totals.rounded().total_incl_tax, Decimal::MAX);
    }
}
