/// Property-based tests for invoice line and total calculation
///
/// Per line: taxable = quantity × unitPrice − discount, tax = round2(taxable × 0.18),
/// total = taxable + tax. Per invoice: total = subtotal − discount + tax.

use negocio::modules::taxes::services::{round2, TaxCalculator};
use negocio::modules::taxes::{LineAmounts, IGV_RATE};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Unit price in cents, so every generated price has at most two decimals
fn price(cents: u32) -> Decimal {
    Decimal::new(i64::from(cents), 2)
}

proptest! {
    /// Property: line total == taxable + round2(taxable × 18%)
    #[test]
    fn test_line_total_property(
        quantity in 1u32..1000u32,
        unit_cents in 0u32..10_000_000u32,
        discount_share in 0u32..=100u32,
    ) {
        let calc = TaxCalculator::new();
        let unit_price = price(unit_cents);
        let gross = Decimal::from(quantity) * unit_price;
        let discount = round2(gross * Decimal::from(discount_share) / dec!(100));

        let line = calc.line_amounts(quantity, unit_price, discount).unwrap();

        prop_assert_eq!(line.taxable, gross - discount);
        prop_assert_eq!(line.tax, round2(line.taxable * IGV_RATE));
        prop_assert_eq!(line.total, line.taxable + line.tax);
        prop_assert!(line.tax.scale() <= 2);
        prop_assert!(line.total >= line.taxable);
    }

    /// Property: invoice totals balance for any set of lines
    #[test]
    fn test_invoice_totals_balance(
        lines in prop::collection::vec((1u32..50u32, 0u32..500_000u32), 1..10),
    ) {
        let calc = TaxCalculator::new();
        let amounts: Vec<LineAmounts> = lines
            .iter()
            .map(|(qty, cents)| calc.line_amounts(*qty, price(*cents), Decimal::ZERO).unwrap())
            .collect();

        let totals = calc.totals(&amounts).unwrap();

        prop_assert_eq!(totals.total, totals.subtotal - totals.discount + totals.tax);
        prop_assert_eq!(totals.tax, amounts.iter().map(|l| l.tax).sum::<Decimal>());
    }

    /// Property: a discount above the gross amount is always rejected
    #[test]
    fn test_excess_discount_rejected(
        quantity in 1u32..100u32,
        unit_cents in 1u32..100_000u32,
        excess_cents in 1u32..10_000u32,
    ) {
        let calc = TaxCalculator::new();
        let unit_price = price(unit_cents);
        let gross = Decimal::from(quantity) * unit_price;

        prop_assert!(calc.line_amounts(quantity, unit_price, gross + price(excess_cents)).is_err());
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_factura_single_item_scenario() {
        let calc = TaxCalculator::new();
        let line = calc.line_amounts(1, dec!(100), dec!(0)).unwrap();
        let totals = calc.totals([&line]).unwrap();

        assert_eq!(totals.subtotal, dec!(100));
        assert_eq!(totals.tax, dec!(18.00));
        assert_eq!(totals.total, dec!(118.00));
    }

    #[test]
    fn test_discounted_line() {
        let line = TaxCalculator::new()
            .line_amounts(1, dec!(8.50), dec!(5))
            .unwrap();

        assert_eq!(line.taxable, dec!(3.50));
        assert_eq!(line.tax, dec!(0.63));
        assert_eq!(line.total, dec!(4.13));
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // 0.25 × 0.18 = 0.045
        let line = TaxCalculator::new()
            .line_amounts(1, dec!(0.25), dec!(0))
            .unwrap();
        assert_eq!(line.tax, dec!(0.05));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        assert!(TaxCalculator::new()
            .line_amounts(0, dec!(10), dec!(0))
            .is_err());
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(TaxCalculator::new()
            .line_amounts(1, dec!(-1), dec!(0))
            .is_err());
    }
}
