use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use invoicepad_core::{DomainError, DomainResult, ValidationError, ValueObject};

use crate::line_item::LineItem;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Subtotal / tax / grand total of a ledger.
///
/// Values are unrounded; two-decimal formatting happens at display time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub grand_total: Decimal,
}

impl ValueObject for Totals {}

impl Totals {
    pub fn zero() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            grand_total: Decimal::ZERO,
        }
    }

    /// Apply a single percentage rate to a subtotal.
    pub fn from_subtotal(subtotal: Decimal, tax_rate_percent: Decimal) -> DomainResult<Self> {
        if tax_rate_percent < Decimal::ZERO {
            return Err(ValidationError::NegativeTaxRate.into());
        }
        let tax_amount = subtotal
            .checked_mul(tax_rate_percent)
            .and_then(|scaled| scaled.checked_div(HUNDRED))
            .ok_or_else(|| DomainError::invariant("tax amount overflow"))?;
        let grand_total = subtotal
            .checked_add(tax_amount)
            .ok_or_else(|| DomainError::invariant("grand total overflow"))?;

        Ok(Self {
            subtotal,
            tax_amount,
            grand_total,
        })
    }

    /// Sum the rows, then apply the rate.
    pub fn compute<'a, I>(items: I, tax_rate_percent: Decimal) -> DomainResult<Self>
    where
        I: IntoIterator<Item = &'a LineItem>,
    {
        let mut subtotal = Decimal::ZERO;
        for item in items {
            subtotal = subtotal
                .checked_add(item.line_total())
                .ok_or_else(|| DomainError::invariant("subtotal overflow"))?;
        }
        Self::from_subtotal(subtotal, tax_rate_percent)
    }
}

impl Default for Totals {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoicepad_core::LineItemId;
    use rust_decimal_macros::dec;

    #[test]
    fn rate_applies_to_subtotal() {
        let t = Totals::from_subtotal(dec!(160.00), dec!(18)).unwrap();
        assert_eq!(t.tax_amount, dec!(28.80));
        assert_eq!(t.grand_total, dec!(188.80));
    }

    #[test]
    fn zero_rate_is_allowed() {
        let t = Totals::from_subtotal(dec!(10), Decimal::ZERO).unwrap();
        assert_eq!(t.tax_amount, Decimal::ZERO);
        assert_eq!(t.grand_total, dec!(10));
    }

    #[test]
    fn negative_rate_is_rejected() {
        assert_eq!(
            Totals::from_subtotal(dec!(10), dec!(-0.5))
                .unwrap_err()
                .as_validation(),
            Some(ValidationError::NegativeTaxRate)
        );
    }

    #[test]
    fn fractional_tax_is_kept_unrounded() {
        let item = LineItem::new(LineItemId::from_raw(1), "Tea", dec!(1), dec!(0.99)).unwrap();
        let t = Totals::compute([&item], dec!(5)).unwrap();
        assert_eq!(t.tax_amount, dec!(0.0495));
    }
}
