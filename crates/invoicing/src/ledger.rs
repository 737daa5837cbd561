use rust_decimal::Decimal;

use invoicepad_core::{DomainResult, IdSequence, LineItemId};

use crate::line_item::LineItem;
use crate::totals::Totals;

/// Ordered line items of one invoice draft.
///
/// Insertion order is display order. Items are appended by [`Ledger::add_item`]
/// and leave only through [`Ledger::remove_item`] or [`Ledger::reset`]; there is
/// no edit or reorder operation.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    items: Vec<LineItem>,
    ids: IdSequence,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a row.
    ///
    /// A row failing validation leaves the ledger untouched and does not
    /// consume an id.
    pub fn add_item(
        &mut self,
        name: &str,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> DomainResult<LineItem> {
        LineItem::validate(name, quantity, unit_price)?;

        let id = self.ids.next_id()?;
        let item = LineItem::new(id, name, quantity, unit_price)?;
        tracing::debug!(item_id = %id, line_total = %item.line_total(), "line item added");

        self.items.push(item.clone());
        Ok(item)
    }

    /// Remove the row with `id`. Unknown ids are ignored.
    ///
    /// Returns whether a row was removed.
    pub fn remove_item(&mut self, id: LineItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.item_id() != id);
        let removed = self.items.len() != before;
        if removed {
            tracing::debug!(item_id = %id, "line item removed");
        }
        removed
    }

    pub fn list_items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn get(&self, id: LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.item_id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Subtotal, tax and grand total for `tax_rate_percent`.
    ///
    /// Negative rates are rejected; coercing missing input to zero is the
    /// caller's job.
    pub fn compute_totals(&self, tax_rate_percent: Decimal) -> DomainResult<Totals> {
        Totals::compute(&self.items, tax_rate_percent)
    }

    /// Drop every row. Ids keep increasing afterwards.
    pub fn reset(&mut self) {
        tracing::debug!(cleared = self.items.len(), "ledger reset");
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoicepad_core::{DomainError, ValidationError};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn validation(err: DomainError) -> ValidationError {
        err.as_validation().expect("expected a validation error")
    }

    #[test]
    fn add_item_appends_in_order() {
        let mut ledger = Ledger::new();
        let pen = ledger.add_item("Pen", dec!(10), dec!(2.50)).unwrap();
        let notebook = ledger.add_item("Notebook", dec!(3), dec!(45.00)).unwrap();

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.list_items()[0], pen);
        assert_eq!(ledger.list_items()[1], notebook);
        assert!(pen.item_id() < notebook.item_id());
        assert_eq!(notebook.line_total(), dec!(135.00));
    }

    #[test]
    fn invalid_rows_leave_ledger_unchanged() {
        let mut ledger = Ledger::new();
        ledger.add_item("Pen", dec!(1), dec!(1)).unwrap();
        let snapshot = ledger.list_items().to_vec();

        assert_eq!(
            validation(ledger.add_item("", dec!(1), dec!(1)).unwrap_err()),
            ValidationError::EmptyName
        );
        assert_eq!(
            validation(ledger.add_item("x", dec!(0), dec!(1)).unwrap_err()),
            ValidationError::NonPositiveQuantity
        );
        assert_eq!(
            validation(ledger.add_item("x", dec!(1), dec!(0)).unwrap_err()),
            ValidationError::NonPositivePrice
        );
        assert_eq!(ledger.list_items(), snapshot.as_slice());
    }

    #[test]
    fn rejected_rows_do_not_consume_ids() {
        let mut ledger = Ledger::new();
        let first = ledger.add_item("a", dec!(1), dec!(1)).unwrap();
        let _ = ledger.add_item("", dec!(1), dec!(1));
        let second = ledger.add_item("b", dec!(1), dec!(1)).unwrap();
        assert_eq!(second.item_id().as_u64(), first.item_id().as_u64() + 1);
    }

    #[test]
    fn removing_unknown_id_is_noop() {
        let mut ledger = Ledger::new();
        ledger.add_item("Pen", dec!(1), dec!(1)).unwrap();
        let snapshot = ledger.list_items().to_vec();

        assert!(!ledger.remove_item(LineItemId::from_raw(999)));
        assert_eq!(ledger.list_items(), snapshot.as_slice());
    }

    #[test]
    fn removal_is_idempotent() {
        let mut ledger = Ledger::new();
        let pen = ledger.add_item("Pen", dec!(1), dec!(1)).unwrap();
        ledger.add_item("Ink", dec!(2), dec!(3)).unwrap();

        assert!(ledger.remove_item(pen.item_id()));
        let once = ledger.list_items().to_vec();
        assert!(!ledger.remove_item(pen.item_id()));
        assert_eq!(ledger.list_items(), once.as_slice());
        assert!(ledger.get(pen.item_id()).is_none());
    }

    #[test]
    fn worked_example_totals() {
        let mut ledger = Ledger::new();
        ledger.add_item("Pen", dec!(10), dec!(2.50)).unwrap();
        ledger.add_item("Notebook", dec!(3), dec!(45.00)).unwrap();

        let totals = ledger.compute_totals(dec!(18)).unwrap();
        assert_eq!(totals.subtotal, dec!(160.00));
        assert_eq!(totals.tax_amount, dec!(28.80));
        assert_eq!(totals.grand_total, dec!(188.80));
    }

    #[test]
    fn empty_ledger_totals_are_zero() {
        let ledger = Ledger::new();
        for rate in [dec!(0), dec!(18), dec!(250.5)] {
            assert_eq!(ledger.compute_totals(rate).unwrap(), Totals::zero());
        }
    }

    #[test]
    fn negative_tax_rate_is_rejected() {
        let mut ledger = Ledger::new();
        ledger.add_item("Pen", dec!(1), dec!(1)).unwrap();
        assert_eq!(
            validation(ledger.compute_totals(dec!(-1)).unwrap_err()),
            ValidationError::NegativeTaxRate
        );
    }

    #[test]
    fn reset_empties_and_keeps_ids_fresh() {
        let mut ledger = Ledger::new();
        let old = ledger.add_item("Pen", dec!(1), dec!(1)).unwrap();
        ledger.reset();
        assert!(ledger.is_empty());

        let fresh = ledger.add_item("Pen", dec!(1), dec!(1)).unwrap();
        assert!(fresh.item_id() > old.item_id());

        ledger.reset();
        ledger.reset();
        assert!(ledger.list_items().is_empty());
    }

    fn row() -> impl Strategy<Value = (String, Decimal, Decimal)> {
        (
            "[a-zA-Z][a-zA-Z ]{0,15}",
            1i64..100_000,
            1i64..10_000_000,
        )
            .prop_map(|(name, qty_milli, price_cents)| {
                (name, Decimal::new(qty_milli, 3), Decimal::new(price_cents, 2))
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: every valid row appends exactly one item with qty * price.
        #[test]
        fn valid_rows_append_one_item(rows in prop::collection::vec(row(), 1..20)) {
            let mut ledger = Ledger::new();
            for (name, qty, price) in rows {
                let before = ledger.len();
                let item = ledger.add_item(&name, qty, price).unwrap();
                prop_assert_eq!(ledger.len(), before + 1);
                prop_assert_eq!(item.line_total(), qty * price);
                prop_assert_eq!(ledger.list_items().last(), Some(&item));
            }
        }

        /// Property: totals do not depend on insertion order.
        #[test]
        fn totals_are_order_independent(
            (rows, shuffled) in prop::collection::vec(row(), 0..20)
                .prop_flat_map(|rows| (Just(rows.clone()), Just(rows).prop_shuffle())),
            rate in 0i64..10_000,
        ) {
            let rate = Decimal::new(rate, 2);
            let mut original = Ledger::new();
            let mut permuted = Ledger::new();
            for (name, qty, price) in &rows {
                original.add_item(name, *qty, *price).unwrap();
            }
            for (name, qty, price) in &shuffled {
                permuted.add_item(name, *qty, *price).unwrap();
            }
            prop_assert_eq!(
                original.compute_totals(rate).unwrap(),
                permuted.compute_totals(rate).unwrap()
            );
        }

        /// Property: removing an id twice ends where removing it once does.
        #[test]
        fn double_removal_matches_single(
            rows in prop::collection::vec(row(), 1..10),
            pick in any::<prop::sample::Index>(),
        ) {
            let mut once = Ledger::new();
            for (name, qty, price) in &rows {
                once.add_item(name, *qty, *price).unwrap();
            }
            let mut twice = once.clone();
            let target = once.list_items()[pick.index(rows.len())].item_id();

            once.remove_item(target);
            twice.remove_item(target);
            twice.remove_item(target);
            prop_assert_eq!(once.list_items(), twice.list_items());
        }
    }
}
