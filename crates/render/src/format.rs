//! Display formatting. Amounts are rounded here and nowhere else.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};

/// Currency prefix used on the printed document.
pub const DOCUMENT_CURRENCY: &str = "Rs.";

/// Currency glyph used in the on-screen preview.
pub const PREVIEW_CURRENCY: &str = "₹";

/// `prefix` followed by `value` rounded half away from zero to two places.
pub fn format_amount(value: Decimal, prefix: &str) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    format!("{prefix}{rounded}")
}

/// Quantity without trailing zeros (`2.500` prints as `2.5`).
pub fn format_quantity(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Percentage without trailing zeros (`18.00` prints as `18`).
pub fn format_percent(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Long date, e.g. `16 October 2026`.
pub fn format_bill_date(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

pub fn format_generated_at(at: NaiveDateTime) -> String {
    at.format("%d/%m/%Y, %H:%M:%S").to_string()
}

/// `Invoice_<bill>_<YYYYMMDD>_<HHMM>.pdf`; path separators in the bill number
/// become `_`.
pub fn document_file_name(bill_number: &str, at: NaiveDateTime) -> String {
    let bill: String = bill_number
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("Invoice_{bill}_{}.pdf", at.format("%Y%m%d_%H%M"))
}
