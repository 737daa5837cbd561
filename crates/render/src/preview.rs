//! Plain-text live preview shown next to the input form.

use std::fmt::Write as _;

use invoicepad_invoicing::{BusinessSettings, InvoiceDraft, LineItem, Totals};

use crate::format::{PREVIEW_CURRENCY, format_amount, format_bill_date, format_percent, format_quantity};
use crate::metrics::collapse_whitespace;

const PLACEHOLDER: &str = "-";
const EMPTY_TABLE: &str = "No items added yet";

fn or_placeholder(text: &str) -> &str {
    let trimmed = text.trim();
    if trimmed.is_empty() { PLACEHOLDER } else { trimmed }
}

/// Render the preview. Never fails: missing fields show as `-`.
pub fn render_preview(
    settings: &BusinessSettings,
    draft: &InvoiceDraft,
    items: &[LineItem],
    totals: &Totals,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} {}", settings.shop_logo, settings.shop_name);
    let _ = writeln!(out, "{}", settings.shop_address);
    let _ = writeln!(out, "{}", settings.primary_contact());
    let _ = writeln!(out, "GST No: {}", settings.tax_registration_id);
    out.push('\n');

    let _ = writeln!(out, "Bill No: {}", or_placeholder(&draft.bill_number));
    let _ = writeln!(out, "Date: {}", format_bill_date(draft.bill_date));
    let _ = writeln!(out, "Customer: {}", or_placeholder(&draft.customer_name));
    let _ = writeln!(out, "Address: {}", or_placeholder(&draft.customer_address));
    out.push('\n');

    if items.is_empty() {
        let _ = writeln!(out, "{EMPTY_TABLE}");
    } else {
        let _ = writeln!(out, "Item | Qty | Rate | Amount");
        for item in items {
            let _ = writeln!(
                out,
                "{} | {} | {} | {}",
                collapse_whitespace(item.name()),
                format_quantity(item.quantity()),
                format_amount(item.unit_price(), PREVIEW_CURRENCY),
                format_amount(item.line_total(), PREVIEW_CURRENCY),
            );
        }
    }
    out.push('\n');

    let _ = writeln!(out, "Subtotal: {}", format_amount(totals.subtotal, PREVIEW_CURRENCY));
    let _ = writeln!(
        out,
        "GST ({}%): {}",
        format_percent(draft.tax_rate_percent()),
        format_amount(totals.tax_amount, PREVIEW_CURRENCY)
    );
    let _ = writeln!(out, "Grand Total: {}", format_amount(totals.grand_total, PREVIEW_CURRENCY));

    out
}
