//! Lenient parsing of user-typed numbers at the UI boundary.
//!
//! The domain operations are strict; this is the one place where free text is
//! coerced into a number.

use core::str::FromStr;

use rust_decimal::Decimal;

/// Parse `text` as a decimal, falling back to `default`.
///
/// Accepts surrounding whitespace and a trailing non-numeric suffix
/// (`"12.5kg"` parses as `12.5`). Blank or non-numeric text yields `default`.
pub fn parse_decimal_or_default(text: &str, default: Decimal) -> Decimal {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return default;
    }
    if let Ok(value) = Decimal::from_str(trimmed) {
        return value;
    }
    let prefix = numeric_prefix(trimmed);
    Decimal::from_str(prefix).unwrap_or(default)
}

/// Longest prefix shaped like `[+-]digits[.digits]`.
fn numeric_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let mut seen_dot = false;
    let mut seen_digit = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return "";
    }
    text[..end].trim_end_matches('.')
}
