//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two totals
/// records with the same amounts are the same totals. To "modify" one, build a
/// new one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Totals { subtotal: Decimal, tax_amount: Decimal, grand_total: Decimal }
///
/// impl ValueObject for Totals {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
