use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use invoicepad_core::{DomainError, DomainResult, Entity, LineItemId, ValidationError};

/// One invoice row.
///
/// Built only through [`LineItem::new`], so every instance satisfies the row
/// invariants (trimmed non-empty name, positive quantity and price). Immutable
/// once created; `line_total` is fixed at construction and never rounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    id: LineItemId,
    name: String,
    quantity: Decimal,
    unit_price: Decimal,
    line_total: Decimal,
}

impl LineItem {
    /// Validate the inputs and build the row.
    ///
    /// Checks run in a fixed order (name, quantity, price) so a row with several
    /// problems always reports the same one.
    pub fn new(
        id: LineItemId,
        name: &str,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> DomainResult<Self> {
        Self::validate(name, quantity, unit_price)?;
        let line_total = quantity
            .checked_mul(unit_price)
            .ok_or_else(|| DomainError::invariant("line total overflow"))?;

        Ok(Self {
            id,
            name: name.trim().to_string(),
            quantity,
            unit_price,
            line_total,
        })
    }

    /// Row validation without allocating an id.
    pub fn validate(name: &str, quantity: Decimal, unit_price: Decimal) -> Result<(), ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if quantity <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveQuantity);
        }
        if unit_price <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePrice);
        }
        Ok(())
    }

    pub fn item_id(&self) -> LineItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn line_total(&self) -> Decimal {
        self.line_total
    }
}

impl Entity for LineItem {
    type Id = LineItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
