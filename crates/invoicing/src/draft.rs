use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use invoicepad_core::{DomainResult, ValidationError};

/// Bill metadata typed alongside the line items.
///
/// All text is free-form; nothing here is required until the invoice is laid
/// out for printing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub bill_number: String,
    pub bill_date: NaiveDate,
    pub customer_name: String,
    pub customer_address: String,
    tax_rate_percent: Decimal,
}

impl InvoiceDraft {
    /// Blank draft dated today with the given default rate.
    pub fn new(default_tax_rate: Decimal) -> DomainResult<Self> {
        Self::dated(Local::now().date_naive(), default_tax_rate)
    }

    pub fn dated(bill_date: NaiveDate, tax_rate_percent: Decimal) -> DomainResult<Self> {
        let mut draft = Self {
            bill_number: String::new(),
            bill_date,
            customer_name: String::new(),
            customer_address: String::new(),
            tax_rate_percent: Decimal::ZERO,
        };
        draft.set_tax_rate(tax_rate_percent)?;
        Ok(draft)
    }

    pub fn tax_rate_percent(&self) -> Decimal {
        self.tax_rate_percent
    }

    /// Replace the invoice-wide tax rate. Negative rates are rejected.
    pub fn set_tax_rate(&mut self, tax_rate_percent: Decimal) -> DomainResult<()> {
        if tax_rate_percent < Decimal::ZERO {
            return Err(ValidationError::NegativeTaxRate.into());
        }
        self.tax_rate_percent = tax_rate_percent;
        Ok(())
    }

    /// Clear the text fields and go back to `today` and `default_tax_rate`.
    pub fn reset(&mut self, today: NaiveDate, default_tax_rate: Decimal) -> DomainResult<()> {
        *self = Self::dated(today, default_tax_rate)?;
        Ok(())
    }
}
