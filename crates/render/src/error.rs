use thiserror::Error;

/// Why an invoice could not be laid out.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("bill number is required")]
    MissingBillNumber,

    #[error("customer name is required")]
    MissingCustomerName,

    #[error("invoice has no line items")]
    NoItems,

    #[error("invalid layout configuration: {0}")]
    InvalidConfig(String),
}
