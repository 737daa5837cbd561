//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// A required business-settings field.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SettingsField {
    ShopName,
    ShopAddress,
    ShopContact,
}

impl SettingsField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsField::ShopName => "shop_name",
            SettingsField::ShopAddress => "shop_address",
            SettingsField::ShopContact => "shop_contact",
        }
    }
}

impl core::fmt::Display for SettingsField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input validation failure.
///
/// Every variant is local and recoverable: the rejected operation leaves the
/// ledger (or the current settings) exactly as it was.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("item name must not be empty")]
    EmptyName,

    #[error("quantity must be greater than zero")]
    NonPositiveQuantity,

    #[error("unit price must be greater than zero")]
    NonPositivePrice,

    #[error("tax rate must not be negative")]
    NegativeTaxRate,

    #[error("required field is missing: {field}")]
    MissingRequiredField { field: SettingsField },
}

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants). Storage and rendering concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// The underlying validation failure, if this is one.
    pub fn as_validation(&self) -> Option<ValidationError> {
        match self {
            DomainError::Validation(v) => Some(*v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_message_names_the_field() {
        let err = ValidationError::MissingRequiredField {
            field: SettingsField::ShopAddress,
        };
        assert_eq!(err.to_string(), "required field is missing: shop_address");
    }

    #[test]
    fn validation_converts_into_domain_error() {
        let err: DomainError = ValidationError::EmptyName.into();
        assert_eq!(err.as_validation(), Some(ValidationError::EmptyName));
        assert_eq!(DomainError::invariant("x").as_validation(), None);
    }
}
