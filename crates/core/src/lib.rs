//! `invoicepad-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no storage, no rendering).

pub mod entity;
pub mod error;
pub mod id;
pub mod input;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult, SettingsField, ValidationError};
pub use id::{IdSequence, LineItemId};
pub use input::parse_decimal_or_default;
pub use value_object::ValueObject;
