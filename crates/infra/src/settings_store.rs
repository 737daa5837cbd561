//! Persisted business settings.
//!
//! A single JSON record under [`SETTINGS_KEY`]. Loaded once, merged over the
//! defaults, written back after every accepted change.

use thiserror::Error;

use invoicepad_core::ValidationError;
use invoicepad_invoicing::{BusinessSettings, PartialBusinessSettings, update_settings};

use crate::store::{KeyValueStore, StoreError};

pub const SETTINGS_KEY: &str = "businessSettings";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Current business settings backed by a [`KeyValueStore`].
#[derive(Debug)]
pub struct BusinessSettingsStore<S> {
    store: S,
    current: BusinessSettings,
}

impl<S: KeyValueStore> BusinessSettingsStore<S> {
    /// Read the persisted record.
    ///
    /// A missing record yields the defaults and missing fields are filled
    /// from them. A field holding something other than text is logged and
    /// dropped on its own; a record that is not a JSON object is logged and
    /// ignored. Either way the next save overwrites it.
    pub fn load(store: S) -> Result<Self, StoreError> {
        let current = match store.get(SETTINGS_KEY)? {
            None => BusinessSettings::default(),
            Some(raw) => BusinessSettings::merged_over_defaults(decode_record(&raw)),
        };

        Ok(Self { store, current })
    }

    pub fn current(&self) -> &BusinessSettings {
        &self.current
    }

    /// Validate, persist, then make `new` current.
    ///
    /// Nothing is written and the previous settings stay current when either
    /// validation or the write fails.
    pub fn update(&mut self, new: &BusinessSettings) -> Result<&BusinessSettings, SettingsError> {
        let accepted = update_settings(&self.current, new)?;
        self.persist(&accepted)?;
        self.current = accepted;
        tracing::info!(shop = %self.current.shop_name, "business settings saved");
        Ok(&self.current)
    }

    /// Go back to the defaults and persist them.
    pub fn restore_defaults(&mut self) -> Result<&BusinessSettings, StoreError> {
        let defaults = BusinessSettings::default();
        self.persist(&defaults)?;
        self.current = defaults;
        tracing::info!("business settings reset to defaults");
        Ok(&self.current)
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn persist(&self, settings: &BusinessSettings) -> Result<(), StoreError> {
        let json = serde_json::to_string(settings).map_err(|source| StoreError::Serialization {
            key: SETTINGS_KEY.to_string(),
            source,
        })?;
        self.store.set(SETTINGS_KEY, &json)
    }
}

/// Keep every text field of a stored record, whatever state the rest is in.
fn decode_record(raw: &str) -> PartialBusinessSettings {
    let fields = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(fields)) => fields,
        Ok(other) => {
            tracing::warn!(key = SETTINGS_KEY, found = %other, "ignoring business settings that are not an object");
            return PartialBusinessSettings::default();
        }
        Err(err) => {
            tracing::warn!(key = SETTINGS_KEY, error = %err, "ignoring malformed business settings");
            return PartialBusinessSettings::default();
        }
    };

    let text_fields: serde_json::Map<String, serde_json::Value> = fields
        .into_iter()
        .filter(|(name, value)| {
            let keep = value.is_string() || value.is_null();
            if !keep {
                tracing::warn!(key = SETTINGS_KEY, field = %name, "ignoring non-text business setting");
            }
            keep
        })
        .collect();

    serde_json::from_value(serde_json::Value::Object(text_fields)).unwrap_or_else(|err| {
        tracing::warn!(key = SETTINGS_KEY, error = %err, "ignoring unreadable business settings");
        PartialBusinessSettings::default()
    })
}
