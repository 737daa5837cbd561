//! Infrastructure layer: settings storage and configuration.

pub mod config;
pub mod settings_store;
pub mod store;

pub use config::AppConfig;
pub use settings_store::{BusinessSettingsStore, SETTINGS_KEY, SettingsError};
pub use store::{FileStore, InMemoryStore, KeyValueStore, StoreError};
