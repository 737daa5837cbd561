//! Invoice drafting domain.
//!
//! Line-item ledger, totals, bill metadata and business settings, implemented
//! purely as deterministic domain logic (no IO, no storage, no drawing).

pub mod draft;
pub mod ledger;
pub mod line_item;
pub mod settings;
pub mod totals;

pub use draft::InvoiceDraft;
pub use ledger::Ledger;
pub use line_item::LineItem;
pub use settings::{BusinessSettings, PartialBusinessSettings, update_settings};
pub use totals::Totals;
