//! Invoice drafting session: the entry point a UI host drives.
//!
//! Replaces a process-wide application object with an explicit
//! [`InvoiceSession`] owned by the caller.

pub mod session;

pub use session::{InvoiceSession, RenderedPdf, SessionError, SessionResult};

use invoicepad_infra::{AppConfig, KeyValueStore};
use invoicepad_observability::tracing::LogFormat;

/// Environment variable selecting the log output (`json` or `pretty`).
pub const ENV_LOG_FORMAT: &str = "INVOICEPAD_LOG_FORMAT";

/// Install logging and open a session configured from the environment.
pub fn bootstrap() -> anyhow::Result<InvoiceSession<Box<dyn KeyValueStore>>> {
    let format = std::env::var(ENV_LOG_FORMAT)
        .map(|name| LogFormat::from_name(&name))
        .unwrap_or_default();
    invoicepad_observability::tracing::init(format);

    let config = AppConfig::from_env();
    InvoiceSession::open(&config)
}
