//! Invoice presentation: the printable document layout, its PDF output and
//! the live preview.
//!
//! Layout produces positioned drawing primitives that any [`DrawingBackend`]
//! can replay; [`pdf::KrillaBackend`] turns them into PDF bytes.

pub mod document;
pub mod error;
pub mod fonts;
pub mod format;
pub mod layout;
pub mod metrics;
pub mod pdf;
pub mod preview;

pub use document::{
    DEFAULT_ROWS_PER_PAGE, DocumentInput, DocumentPage, DocumentRenderer, InvoiceDocument,
    LayoutConfig, TableRow,
};
pub use error::RenderError;
pub use fonts::{FontFace, PdfFonts};
pub use layout::{Align, DrawingBackend, Element, FontWeight, TextRun};
pub use metrics::{AverageAdvance, TextMeasure};
pub use pdf::{KrillaBackend, PdfError, render_pdf};
pub use preview::render_preview;
