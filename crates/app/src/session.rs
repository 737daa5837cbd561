use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::{Local, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use thiserror::Error;

use invoicepad_core::{DomainError, LineItemId, parse_decimal_or_default};
use invoicepad_infra::{
    AppConfig, BusinessSettingsStore, FileStore, InMemoryStore, KeyValueStore, SettingsError,
    StoreError,
};
use invoicepad_invoicing::{BusinessSettings, InvoiceDraft, Ledger, LineItem, Totals};
use invoicepad_render::{
    DocumentInput, DocumentRenderer, InvoiceDocument, LayoutConfig, PdfError, PdfFonts, RenderError,
    render_pdf, render_preview,
};

/// Failure of a user action. None of these end the session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Pdf(#[from] PdfError),

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type SessionResult<T> = Result<T, SessionError>;

/// A finished PDF and the name it should be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPdf {
    pub file_name: String,
    pub pages: usize,
    pub bytes: Vec<u8>,
}

/// One invoice-drafting session: the ledger being edited, the bill metadata,
/// and the seller settings. The host owns it and forwards user actions.
#[derive(Debug)]
pub struct InvoiceSession<S> {
    ledger: Ledger,
    draft: InvoiceDraft,
    settings: BusinessSettingsStore<S>,
    renderer: DocumentRenderer,
    default_tax_rate: Decimal,
    font_files: (Option<PathBuf>, Option<PathBuf>),
    fonts: Option<PdfFonts>,
}

impl InvoiceSession<Box<dyn KeyValueStore>> {
    /// Open a session as configured: file-backed settings when a data
    /// directory is set, in-memory otherwise.
    pub fn open(config: &AppConfig) -> anyhow::Result<Self> {
        let store: Box<dyn KeyValueStore> = match &config.data_dir {
            Some(dir) => Box::new(
                FileStore::open(dir)
                    .with_context(|| format!("failed to open settings directory {}", dir.display()))?,
            ),
            None => Box::new(InMemoryStore::new()),
        };
        Self::with_store(store, config)
    }
}

impl<S: KeyValueStore> InvoiceSession<S> {
    pub fn with_store(store: S, config: &AppConfig) -> anyhow::Result<Self> {
        let settings = BusinessSettingsStore::load(store).context("failed to load business settings")?;
        let renderer = DocumentRenderer::new(LayoutConfig::default().with_rows_per_page(config.rows_per_page))
            .context("invalid document layout")?;
        let draft = InvoiceDraft::new(config.default_tax_rate).context("invalid default tax rate")?;

        tracing::info!(
            shop = %settings.current().shop_name,
            default_tax_rate = %config.default_tax_rate,
            rows_per_page = config.rows_per_page,
            "invoice session opened"
        );

        Ok(Self {
            ledger: Ledger::new(),
            draft,
            settings,
            renderer,
            default_tax_rate: config.default_tax_rate,
            font_files: (config.font_regular.clone(), config.font_bold.clone()),
            fonts: None,
        })
    }

    pub fn add_item(&mut self, name: &str, quantity: Decimal, unit_price: Decimal) -> SessionResult<LineItem> {
        Ok(self.ledger.add_item(name, quantity, unit_price)?)
    }

    /// Add a row from raw form text. Unparseable numbers count as zero and are
    /// then rejected by validation.
    pub fn add_item_from_input(&mut self, name: &str, quantity: &str, unit_price: &str) -> SessionResult<LineItem> {
        let quantity = parse_decimal_or_default(quantity, Decimal::ZERO);
        let unit_price = parse_decimal_or_default(unit_price, Decimal::ZERO);
        self.add_item(name, quantity, unit_price)
    }

    pub fn remove_item(&mut self, id: LineItemId) {
        self.ledger.remove_item(id);
    }

    pub fn items(&self) -> &[LineItem] {
        self.ledger.list_items()
    }

    pub fn draft(&self) -> &InvoiceDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut InvoiceDraft {
        &mut self.draft
    }

    /// Set the rate from raw form text; blank or non-numeric text means 0.
    pub fn set_tax_rate_input(&mut self, text: &str) -> SessionResult<()> {
        let rate = parse_decimal_or_default(text, Decimal::ZERO);
        Ok(self.draft.set_tax_rate(rate)?)
    }

    pub fn totals(&self) -> SessionResult<Totals> {
        Ok(self.ledger.compute_totals(self.draft.tax_rate_percent())?)
    }

    pub fn settings(&self) -> &BusinessSettings {
        self.settings.current()
    }

    pub fn save_settings(&mut self, new: &BusinessSettings) -> SessionResult<&BusinessSettings> {
        Ok(self.settings.update(new)?)
    }

    pub fn restore_default_settings(&mut self) -> SessionResult<&BusinessSettings> {
        Ok(self.settings.restore_defaults()?)
    }

    /// Clear the form: items, bill fields, and the rate back to its default.
    pub fn reset_form(&mut self, today: NaiveDate) -> SessionResult<()> {
        self.ledger.reset();
        self.draft.reset(today, self.default_tax_rate)?;
        tracing::info!("invoice form reset");
        Ok(())
    }

    pub fn preview(&self) -> SessionResult<String> {
        let totals = self.totals()?;
        Ok(render_preview(self.settings(), &self.draft, self.items(), &totals))
    }

    /// Lay out the printable document stamped with `generated_at`.
    pub fn generate_document_at(&self, generated_at: NaiveDateTime) -> SessionResult<InvoiceDocument> {
        let totals = self.totals()?;
        let document = self.renderer.render(&DocumentInput {
            settings: self.settings(),
            draft: &self.draft,
            items: self.items(),
            totals: &totals,
            generated_at,
        })?;
        Ok(document)
    }

    pub fn generate_document(&self) -> SessionResult<InvoiceDocument> {
        self.generate_document_at(Local::now().naive_local())
    }

    /// Use `fonts` for PDF output instead of loading the configured ones.
    pub fn set_fonts(&mut self, fonts: PdfFonts) {
        self.fonts = Some(fonts);
    }

    /// Lay out with the embedded font's metrics and write the PDF.
    ///
    /// Fonts are loaded on first use and kept for the session.
    pub fn generate_pdf_at(&mut self, generated_at: NaiveDateTime) -> SessionResult<RenderedPdf> {
        let fonts = self.pdf_fonts()?;
        let totals = self.totals()?;
        let renderer = self.renderer.clone().with_measure(Arc::new(fonts.clone()));
        let document = renderer.render(&DocumentInput {
            settings: self.settings(),
            draft: &self.draft,
            items: self.items(),
            totals: &totals,
            generated_at,
        })?;
        let bytes = render_pdf(&document, &fonts)?;

        Ok(RenderedPdf {
            pages: document.page_count(),
            file_name: document.file_name,
            bytes,
        })
    }

    pub fn generate_pdf(&mut self) -> SessionResult<RenderedPdf> {
        self.generate_pdf_at(Local::now().naive_local())
    }

    /// Generate the PDF and save it in `dir` under its document file name.
    pub fn save_pdf(&mut self, dir: &Path) -> SessionResult<PathBuf> {
        let pdf = self.generate_pdf()?;
        let path = dir.join(&pdf.file_name);
        std::fs::write(&path, &pdf.bytes).map_err(|source| SessionError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), pages = pdf.pages, "invoice saved");
        Ok(path)
    }

    fn pdf_fonts(&mut self) -> SessionResult<PdfFonts> {
        if let Some(fonts) = &self.fonts {
            return Ok(fonts.clone());
        }
        let (regular, bold) = &self.font_files;
        let fonts = PdfFonts::load(regular.as_deref(), bold.as_deref())?;
        self.fonts = Some(fonts.clone());
        Ok(fonts)
    }
}
