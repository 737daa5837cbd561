//! Fixed-layout invoice document.
//!
//! Every page repeats the shop header, the bill-to block and a table frame of
//! `rows_per_page` rows; items flow across as many pages as they need. The
//! closing block (totals box and signature) and the footer go on the last
//! page. When the closing block does not fit under the last table it gets a
//! page of its own, so nothing is ever drawn past the footer.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use invoicepad_invoicing::{BusinessSettings, InvoiceDraft, LineItem, Totals};

use crate::error::RenderError;
use crate::format::{
    DOCUMENT_CURRENCY, document_file_name, format_amount, format_bill_date, format_generated_at,
    format_percent, format_quantity,
};
use crate::layout::{Canvas, DrawingBackend, Element, TextRun};
use crate::metrics::{AverageAdvance, TextMeasure, collapse_whitespace, truncate_to_width, wrap_text_limited};

pub const DEFAULT_ROWS_PER_PAGE: usize = 14;

pub const COLUMN_HEADERS: [&str; 5] = ["S.No.", "Item Description", "Qty", "Rate", "Amount"];

/// Column widths in mm; they add up to the A4 content width.
pub const COLUMN_WIDTHS: [f32; 5] = [20.0, 60.0, 20.0, 40.0, 40.0];

pub const MAX_SHOP_ADDRESS_LINES: usize = 3;
pub const MAX_CUSTOMER_ADDRESS_LINES: usize = 3;

const DESCRIPTION_COLUMN: usize = 1;
const CELL_PADDING: f32 = 2.0;
const CELL_FONT: f32 = 8.0;
const ROW_HEIGHT: f32 = 8.0;
const BORDER_INSET: f32 = 5.0;
const HEADER_TOP: f32 = 25.0;
const LINE_STEP: f32 = 4.0;
const SHOP_NAME_WIDTH: f32 = 120.0;
const SHOP_ADDRESS_WIDTH: f32 = 120.0;
const BILL_INFO_WIDTH: f32 = 60.0;
const CUSTOMER_ADDRESS_WIDTH: f32 = 100.0;
const TABLE_GAP: f32 = 15.0;
const TOTALS_GAP: f32 = 5.0;
const TOTALS_BOX_WIDTH: f32 = 100.0;
const TOTALS_BOX_HEIGHT: f32 = 30.0;
const SIGNATURE_OFFSET: f32 = 40.0;
const SIGNATURE_NAME_OFFSET: f32 = 10.0;
/// Totals box top to the signature name baseline.
const CLOSING_HEIGHT: f32 = SIGNATURE_OFFSET + SIGNATURE_NAME_OFFSET;
/// Footer baseline above the bottom page edge.
const FOOTER_OFFSET: f32 = 25.0;
/// Space kept free between body content and the footer baseline.
const FOOTER_CLEARANCE: f32 = 7.0;
const PAGE_LABEL_OFFSET: f32 = 8.0;
const TABLE_HEADER_FILL: u8 = 240;
const SUBDUED_TEXT: u8 = 60;
const FOOTER_TEXT: u8 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub rows_per_page: usize,
}

impl Default for LayoutConfig {
    /// A4 portrait, 15 mm margins, 14 table rows.
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 15.0,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

impl LayoutConfig {
    pub fn with_rows_per_page(mut self, rows_per_page: usize) -> Self {
        self.rows_per_page = rows_per_page;
        self
    }

    fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    fn footer_y(&self) -> f32 {
        self.page_height - FOOTER_OFFSET
    }

    /// Lowest baseline body content may use.
    fn content_bottom(&self) -> f32 {
        self.footer_y() - FOOTER_CLEARANCE
    }

    /// Table rows that fit below `table_top` while leaving `reserve` mm free
    /// above the footer.
    fn rows_fitting(&self, table_top: f32, reserve: f32) -> usize {
        let room = self.content_bottom() - reserve - table_top - ROW_HEIGHT;
        if room < 0.0 { 0 } else { (room / ROW_HEIGHT).floor() as usize }
    }

    /// Largest `rows_per_page` that fits with the tallest header and bill-to
    /// block the layout can produce.
    pub fn max_rows_per_page(&self) -> usize {
        self.rows_fitting(table_top(MAX_SHOP_ADDRESS_LINES, MAX_CUSTOMER_ADDRESS_LINES), 0.0)
    }

    fn validate(&self) -> Result<(), RenderError> {
        if self.rows_per_page == 0 {
            return Err(RenderError::InvalidConfig(
                "rows_per_page must be at least 1".to_string(),
            ));
        }
        if self.content_width() <= 0.0 || self.page_height <= 0.0 {
            return Err(RenderError::InvalidConfig(format!(
                "page {}x{} mm leaves no room inside {} mm margins",
                self.page_width, self.page_height, self.margin
            )));
        }
        let max_rows = self.max_rows_per_page();
        if self.rows_per_page > max_rows {
            return Err(RenderError::InvalidConfig(format!(
                "rows_per_page {} does not fit a {} mm page (at most {max_rows})",
                self.rows_per_page, self.page_height
            )));
        }
        let tallest_top = table_top(MAX_SHOP_ADDRESS_LINES, MAX_CUSTOMER_ADDRESS_LINES);
        if tallest_top + CLOSING_HEIGHT > self.content_bottom() {
            return Err(RenderError::InvalidConfig(format!(
                "a {} mm page has no room for the totals block",
                self.page_height
            )));
        }
        Ok(())
    }
}

/// Baseline of the line under the shop header.
fn header_bottom(shop_address_lines: usize) -> f32 {
    // name, address lines, contact, tax id, rule
    HEADER_TOP + 8.0 + LINE_STEP * shop_address_lines as f32 + LINE_STEP + 10.0
}

/// Baseline below the last bill-to line.
fn bill_to_bottom(header_bottom: f32, customer_address_lines: usize) -> f32 {
    let name_y = header_bottom + 10.0 + 6.0;
    if customer_address_lines == 0 {
        name_y
    } else {
        name_y + LINE_STEP * (customer_address_lines as f32 + 1.0)
    }
}

fn table_top(shop_address_lines: usize, customer_address_lines: usize) -> f32 {
    bill_to_bottom(header_bottom(shop_address_lines), customer_address_lines) + TABLE_GAP
}

/// Everything a document is laid out from.
#[derive(Debug, Clone, Copy)]
pub struct DocumentInput<'a> {
    pub settings: &'a BusinessSettings,
    pub draft: &'a InvoiceDraft,
    pub items: &'a [LineItem],
    pub totals: &'a Totals,
    pub generated_at: NaiveDateTime,
}

/// One table row as printed. Blank padding rows have no serial and empty cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub serial: Option<usize>,
    pub cells: [String; 5],
}

impl TableRow {
    fn blank() -> Self {
        Self {
            serial: None,
            cells: Default::default(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.serial.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPage {
    /// 1-based.
    pub number: usize,
    /// Empty on a page that only carries the closing block.
    pub rows: Vec<TableRow>,
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDocument {
    pub file_name: String,
    pub page_width: f32,
    pub page_height: f32,
    pub pages: Vec<DocumentPage>,
}

impl InvoiceDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Replay every page into `backend`.
    pub fn draw_into<B: DrawingBackend>(&self, backend: &mut B) -> Result<(), B::Error> {
        for page in &self.pages {
            backend.begin_page(self.page_width, self.page_height)?;
            for element in &page.elements {
                backend.draw(element)?;
            }
            backend.end_page()?;
        }
        Ok(())
    }
}

/// Header and bill-to text shared by every page of one document.
struct PageFrame {
    shop_address: Vec<String>,
    customer_address: Vec<String>,
    table_top: f32,
}

/// What one page carries besides the repeated frame.
struct PagePlan {
    rows: Vec<TableRow>,
    closing: bool,
}

#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    config: LayoutConfig,
    measure: Arc<dyn TextMeasure>,
}

impl Default for DocumentRenderer {
    fn default() -> Self {
        Self {
            config: LayoutConfig::default(),
            measure: Arc::new(AverageAdvance),
        }
    }
}

impl DocumentRenderer {
    pub fn new(config: LayoutConfig) -> Result<Self, RenderError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Measure text with `measure` instead of the average glyph width.
    pub fn with_measure(mut self, measure: Arc<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out the invoice.
    ///
    /// Requires a bill number, a customer name and at least one item.
    pub fn render(&self, input: &DocumentInput<'_>) -> Result<InvoiceDocument, RenderError> {
        let draft = input.draft;
        if draft.bill_number.trim().is_empty() {
            return Err(RenderError::MissingBillNumber);
        }
        if draft.customer_name.trim().is_empty() {
            return Err(RenderError::MissingCustomerName);
        }
        if input.items.is_empty() {
            return Err(RenderError::NoItems);
        }

        let frame = self.frame(input);
        let plans = self.plan_pages(input.items, frame.table_top);
        let page_total = plans.len();

        let pages = plans
            .into_iter()
            .enumerate()
            .map(|(index, plan)| {
                let elements = self.page_elements(input, &frame, &plan, index + 1, page_total);
                DocumentPage {
                    number: index + 1,
                    rows: plan.rows,
                    elements,
                }
            })
            .collect();

        let document = InvoiceDocument {
            file_name: document_file_name(&draft.bill_number, input.generated_at),
            page_width: self.config.page_width,
            page_height: self.config.page_height,
            pages,
        };

        tracing::info!(
            file_name = %document.file_name,
            pages = page_total,
            items = input.items.len(),
            "invoice laid out"
        );
        Ok(document)
    }

    fn frame(&self, input: &DocumentInput<'_>) -> PageFrame {
        let measure = self.measure.as_ref();
        let shop_address = wrap_text_limited(
            measure,
            &input.settings.shop_address,
            SHOP_ADDRESS_WIDTH,
            9.0,
            MAX_SHOP_ADDRESS_LINES,
        );
        let customer_address = wrap_text_limited(
            measure,
            &input.draft.customer_address,
            CUSTOMER_ADDRESS_WIDTH,
            10.0,
            MAX_CUSTOMER_ADDRESS_LINES,
        );
        let table_top = table_top(shop_address.len(), customer_address.len());
        PageFrame {
            shop_address,
            customer_address,
            table_top,
        }
    }

    /// Split items into table pages.
    ///
    /// The last table page is padded only as far as the closing block still
    /// fits under it; if its items alone leave no room, the closing block
    /// moves to an extra page.
    fn plan_pages(&self, items: &[LineItem], table_top: f32) -> Vec<PagePlan> {
        let per_page = self.config.rows_per_page;
        let with_closing = per_page.min(self.config.rows_fitting(table_top, TOTALS_GAP + CLOSING_HEIGHT));

        let chunks: Vec<&[LineItem]> = items.chunks(per_page).collect();
        let last = chunks.len() - 1;
        let mut plans = Vec::with_capacity(chunks.len() + 1);
        let mut closing_placed = false;

        for (index, chunk) in chunks.into_iter().enumerate() {
            let is_last = index == last;
            let closing = is_last && chunk.len() <= with_closing;
            let pad_to = if closing { with_closing } else { per_page };
            plans.push(PagePlan {
                rows: self.table_rows(chunk, index * per_page, pad_to),
                closing,
            });
            closing_placed |= closing;
        }

        if !closing_placed {
            tracing::debug!(table_top, "closing block moved to its own page");
            plans.push(PagePlan {
                rows: Vec::new(),
                closing: true,
            });
        }
        plans
    }

    fn table_rows(&self, items: &[LineItem], serial_offset: usize, pad_to: usize) -> Vec<TableRow> {
        let description_width = COLUMN_WIDTHS[DESCRIPTION_COLUMN] - 2.0 * CELL_PADDING;
        let measure = self.measure.as_ref();

        let mut rows: Vec<TableRow> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let serial = serial_offset + i + 1;
                TableRow {
                    serial: Some(serial),
                    cells: [
                        serial.to_string(),
                        truncate_to_width(measure, item.name(), description_width, CELL_FONT),
                        format_quantity(item.quantity()),
                        format_amount(item.unit_price(), DOCUMENT_CURRENCY),
                        format_amount(item.line_total(), DOCUMENT_CURRENCY),
                    ],
                }
            })
            .collect();

        if rows.len() < pad_to {
            rows.resize_with(pad_to, TableRow::blank);
        }
        rows
    }

    fn page_elements(
        &self,
        input: &DocumentInput<'_>,
        frame: &PageFrame,
        plan: &PagePlan,
        page_number: usize,
        page_total: usize,
    ) -> Vec<Element> {
        let cfg = &self.config;
        let mut canvas = Canvas::default();

        canvas.rect(
            BORDER_INSET,
            BORDER_INSET,
            cfg.page_width - 2.0 * BORDER_INSET,
            cfg.page_height - 2.0 * BORDER_INSET,
            1.5,
            None,
        );

        self.draw_header(&mut canvas, input, &frame.shop_address);
        self.draw_bill_to(&mut canvas, input, frame);

        let mut y = frame.table_top;
        if !plan.rows.is_empty() {
            y = self.draw_table(&mut canvas, &plan.rows, y) + TOTALS_GAP;
        }
        if plan.closing {
            self.draw_closing(&mut canvas, input, y);
        }

        let footer_y = cfg.footer_y();
        if page_number == page_total {
            canvas.text(
                TextRun::new("Thank you for your business!", cfg.margin, footer_y, 8.0).gray(FOOTER_TEXT),
            );
            canvas.text(
                TextRun::new(
                    format!("Generated on: {}", format_generated_at(input.generated_at)),
                    cfg.page_width - cfg.margin - 80.0,
                    footer_y,
                    8.0,
                )
                .gray(FOOTER_TEXT),
            );
        }
        if page_total > 1 {
            canvas.text(
                TextRun::new(
                    format!("Page {page_number} of {page_total}"),
                    cfg.page_width / 2.0,
                    footer_y + PAGE_LABEL_OFFSET,
                    8.0,
                )
                .centered()
                .gray(FOOTER_TEXT),
            );
        }

        canvas.into_elements()
    }

    /// Shop identity on the left, invoice title and bill info on the right.
    fn draw_header(&self, canvas: &mut Canvas, input: &DocumentInput<'_>, shop_address: &[String]) {
        let cfg = &self.config;
        let measure = self.measure.as_ref();
        let settings = input.settings;
        let line = |text: &str, width: f32, size: f32| truncate_to_width(measure, text, width, size);
        let mut y = HEADER_TOP;

        canvas.text(TextRun::new(line(&settings.shop_name, SHOP_NAME_WIDTH, 20.0), cfg.margin, y, 20.0).bold());

        y += 8.0;
        for address_line in shop_address {
            canvas.text(TextRun::new(address_line.as_str(), cfg.margin, y, 9.0).gray(SUBDUED_TEXT));
            y += LINE_STEP;
        }
        canvas.text(
            TextRun::new(line(&settings.shop_contact, SHOP_ADDRESS_WIDTH, 9.0), cfg.margin, y, 9.0)
                .gray(SUBDUED_TEXT),
        );
        y += LINE_STEP;
        canvas.text(
            TextRun::new(
                line(
                    &format!("GST No: {}", settings.tax_registration_id),
                    SHOP_ADDRESS_WIDTH,
                    9.0,
                ),
                cfg.margin,
                y,
                9.0,
            )
            .gray(SUBDUED_TEXT),
        );

        let right = cfg.page_width - cfg.margin;
        canvas.text(TextRun::new("INVOICE", right - 35.0, HEADER_TOP, 18.0).bold());
        canvas.text(TextRun::new(
            line(&format!("Bill No: {}", input.draft.bill_number), BILL_INFO_WIDTH, 9.0),
            right - BILL_INFO_WIDTH,
            35.0,
            9.0,
        ));
        canvas.text(TextRun::new(
            format!("Date: {}", format_bill_date(input.draft.bill_date)),
            right - BILL_INFO_WIDTH,
            42.0,
            9.0,
        ));

        let rule_y = header_bottom(shop_address.len());
        canvas.line(cfg.margin, rule_y, right, rule_y, 0.5);
    }

    fn draw_bill_to(&self, canvas: &mut Canvas, input: &DocumentInput<'_>, frame: &PageFrame) {
        let margin = self.config.margin;
        let name = truncate_to_width(
            self.measure.as_ref(),
            &input.draft.customer_name,
            self.config.content_width(),
            10.0,
        );
        let mut y = header_bottom(frame.shop_address.len()) + 10.0;

        canvas.text(TextRun::new("Bill To:", margin, y, 10.0).bold());
        y += 6.0;
        canvas.text(TextRun::new(name, margin, y, 10.0));

        if !frame.customer_address.is_empty() {
            y += LINE_STEP;
            for line in &frame.customer_address {
                canvas.text(TextRun::new(line.as_str(), margin, y, 10.0));
                y += LINE_STEP;
            }
        }
    }

    /// Header row plus every row in `rows`; returns the y below the table.
    fn draw_table(&self, canvas: &mut Canvas, rows: &[TableRow], top: f32) -> f32 {
        let margin = self.config.margin;
        let width = self.config.content_width();
        let mut y = top;

        canvas.rect(margin, y, width, ROW_HEIGHT, 0.5, Some(TABLE_HEADER_FILL));
        let mut x = margin;
        for (index, header) in COLUMN_HEADERS.iter().enumerate() {
            let column = COLUMN_WIDTHS[index];
            canvas.text(TextRun::new(*header, x + column / 2.0, y + 5.0, 9.0).bold().centered());
            x += column;
        }
        self.column_rules(canvas, y);
        y += ROW_HEIGHT;

        for row in rows {
            canvas.rect(margin, y, width, ROW_HEIGHT, 0.5, None);
            if !row.is_blank() {
                let mut x = margin;
                for (index, cell) in row.cells.iter().enumerate() {
                    let column = COLUMN_WIDTHS[index];
                    let run = if index == DESCRIPTION_COLUMN {
                        TextRun::new(cell.as_str(), x + CELL_PADDING, y + 5.0, CELL_FONT)
                    } else {
                        TextRun::new(cell.as_str(), x + column / 2.0, y + 5.0, CELL_FONT).centered()
                    };
                    canvas.text(run);
                    x += column;
                }
            }
            self.column_rules(canvas, y);
            y += ROW_HEIGHT;
        }
        y
    }

    fn column_rules(&self, canvas: &mut Canvas, y: f32) {
        let mut x = self.config.margin;
        for column in &COLUMN_WIDTHS[..COLUMN_WIDTHS.len() - 1] {
            x += column;
            canvas.line(x, y, x, y + ROW_HEIGHT, 0.5);
        }
    }

    /// Totals box on the right with its top at `y`, signature on the left.
    fn draw_closing(&self, canvas: &mut Canvas, input: &DocumentInput<'_>, y: f32) {
        let cfg = &self.config;
        let totals = input.totals;
        let x = cfg.page_width - cfg.margin - TOTALS_BOX_WIDTH;
        let value_x = x + TOTALS_BOX_WIDTH / 2.0 + 15.0;

        canvas.rect(x, y, TOTALS_BOX_WIDTH, TOTALS_BOX_HEIGHT, 0.8, None);

        canvas.text(TextRun::new("Subtotal:", x + 3.0, y + 7.0, 9.0));
        canvas.text(TextRun::new(
            format_amount(totals.subtotal, DOCUMENT_CURRENCY),
            value_x,
            y + 7.0,
            9.0,
        ));

        canvas.text(TextRun::new(
            format!("GST ({}%):", format_percent(input.draft.tax_rate_percent())),
            x + 3.0,
            y + 14.0,
            9.0,
        ));
        canvas.text(TextRun::new(
            format_amount(totals.tax_amount, DOCUMENT_CURRENCY),
            value_x,
            y + 14.0,
            9.0,
        ));

        canvas.line(x + 3.0, y + 18.0, x + TOTALS_BOX_WIDTH - 3.0, y + 18.0, 0.8);

        canvas.text(TextRun::new("Grand Total:", x + 3.0, y + 25.0, 10.0).bold());
        canvas.text(
            TextRun::new(
                format_amount(totals.grand_total, DOCUMENT_CURRENCY),
                value_x,
                y + 25.0,
                10.0,
            )
            .bold(),
        );

        let signature_y = y + SIGNATURE_OFFSET;
        canvas.text(TextRun::new("Signature:", cfg.margin, signature_y, 9.0));
        canvas.line(
            cfg.margin + 25.0,
            signature_y - 2.0,
            cfg.margin + 62.0,
            signature_y - 2.0,
            0.5,
        );
        canvas.text(
            TextRun::new(
                collapse_whitespace(&input.settings.shop_name),
                cfg.margin + 25.0,
                signature_y + SIGNATURE_NAME_OFFSET,
                9.0,
            )
            .bold(),
        );
    }
}
