//! PDF output through krilla.
//!
//! [`KrillaBackend`] buffers the elements of the open page and writes the
//! whole page into the krilla document when the page ends. Layout works in
//! millimetres with text sizes in points; krilla works in points, top-left
//! origin, baseline-anchored text, which is the same frame scaled.

use std::path::PathBuf;

use krilla::Document;
use krilla::color::luma;
use krilla::geom::{PathBuilder, Point};
use krilla::num::NormalizedF32;
use krilla::page::PageSettings;
use krilla::paint::{Fill, Stroke};
use krilla::surface::Surface;
use krilla::text::{Font, TextDirection};
use thiserror::Error;

use crate::document::InvoiceDocument;
use crate::fonts::{FontFace, PdfFonts};
use crate::layout::{Align, DrawingBackend, Element, FontWeight, Gray, TextRun};
use crate::metrics::TextMeasure;

const MM_TO_PT: f32 = 72.0 / 25.4;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to read font file {path}")]
    FontIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a usable font: {0}")]
    InvalidFont(String),

    #[error("no sans-serif system font found; configure a font file")]
    NoSystemFont,

    #[error("text cannot be drawn without fonts")]
    MissingFont,

    #[error("drawing call outside of an open page")]
    NoOpenPage,

    #[error("page {0} was never finished")]
    UnfinishedPage(usize),

    #[error("pdf serialization failed: {0}")]
    Serialize(String),
}

/// Faces as krilla embeds them, alongside the measured source faces.
struct EmbeddedFonts {
    regular: Font,
    bold: Font,
    faces: PdfFonts,
}

impl EmbeddedFonts {
    fn new(faces: &PdfFonts) -> Result<Self, PdfError> {
        Ok(Self {
            regular: embed(&faces.regular)?,
            bold: embed(&faces.bold)?,
            faces: faces.clone(),
        })
    }

    fn font(&self, weight: FontWeight) -> &Font {
        match weight {
            FontWeight::Normal => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}

fn embed(face: &FontFace) -> Result<Font, PdfError> {
    Font::new(face.data().to_vec().into(), face.index())
        .ok_or_else(|| PdfError::InvalidFont("font rejected by the pdf writer".to_string()))
}

struct OpenPage {
    number: usize,
    width_mm: f32,
    height_mm: f32,
    elements: Vec<Element>,
}

/// [`DrawingBackend`] producing PDF bytes.
///
/// Without fonts only lines and rectangles can be drawn; the first text run
/// fails with [`PdfError::MissingFont`].
pub struct KrillaBackend {
    document: Document,
    fonts: Option<EmbeddedFonts>,
    open: Option<OpenPage>,
    finished_pages: usize,
}

impl Default for KrillaBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl KrillaBackend {
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            fonts: None,
            open: None,
            finished_pages: 0,
        }
    }

    pub fn with_fonts(mut self, fonts: &PdfFonts) -> Result<Self, PdfError> {
        self.fonts = Some(EmbeddedFonts::new(fonts)?);
        Ok(self)
    }

    pub fn page_count(&self) -> usize {
        self.finished_pages
    }

    /// Serialize the document.
    pub fn finish(self) -> Result<Vec<u8>, PdfError> {
        if let Some(open) = self.open {
            return Err(PdfError::UnfinishedPage(open.number));
        }
        self.document
            .finish()
            .map_err(|err| PdfError::Serialize(format!("{err:?}")))
    }
}

impl DrawingBackend for KrillaBackend {
    type Error = PdfError;

    fn begin_page(&mut self, width_mm: f32, height_mm: f32) -> Result<(), PdfError> {
        if let Some(open) = &self.open {
            return Err(PdfError::UnfinishedPage(open.number));
        }
        self.open = Some(OpenPage {
            number: self.finished_pages + 1,
            width_mm,
            height_mm,
            elements: Vec::new(),
        });
        Ok(())
    }

    fn draw(&mut self, element: &Element) -> Result<(), PdfError> {
        if let Element::Text(run) = element {
            if self.fonts.is_none() && !run.text.trim().is_empty() {
                return Err(PdfError::MissingFont);
            }
        }
        let open = self.open.as_mut().ok_or(PdfError::NoOpenPage)?;
        open.elements.push(element.clone());
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), PdfError> {
        let open = self.open.take().ok_or(PdfError::NoOpenPage)?;

        let settings = PageSettings::new(open.width_mm * MM_TO_PT, open.height_mm * MM_TO_PT);
        let mut page = self.document.start_page_with(settings);
        let mut surface = page.surface();
        for element in &open.elements {
            draw_element(&mut surface, self.fonts.as_ref(), element);
        }
        surface.finish();
        page.finish();

        self.finished_pages += 1;
        tracing::debug!(page = open.number, elements = open.elements.len(), "pdf page written");
        Ok(())
    }
}

fn gray_fill(gray: Gray) -> Fill {
    Fill {
        paint: luma::Color::new(gray).into(),
        opacity: NormalizedF32::ONE,
        rule: Default::default(),
    }
}

fn black_stroke(width_mm: f32) -> Stroke {
    Stroke {
        paint: luma::Color::new(0).into(),
        width: width_mm * MM_TO_PT,
        ..Stroke::default()
    }
}

fn draw_element(surface: &mut Surface<'_>, fonts: Option<&EmbeddedFonts>, element: &Element) {
    match element {
        Element::Text(run) => {
            if let Some(fonts) = fonts {
                draw_text(surface, fonts, run);
            }
        }
        Element::Line { x1, y1, x2, y2, width } => {
            let mut builder = PathBuilder::new();
            builder.move_to(x1 * MM_TO_PT, y1 * MM_TO_PT);
            builder.line_to(x2 * MM_TO_PT, y2 * MM_TO_PT);
            if let Some(path) = builder.finish() {
                surface.set_fill(None);
                surface.set_stroke(Some(black_stroke(*width)));
                surface.draw_path(&path);
            }
        }
        Element::Rect {
            x,
            y,
            w,
            h,
            line_width,
            fill,
        } => {
            let (left, top) = (x * MM_TO_PT, y * MM_TO_PT);
            let (right, bottom) = ((x + w) * MM_TO_PT, (y + h) * MM_TO_PT);
            let mut builder = PathBuilder::new();
            builder.move_to(left, top);
            builder.line_to(right, top);
            builder.line_to(right, bottom);
            builder.line_to(left, bottom);
            builder.close();
            if let Some(path) = builder.finish() {
                surface.set_fill(fill.map(gray_fill));
                surface.set_stroke(Some(black_stroke(*line_width)));
                surface.draw_path(&path);
            }
        }
    }
}

fn draw_text(surface: &mut Surface<'_>, fonts: &EmbeddedFonts, run: &TextRun) {
    if run.text.trim().is_empty() {
        return;
    }
    let mut x = run.x * MM_TO_PT;
    if run.align == Align::Center {
        x -= fonts.faces.face(run.weight).width_em(&run.text) * run.size / 2.0;
    }

    surface.set_stroke(None);
    surface.set_fill(Some(gray_fill(run.gray)));
    surface.draw_text(
        Point::from_xy(x, run.y * MM_TO_PT),
        fonts.font(run.weight).clone(),
        run.size,
        &run.text,
        false,
        TextDirection::Auto,
    );
}

/// Lay the document into a fresh PDF.
pub fn render_pdf(document: &InvoiceDocument, fonts: &PdfFonts) -> Result<Vec<u8>, PdfError> {
    let mut backend = KrillaBackend::new().with_fonts(fonts)?;
    document.draw_into(&mut backend)?;
    let bytes = backend.finish()?;
    tracing::info!(
        file_name = %document.file_name,
        pages = document.page_count(),
        bytes = bytes.len(),
        "invoice pdf written"
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(backend: &mut KrillaBackend) {
        backend.begin_page(210.0, 297.0).unwrap();
        backend
            .draw(&Element::Rect {
                x: 5.0,
                y: 5.0,
                w: 200.0,
                h: 287.0,
                line_width: 1.5,
                fill: None,
            })
            .unwrap();
        backend
            .draw(&Element::Rect {
                x: 15.0,
                y: 90.0,
                w: 180.0,
                h: 8.0,
                line_width: 0.5,
                fill: Some(240),
            })
            .unwrap();
        backend
            .draw(&Element::Line {
                x1: 15.0,
                y1: 51.0,
                x2: 195.0,
                y2: 51.0,
                width: 0.5,
            })
            .unwrap();
        backend.end_page().unwrap();
    }

    #[test]
    fn shapes_only_pages_serialize_to_pdf() {
        let mut backend = KrillaBackend::new();
        frame(&mut backend);
        frame(&mut backend);
        assert_eq!(backend.page_count(), 2);

        let bytes = backend.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn text_without_fonts_is_rejected() {
        let mut backend = KrillaBackend::new();
        backend.begin_page(210.0, 297.0).unwrap();
        let err = backend
            .draw(&Element::Text(TextRun::new("INVOICE", 160.0, 25.0, 18.0)))
            .unwrap_err();
        assert!(matches!(err, PdfError::MissingFont));
    }

    #[test]
    fn drawing_requires_an_open_page() {
        let mut backend = KrillaBackend::new();
        let line = Element::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
            width: 0.5,
        };
        assert!(matches!(backend.draw(&line), Err(PdfError::NoOpenPage)));
        assert!(matches!(backend.end_page(), Err(PdfError::NoOpenPage)));

        backend.begin_page(210.0, 297.0).unwrap();
        assert!(matches!(
            backend.begin_page(210.0, 297.0),
            Err(PdfError::UnfinishedPage(1))
        ));
        assert!(matches!(backend.finish(), Err(PdfError::UnfinishedPage(1))));
    }
}
