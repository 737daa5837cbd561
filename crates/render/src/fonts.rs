//! Fonts embedded into the PDF output.
//!
//! Faces come from explicit files or from the installed system fonts. Either
//! way the bytes are parsed once up front, so a face that loads is a face the
//! measurement and the PDF writer can both use.

use std::path::Path;
use std::sync::Arc;

use skrifa::instance::{LocationRef, Size};
use skrifa::{FontRef, MetadataProvider};

use crate::layout::FontWeight;
use crate::metrics::{AVERAGE_ADVANCE_EM, TextMeasure};
use crate::pdf::PdfError;

/// Sans families tried, in order, when no font file is configured.
const SYSTEM_FAMILIES: [&str; 6] = [
    "Helvetica",
    "Arial",
    "Liberation Sans",
    "DejaVu Sans",
    "Noto Sans",
    "FreeSans",
];

/// One font face: raw bytes plus the index inside a collection.
#[derive(Clone)]
pub struct FontFace {
    data: Arc<Vec<u8>>,
    index: u32,
    units_per_em: f32,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("bytes", &self.data.len())
            .field("index", &self.index)
            .finish()
    }
}

impl FontFace {
    pub fn from_bytes(data: Vec<u8>, index: u32, origin: &str) -> Result<Self, PdfError> {
        let units_per_em = {
            let font = FontRef::from_index(&data, index).map_err(|_| PdfError::InvalidFont(origin.to_string()))?;
            font.metrics(Size::unscaled(), LocationRef::default()).units_per_em
        };
        if units_per_em == 0 {
            return Err(PdfError::InvalidFont(origin.to_string()));
        }
        Ok(Self {
            data: Arc::new(data),
            index,
            units_per_em: f32::from(units_per_em),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, PdfError> {
        let data = std::fs::read(path).map_err(|source| PdfError::FontIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(data, 0, &path.display().to_string())
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

impl TextMeasure for FontFace {
    /// Sum of horizontal advances from the font's `hmtx`. Characters the font
    /// has no glyph for count as an average glyph.
    fn width_em(&self, text: &str) -> f32 {
        let Ok(font) = FontRef::from_index(&self.data, self.index) else {
            return text.chars().count() as f32 * AVERAGE_ADVANCE_EM;
        };
        let charmap = font.charmap();
        let advances = font.glyph_metrics(Size::unscaled(), LocationRef::default());
        let fallback = self.units_per_em * AVERAGE_ADVANCE_EM;

        let units: f32 = text
            .chars()
            .map(|ch| {
                charmap
                    .map(ch)
                    .and_then(|glyph| advances.advance_width(glyph))
                    .unwrap_or(fallback)
            })
            .sum();
        units / self.units_per_em
    }
}

/// Regular and bold faces used for every text run.
///
/// Layout measures with the regular face, which is what table cells and
/// wrapped addresses are set in.
#[derive(Debug, Clone)]
pub struct PdfFonts {
    pub regular: FontFace,
    pub bold: FontFace,
}

impl PdfFonts {
    pub fn new(regular: FontFace, bold: FontFace) -> Self {
        Self { regular, bold }
    }

    /// Configured files first, installed system fonts for anything not given.
    ///
    /// A missing bold face falls back to the regular one.
    pub fn load(regular: Option<&Path>, bold: Option<&Path>) -> Result<Self, PdfError> {
        let mut system = None;
        let mut system_face = |weight: FontWeight| -> Option<FontFace> {
            let db = system.get_or_insert_with(|| {
                let mut db = fontdb::Database::new();
                db.load_system_fonts();
                tracing::debug!(faces = db.len(), "system fonts loaded");
                db
            });
            query_system(db, weight)
        };

        let regular = match regular {
            Some(path) => FontFace::from_file(path)?,
            None => system_face(FontWeight::Normal).ok_or(PdfError::NoSystemFont)?,
        };
        let bold = match bold {
            Some(path) => FontFace::from_file(path)?,
            None => system_face(FontWeight::Bold).unwrap_or_else(|| {
                tracing::warn!("no bold system font found, using the regular face");
                regular.clone()
            }),
        };

        Ok(Self { regular, bold })
    }

    pub fn face(&self, weight: FontWeight) -> &FontFace {
        match weight {
            FontWeight::Normal => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}

impl TextMeasure for PdfFonts {
    fn width_em(&self, text: &str) -> f32 {
        self.regular.width_em(text)
    }
}

fn query_system(db: &fontdb::Database, weight: FontWeight) -> Option<FontFace> {
    let families: Vec<fontdb::Family<'_>> = SYSTEM_FAMILIES
        .iter()
        .map(|name| fontdb::Family::Name(*name))
        .chain(std::iter::once(fontdb::Family::SansSerif))
        .collect();
    let query = fontdb::Query {
        families: &families,
        weight: match weight {
            FontWeight::Normal => fontdb::Weight::NORMAL,
            FontWeight::Bold => fontdb::Weight::BOLD,
        },
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    };

    let id = db.query(&query)?;
    let (data, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    match FontFace::from_bytes(data, index, "system font") {
        Ok(face) => Some(face),
        Err(err) => {
            tracing::warn!(error = %err, "skipping unreadable system font");
            None
        }
    }
}
