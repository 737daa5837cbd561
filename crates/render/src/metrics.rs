//! Text measurement for layout decisions.
//!
//! Layout asks a [`TextMeasure`] how wide a run is. [`AverageAdvance`] uses a
//! fixed half-em advance per glyph, which is close to Helvetica for mixed text
//! and keeps pagination reproducible without any font file. The PDF output
//! measures with the embedded font instead (see [`crate::fonts::PdfFonts`]).

use std::fmt::Debug;

const POINT_IN_MM: f32 = 25.4 / 72.0;
pub(crate) const AVERAGE_ADVANCE_EM: f32 = 0.5;

/// Width of a single-line run, in em.
pub trait TextMeasure: Debug + Send + Sync {
    fn width_em(&self, text: &str) -> f32;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AverageAdvance;

impl TextMeasure for AverageAdvance {
    fn width_em(&self, text: &str) -> f32 {
        text.chars().count() as f32 * AVERAGE_ADVANCE_EM
    }
}

pub fn text_width_mm(measure: &dyn TextMeasure, text: &str, font_size_pt: f32) -> f32 {
    measure.width_em(text) * font_size_pt * POINT_IN_MM
}

/// Runs of whitespace, line breaks included, become one space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Greedy word wrap to `width_mm`.
///
/// Explicit newlines start a new line; words longer than a line are split.
/// Blank input yields no lines.
pub fn wrap_text(measure: &dyn TextMeasure, text: &str, width_mm: f32, font_size_pt: f32) -> Vec<String> {
    let fits = |candidate: &str| text_width_mm(measure, candidate, font_size_pt) <= width_mm;
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            for chunk in split_to_width(word, &fits) {
                let joined = if current.is_empty() {
                    chunk.clone()
                } else {
                    format!("{current} {chunk}")
                };
                if fits(&joined) || current.is_empty() {
                    current = joined;
                } else {
                    lines.push(std::mem::replace(&mut current, chunk));
                }
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Like [`wrap_text`] but never more than `max_lines`; the last kept line
/// absorbs the rest and is cut with `...`.
pub fn wrap_text_limited(
    measure: &dyn TextMeasure,
    text: &str,
    width_mm: f32,
    font_size_pt: f32,
    max_lines: usize,
) -> Vec<String> {
    let mut lines = wrap_text(measure, text, width_mm, font_size_pt);
    if max_lines == 0 {
        lines.clear();
    } else if lines.len() > max_lines {
        let overflow = lines.split_off(max_lines - 1).join(" ");
        lines.push(truncate_to_width(measure, &overflow, width_mm, font_size_pt));
    }
    lines
}

/// Fit `text` on one line of `width_mm`, ending with `...` when cut.
///
/// Line breaks and whitespace runs are collapsed first, so the result is
/// always a single line.
pub fn truncate_to_width(measure: &dyn TextMeasure, text: &str, width_mm: f32, font_size_pt: f32) -> String {
    let text = collapse_whitespace(text);
    if text_width_mm(measure, &text, font_size_pt) <= width_mm {
        return text;
    }

    let mut kept = String::new();
    for ch in text.chars() {
        kept.push(ch);
        if text_width_mm(measure, &format!("{kept}..."), font_size_pt) > width_mm {
            kept.pop();
            break;
        }
    }
    let mut out = kept.trim_end().to_string();
    out.push_str("...");
    out
}

/// Pieces of `word` that each fit, splitting between characters.
fn split_to_width(word: &str, fits: &impl Fn(&str) -> bool) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        current.push(ch);
        if !fits(&current) && current.chars().count() > 1 {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(ch);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}
