//! Positioned drawing primitives and the backend seam.
//!
//! Coordinates are millimetres from the top-left corner of the page, which is
//! what the common PDF drawing libraries take for A4 portrait layouts.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

/// 8-bit grey level, 0 is black.
pub type Gray = u8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub weight: FontWeight,
    pub align: Align,
    pub gray: Gray,
}

impl TextRun {
    /// Left-aligned, normal weight, black.
    pub fn new(text: impl Into<String>, x: f32, y: f32, size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            size,
            weight: FontWeight::Normal,
            align: Align::Left,
            gray: 0,
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn gray(mut self, gray: Gray) -> Self {
        self.gray = gray;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Text(TextRun),
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
    },
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        line_width: f32,
        fill: Option<Gray>,
    },
}

/// Something that turns laid-out pages into bytes (PDF, SVG, a test log).
pub trait DrawingBackend {
    type Error;

    fn begin_page(&mut self, width_mm: f32, height_mm: f32) -> Result<(), Self::Error>;

    fn draw(&mut self, element: &Element) -> Result<(), Self::Error>;

    fn end_page(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Collects elements while a page is being built.
#[derive(Debug, Default)]
pub(crate) struct Canvas {
    elements: Vec<Element>,
}

impl Canvas {
    pub(crate) fn text(&mut self, run: TextRun) {
        self.elements.push(Element::Text(run));
    }

    pub(crate) fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32) {
        self.elements.push(Element::Line { x1, y1, x2, y2, width });
    }

    pub(crate) fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, line_width: f32, fill: Option<Gray>) {
        self.elements.push(Element::Rect {
            x,
            y,
            w,
            h,
            line_width,
            fill,
        });
    }

    pub(crate) fn into_elements(self) -> Vec<Element> {
        self.elements
    }
}
