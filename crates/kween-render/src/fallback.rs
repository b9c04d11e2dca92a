//! Text fallback glyphs
//!
//! Characters without a usable glyph image are drawn from an ordinary font.
//! The font is scaled so that ascender to descender spans the glyph height,
//! matching a line height of 1. Without a font, fallbacks are measured at an
//! estimated advance and drawn as outlined boxes.

use std::path::Path;
use std::sync::Arc;

use ttf_parser::{Face, OutlineBuilder};

use crate::{Canvas, Color, RenderError, Result};

/// Advance used when no font is available, relative to the glyph height
const ESTIMATED_ADVANCE: f32 = 0.6;

#[derive(Clone)]
struct FaceData {
    data: Arc<Vec<u8>>,
    index: u32,
}

impl FaceData {
    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.data, self.index).ok()
    }
}

/// Font used for fallback glyphs
#[derive(Clone, Default)]
pub struct FallbackFont {
    face: Option<FaceData>,
}

impl std::fmt::Debug for FallbackFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackFont")
            .field("loaded", &self.face.is_some())
            .finish()
    }
}

impl FallbackFont {
    /// No font: estimated advances, boxes instead of letters
    pub fn none() -> Self {
        Self { face: None }
    }

    /// Use a font from raw TrueType/OpenType data
    pub fn from_data(data: Vec<u8>, index: u32) -> Result<Self> {
        Face::parse(&data, index).map_err(|e| RenderError::Font(e.to_string()))?;
        Ok(Self {
            face: Some(FaceData { data: Arc::new(data), index }),
        })
    }

    /// Load a font file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_data(data, 0)
    }

    /// Find a sans-serif system font
    pub fn system() -> Option<Self> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let query = fontdb::Query {
            families: &[fontdb::Family::SansSerif],
            ..fontdb::Query::default()
        };
        let id = db.query(&query)?;
        let (data, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;

        match Self::from_data(data, index) {
            Ok(font) => {
                tracing::debug!(faces = db.len(), "using system fallback font");
                Some(font)
            }
            Err(e) => {
                tracing::warn!(error = %e, "system fallback font unusable");
                None
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.face.is_some()
    }

    /// Horizontal advance of `ch` at the given glyph height
    pub fn advance(&self, ch: char, height: f32) -> f32 {
        self.face
            .as_ref()
            .and_then(FaceData::face)
            .and_then(|face| {
                let glyph = face.glyph_index(ch)?;
                let advance = face.glyph_hor_advance(glyph)? as f32;
                Some(advance * scale_for(&face, height))
            })
            .unwrap_or(height * ESTIMATED_ADVANCE)
    }

    /// Draw `ch` with its top-left corner at `(x, y)`
    pub fn draw(&self, canvas: &mut Canvas, ch: char, x: f32, y: f32, height: f32, color: Color) {
        let Some(face) = self.face.as_ref().and_then(FaceData::face) else {
            draw_box(canvas, x, y, height * ESTIMATED_ADVANCE, height, color);
            return;
        };
        let Some(glyph) = face.glyph_index(ch) else {
            draw_box(canvas, x, y, self.advance(ch, height), height, color);
            return;
        };

        let scale = scale_for(&face, height);
        let baseline = y + face.ascender() as f32 * scale;
        let mut builder = PathBuilder::new(scale, x, baseline);
        if face.outline_glyph(glyph, &mut builder).is_none() {
            // whitespace and other empty glyphs
            return;
        }
        if let Some(path) = builder.finish() {
            canvas.fill_path(&path, color);
        }
    }
}

fn scale_for(face: &Face<'_>, height: f32) -> f32 {
    let span = (face.ascender() as f32 - face.descender() as f32).max(1.0);
    height / span
}

fn draw_box(canvas: &mut Canvas, x: f32, y: f32, width: f32, height: f32, color: Color) {
    let inset = (height * 0.1).max(1.0);
    canvas.stroke_rect(
        x + inset,
        y + inset,
        (width - 2.0 * inset).max(1.0),
        (height - 2.0 * inset).max(1.0),
        (height * 0.05).max(1.0),
        color,
    );
}

/// Path builder that converts ttf-parser outlines to tiny-skia paths
struct PathBuilder {
    builder: tiny_skia::PathBuilder,
    scale: f32,
    origin_x: f32,
    baseline: f32,
}

impl PathBuilder {
    fn new(scale: f32, origin_x: f32, baseline: f32) -> Self {
        Self {
            builder: tiny_skia::PathBuilder::new(),
            scale,
            origin_x,
            baseline,
        }
    }

    fn transform_x(&self, x: f32) -> f32 {
        self.origin_x + x * self.scale
    }

    fn transform_y(&self, y: f32) -> f32 {
        self.baseline - y * self.scale // Flip Y axis
    }

    fn finish(self) -> Option<tiny_skia::Path> {
        self.builder.finish()
    }
}

impl OutlineBuilder for PathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(self.transform_x(x), self.transform_y(y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.transform_x(x), self.transform_y(y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(
            self.transform_x(x1), self.transform_y(y1),
            self.transform_x(x), self.transform_y(y),
        );
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            self.transform_x(x1), self.transform_y(y1),
            self.transform_x(x2), self.transform_y(y2),
            self.transform_x(x), self.transform_y(y),
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
