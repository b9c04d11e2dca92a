//! Glyph layout module

mod wrap;

pub use wrap::{WordWrapEngine, WrapStyle};

use crate::catalog::AssetId;
use crate::glyph::{GlyphUnit, Word};

/// Text alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    /// X offset of a line with `free` unused width
    pub fn offset(self, free: f32) -> f32 {
        let free = free.max(0.0);
        match self {
            Self::Left => 0.0,
            Self::Center => free / 2.0,
            Self::Right => free,
        }
    }
}

/// Measurement capability supplied by the rendering backend.
///
/// Glyph image sizes are asset-dependent, so widths come from decoded
/// assets rather than font metrics.
pub trait GlyphMeasure {
    /// Width of one glyph unit at its own height
    fn glyph_width(&self, unit: &GlyphUnit) -> f32;

    /// Whether an asset can actually be drawn. Glyphs referencing an
    /// unavailable asset are demoted to fallbacks before layout commits.
    fn is_available(&self, _asset: &AssetId) -> bool {
        true
    }

    /// Width of a word: the sum of its glyph widths
    fn word_width(&self, word: &Word) -> f32 {
        word.units().iter().map(|unit| self.glyph_width(unit)).sum()
    }
}

/// Measurement with fixed aspect ratios.
///
/// Image glyphs are `height * image_aspect` wide, fallbacks
/// `height * fallback_aspect`.
#[derive(Debug, Clone, Copy)]
pub struct FixedAdvance {
    pub image_aspect: f32,
    pub fallback_aspect: f32,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self {
            image_aspect: 1.0,
            fallback_aspect: 0.6,
        }
    }
}

impl GlyphMeasure for FixedAdvance {
    fn glyph_width(&self, unit: &GlyphUnit) -> f32 {
        match unit {
            GlyphUnit::Image { height, .. } => height * self.image_aspect,
            GlyphUnit::Fallback { height, .. } => height * self.fallback_aspect,
        }
    }
}

/// A wrapped display line
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayLine {
    /// Words on this line, in input order
    pub words: Vec<Word>,
    /// Measured width including inter-word spacers
    pub width: f32,
    /// X offset for alignment
    pub x_offset: f32,
}

impl DisplayLine {
    /// The line's characters with single spaces between words
    pub fn text(&self) -> String {
        self.words.iter().map(Word::text).collect::<Vec<_>>().join(" ")
    }

    /// Whether any word on the line contains a fallback glyph
    pub fn has_fallback(&self) -> bool {
        self.words
            .iter()
            .flat_map(Word::units)
            .any(GlyphUnit::is_fallback)
    }
}

/// Complete glyph layout result
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphLayout {
    /// Wrapped lines, top to bottom
    pub lines: Vec<DisplayLine>,
    /// Total width
    pub width: f32,
    /// Total height
    pub height: f32,
    /// Height of one line
    pub line_height: f32,
    /// Gap between words
    pub spacer: f32,
}

impl GlyphLayout {
    /// Create empty layout
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            width: 0.0,
            height: 0.0,
            line_height: 0.0,
            spacer: 0.0,
        }
    }

    /// Number of lines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterate over every glyph unit in reading order
    pub fn units(&self) -> impl Iterator<Item = &GlyphUnit> {
        self.lines
            .iter()
            .flat_map(|line| line.words.iter())
            .flat_map(Word::units)
    }
}
