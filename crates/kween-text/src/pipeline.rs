//! Text -> glyph layout pipeline

use crate::catalog::GlyphCatalog;
use crate::glyph::{GlyphRenderer, Word};
use crate::layout::{GlyphLayout, GlyphMeasure, WordWrapEngine, WrapStyle};
use crate::split::LineSplitter;
use crate::{Result, TextError};

/// Runs split -> render -> measure -> wrap for one generation pass
#[derive(Debug, Clone)]
pub struct TextPipeline {
    splitter: LineSplitter,
    wrapper: WordWrapEngine,
    height: f32,
}

impl TextPipeline {
    /// Create a pipeline for the given glyph height and wrap style
    pub fn new(height: f32, style: WrapStyle) -> Result<Self> {
        if height.is_nan() || height <= 0.0 || height.is_infinite() {
            return Err(TextError::InvalidHeight(height));
        }
        if style.max_width.is_nan() || style.max_width <= 0.0 {
            return Err(TextError::InvalidWidth(style.max_width));
        }
        Ok(Self {
            splitter: LineSplitter::default(),
            wrapper: WordWrapEngine::with_style(style),
            height,
        })
    }

    /// Use a different logical line delimiter
    pub fn splitter(mut self, splitter: LineSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Render text into wrapped display lines.
    ///
    /// Each logical line starts on a fresh display line. Glyphs whose asset
    /// `measure` reports as unavailable are demoted to fallbacks before any
    /// width is committed.
    pub fn layout(
        &self,
        text: &str,
        catalog: &GlyphCatalog,
        measure: &impl GlyphMeasure,
    ) -> GlyphLayout {
        let renderer = GlyphRenderer::new(catalog);
        let logical = self.splitter.split(text);
        if logical.is_empty() {
            return GlyphLayout::empty();
        }

        let mut lines = Vec::new();
        for line in &logical {
            let words: Vec<Word> = line
                .words
                .iter()
                .filter_map(|w| renderer.render_word(w, self.height))
                .map(|word| word.demote_where(|asset| !measure.is_available(asset)))
                .collect();
            lines.extend(self.wrapper.wrap(words, measure));
        }

        let style = self.wrapper.style();
        let widest = lines.iter().map(|l| l.width).fold(0.0f32, f32::max);
        let width = if style.max_width.is_finite() {
            style.max_width.max(widest)
        } else {
            widest
        };
        if width > style.max_width {
            // an over-wide word widened the layout; align against the real width
            for line in &mut lines {
                line.x_offset = style.align.offset(width - line.width);
            }
        }
        let height = lines.len() as f32 * self.height;

        tracing::debug!(
            logical = logical.len(),
            display = lines.len(),
            height = self.height,
            "laid out glyph text"
        );

        GlyphLayout {
            lines,
            width,
            height,
            line_height: self.height,
            spacer: style.spacer,
        }
    }
}
