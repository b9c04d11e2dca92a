//! Greedy word wrap

use super::{DisplayLine, GlyphMeasure, TextAlign};
use crate::glyph::Word;

/// Word wrap configuration
#[derive(Debug, Clone, Copy)]
pub struct WrapStyle {
    /// Maximum line width
    pub max_width: f32,
    /// Space inserted between adjacent words
    pub spacer: f32,
    /// Line alignment inside `max_width`
    pub align: TextAlign,
}

impl Default for WrapStyle {
    fn default() -> Self {
        Self {
            max_width: f32::INFINITY,
            spacer: 0.0,
            align: TextAlign::default(),
        }
    }
}

/// Greedy line-fill wrapper
#[derive(Debug, Clone, Default)]
pub struct WordWrapEngine {
    style: WrapStyle,
}

impl WordWrapEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: WrapStyle) -> Self {
        Self { style }
    }

    /// Set max width
    pub fn max_width(mut self, width: f32) -> Self {
        self.style.max_width = width;
        self
    }

    /// Set inter-word spacer
    pub fn spacer(mut self, spacer: f32) -> Self {
        self.style.spacer = spacer;
        self
    }

    /// Set line alignment
    pub fn align(mut self, align: TextAlign) -> Self {
        self.style.align = align;
        self
    }

    pub fn style(&self) -> &WrapStyle {
        &self.style
    }

    /// Group words into display lines no wider than `max_width`.
    ///
    /// A word that does not fit starts a new line unless the current line is
    /// empty; a single over-wide word therefore gets a line of its own. An
    /// exact fit stays on the current line.
    pub fn wrap(&self, words: Vec<Word>, measure: &impl GlyphMeasure) -> Vec<DisplayLine> {
        let mut lines = Vec::new();
        let mut current: Vec<Word> = Vec::new();
        let mut line_width = 0.0f32;

        for word in words {
            let word_width = measure.word_width(&word);

            if current.is_empty() {
                line_width = word_width;
                current.push(word);
                continue;
            }

            let candidate = line_width + self.style.spacer + word_width;
            if candidate > self.style.max_width {
                lines.push(self.finish_line(std::mem::take(&mut current), line_width));
                line_width = word_width;
            } else {
                line_width = candidate;
            }
            current.push(word);
        }

        if !current.is_empty() {
            lines.push(self.finish_line(current, line_width));
        }

        tracing::trace!(lines = lines.len(), max_width = self.style.max_width, "wrapped words");
        lines
    }

    fn finish_line(&self, words: Vec<Word>, width: f32) -> DisplayLine {
        let x_offset = if self.style.max_width.is_finite() {
            self.style.align.offset(self.style.max_width - width)
        } else {
            0.0
        };

        DisplayLine {
            words,
            width,
            x_offset,
        }
    }
}
