//! Composition surface
//!
//! The output of one generation pass: wrapped glyph lines (or a placeholder
//! message) over a background. A surface is tagged with the generation that
//! produced it so late notifications can be matched against it.

use kween_text::{AssetId, GlyphLayout, GlyphMeasure, GlyphUnit};

use crate::Background;

/// Point size of the placeholder message
pub const PLACEHOLDER_SIZE: f32 = 16.0;

/// What the surface shows
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceContent {
    Glyphs(GlyphLayout),
    Placeholder(String),
}

/// A glyph with its absolute box on the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph<'a> {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub unit: &'a GlyphUnit,
}

/// Wrapped glyphs over a background
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionSurface {
    generation: u64,
    width: f32,
    padding: f32,
    background: Background,
    content: SurfaceContent,
}

impl CompositionSurface {
    pub fn new(
        generation: u64,
        width: f32,
        padding: f32,
        background: Background,
        content: SurfaceContent,
    ) -> Self {
        Self {
            generation,
            width,
            padding,
            background,
            content,
        }
    }

    /// Generation pass that produced this surface
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Width of the surface; grows past the container for an over-wide word
    pub fn width(&self) -> f32 {
        match &self.content {
            SurfaceContent::Glyphs(layout) => self.width.max(layout.width + 2.0 * self.padding),
            SurfaceContent::Placeholder(_) => self.width,
        }
    }

    pub fn height(&self) -> f32 {
        let content = match &self.content {
            SurfaceContent::Glyphs(layout) => layout.height,
            SurfaceContent::Placeholder(_) => PLACEHOLDER_SIZE,
        };
        content + 2.0 * self.padding
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    /// Replace the background without regenerating glyphs
    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    pub fn content(&self) -> &SurfaceContent {
        &self.content
    }

    pub fn layout(&self) -> Option<&GlyphLayout> {
        match &self.content {
            SurfaceContent::Glyphs(layout) => Some(layout),
            SurfaceContent::Placeholder(_) => None,
        }
    }

    /// Whether the surface holds generated text (not a placeholder)
    pub fn has_glyphs(&self) -> bool {
        self.layout().is_some_and(|layout| !layout.is_empty())
    }

    /// Whether any image glyph on the surface references `asset`
    pub fn uses_asset(&self, asset: &AssetId) -> bool {
        self.layout()
            .is_some_and(|layout| layout.units().any(|u| u.asset() == Some(asset)))
    }

    /// Absolute glyph boxes in reading order
    pub fn placed_glyphs(&self, measure: &impl GlyphMeasure) -> Vec<PlacedGlyph<'_>> {
        let Some(layout) = self.layout() else {
            return Vec::new();
        };

        let mut placed = Vec::new();
        for (row, line) in layout.lines.iter().enumerate() {
            let y = self.padding + row as f32 * layout.line_height;
            let mut x = self.padding + line.x_offset;
            for (i, word) in line.words.iter().enumerate() {
                if i > 0 {
                    x += layout.spacer;
                }
                for unit in word.units() {
                    let width = measure.glyph_width(unit);
                    placed.push(PlacedGlyph {
                        x,
                        y,
                        width,
                        height: unit.height(),
                        unit,
                    });
                    x += width;
                }
            }
        }
        placed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kween_text::{FixedAdvance, GlyphCatalog, TextAlign, TextPipeline, WrapStyle};

    fn surface(text: &str) -> CompositionSurface {
        let style = WrapStyle { max_width: 100.0, spacer: 5.0, align: TextAlign::Left };
        let layout = TextPipeline::new(10.0, style)
            .unwrap()
            .layout(text, &GlyphCatalog::standard(), &FixedAdvance::default());
        CompositionSurface::new(7, 120.0, 10.0, Background::default(), SurfaceContent::Glyphs(layout))
    }

    #[test]
    fn test_placement() {
        let surface = surface("AB CD");
        let placed = surface.placed_glyphs(&FixedAdvance::default());
        let xs: Vec<f32> = placed.iter().map(|p| p.x).collect();
        assert_eq!(xs, [10.0, 20.0, 35.0, 45.0]);
        assert!(placed.iter().all(|p| p.y == 10.0 && p.height == 10.0));
    }

    #[test]
    fn test_rows_advance_by_line_height() {
        let surface = surface("AB, CD");
        let placed = surface.placed_glyphs(&FixedAdvance::default());
        assert_eq!(placed[2].y, 20.0);
        assert_eq!(surface.height(), 40.0);
    }

    #[test]
    fn test_placeholder() {
        let surface = CompositionSurface::new(
            1,
            300.0,
            20.0,
            Background::default(),
            SurfaceContent::Placeholder("nothing".into()),
        );
        assert!(!surface.has_glyphs());
        assert!(surface.placed_glyphs(&FixedAdvance::default()).is_empty());
        assert_eq!(surface.height(), PLACEHOLDER_SIZE + 40.0);
    }

    #[test]
    fn test_uses_asset() {
        let surface = surface("AB");
        assert!(surface.uses_asset(&AssetId::new("A.png")));
        assert!(!surface.uses_asset(&AssetId::new("Z.png")));
        assert_eq!(surface.generation(), 7);
    }
}
