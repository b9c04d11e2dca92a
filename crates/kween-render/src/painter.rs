//! Painter - paints composition surfaces to a canvas

use kween_text::GlyphUnit;

use crate::assets::AssetCache;
use crate::background::paint_background;
use crate::fallback::FallbackFont;
use crate::surface::{CompositionSurface, PLACEHOLDER_SIZE, SurfaceContent};
use crate::{Canvas, Color, RenderError, Result};

/// Painter for composition surfaces
#[derive(Debug, Clone)]
pub struct Painter {
    /// Output pixels per surface unit
    pub scale: f32,
    /// Color of fallback glyphs
    pub text_color: Color,
    /// Color of the placeholder message
    pub placeholder_color: Color,
}

impl Default for Painter {
    fn default() -> Self {
        Self {
            scale: 2.0,
            text_color: Color::BLACK,
            placeholder_color: Color::GRAY,
        }
    }
}

impl Painter {
    pub fn new(scale: f32) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    /// Paint the surface into a new canvas
    pub fn paint(
        &self,
        surface: &CompositionSurface,
        assets: &AssetCache,
        font: &FallbackFont,
    ) -> Result<Canvas> {
        let width = (surface.width() * self.scale).ceil().max(1.0) as u32;
        let height = (surface.height() * self.scale).ceil().max(1.0) as u32;
        let mut canvas = Canvas::new(width, height).ok_or(RenderError::CanvasSize { width, height })?;

        if let Err(e) = paint_background(&mut canvas, surface.background()) {
            tracing::warn!(error = %e, "background unavailable, painting white");
            canvas.clear(Color::WHITE);
        }

        match surface.content() {
            SurfaceContent::Glyphs(_) => self.paint_glyphs(&mut canvas, surface, assets, font),
            SurfaceContent::Placeholder(message) => {
                self.paint_placeholder(&mut canvas, surface, message, font)
            }
        }

        tracing::debug!(width, height, generation = surface.generation(), "painted surface");
        Ok(canvas)
    }

    fn paint_glyphs(
        &self,
        canvas: &mut Canvas,
        surface: &CompositionSurface,
        assets: &AssetCache,
        font: &FallbackFont,
    ) {
        let s = self.scale;
        for placed in surface.placed_glyphs(&assets.metrics(font)) {
            let (x, y, w, h) = (placed.x * s, placed.y * s, placed.width * s, placed.height * s);
            match placed.unit {
                GlyphUnit::Image { asset, ch, .. } => match assets.get(asset) {
                    Some(image) => canvas.draw_image(image.pixmap().as_ref(), x, y, w, h),
                    // asset dropped after layout; draw it as text
                    None => font.draw(canvas, *ch, x, y, h, self.text_color),
                },
                GlyphUnit::Fallback { ch, .. } => font.draw(canvas, *ch, x, y, h, self.text_color),
            }
        }
    }

    fn paint_placeholder(
        &self,
        canvas: &mut Canvas,
        surface: &CompositionSurface,
        message: &str,
        font: &FallbackFont,
    ) {
        let size = PLACEHOLDER_SIZE * self.scale;
        let total: f32 = message.chars().map(|c| font.advance(c, size)).sum();
        let mut x = ((canvas.width() as f32 - total) / 2.0).max(0.0);
        let y = surface.padding() * self.scale;
        for c in message.chars() {
            if !c.is_whitespace() {
                font.draw(canvas, c, x, y, size, self.placeholder_color);
            }
            x += font.advance(c, size);
        }
    }
}
