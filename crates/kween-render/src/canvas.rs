//! Canvas - pixel buffer backed by tiny-skia

use tiny_skia::{
    FillRule, FilterQuality, Paint, Path, Pattern, Pixmap, PixmapRef, Rect, SpreadMode, Stroke,
    Transform,
};

use crate::{Color, RenderError, Result};

/// Pixel canvas
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    /// Create a new canvas, or `None` for a zero-sized one
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Pixmap::new(width, height).map(|pixmap| Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Fill the whole canvas
    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(color.to_skia());
    }

    /// Fill a rectangle
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let Some(rect) = Rect::from_xywh(x, y, width, height) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = true;
        self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }

    /// Outline a rectangle
    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, line: f32, color: Color) {
        let Some(rect) = Rect::from_xywh(x, y, width, height) else {
            return;
        };
        let path = tiny_skia::PathBuilder::from_rect(rect);
        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = true;
        let stroke = Stroke { width: line, ..Stroke::default() };
        self.pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Fill a path
    pub fn fill_path(&mut self, path: &Path, color: Color) {
        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = true;
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    /// Draw an image stretched into the destination rectangle
    pub fn draw_image(&mut self, image: PixmapRef<'_>, x: f32, y: f32, width: f32, height: f32) {
        self.draw_image_clipped(image, (x, y, width, height), (x, y, width, height));
    }

    /// Draw an image scaled into `dest`, only painting inside `clip`
    pub fn draw_image_clipped(
        &mut self,
        image: PixmapRef<'_>,
        dest: (f32, f32, f32, f32),
        clip: (f32, f32, f32, f32),
    ) {
        let (x, y, width, height) = dest;
        if image.width() == 0 || image.height() == 0 {
            return;
        }
        let Some(rect) = Rect::from_xywh(clip.0, clip.1, clip.2, clip.3) else {
            return;
        };

        let sx = width / image.width() as f32;
        let sy = height / image.height() as f32;
        let mut paint = Paint::default();
        paint.shader = Pattern::new(
            image,
            SpreadMode::Pad,
            FilterQuality::Bicubic,
            1.0,
            Transform::from_row(sx, 0.0, 0.0, sy, x, y),
        );
        paint.anti_alias = true;
        self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }

    /// Get a pixel (straight alpha)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        let pixel = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::rgba(pixel.red(), pixel.green(), pixel.blue(), pixel.alpha()))
    }

    /// Encode as PNG
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size() {
        assert!(Canvas::new(0, 10).is_none());
        assert!(Canvas::new(10, 0).is_none());
    }

    #[test]
    fn test_fill_rect() {
        let mut canvas = Canvas::new(20, 20).unwrap();
        canvas.clear(Color::WHITE);
        canvas.fill_rect(5.0, 5.0, 10.0, 10.0, Color::rgb(100, 150, 200));

        assert_eq!(canvas.get_pixel(10, 10), Some(Color::rgb(100, 150, 200)));
        assert_eq!(canvas.get_pixel(1, 1), Some(Color::WHITE));
        assert!(canvas.get_pixel(20, 0).is_none());
    }

    #[test]
    fn test_draw_image_scales() {
        let mut source = Pixmap::new(2, 2).unwrap();
        source.fill(tiny_skia::Color::from_rgba8(255, 0, 0, 255));

        let mut canvas = Canvas::new(20, 20).unwrap();
        canvas.clear(Color::WHITE);
        canvas.draw_image(source.as_ref(), 0.0, 0.0, 10.0, 10.0);

        let inside = canvas.get_pixel(5, 5).unwrap();
        assert!(inside.r > 250 && inside.g < 5 && inside.b < 5, "{inside:?}");
        assert_eq!(canvas.get_pixel(15, 15), Some(Color::WHITE));
    }

    #[test]
    fn test_encode_png_signature() {
        let canvas = Canvas::new(4, 4).unwrap();
        let png = canvas.encode_png().unwrap();
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
    }
}
