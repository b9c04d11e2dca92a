//! Background painting

use std::path::{Path, PathBuf};

use crate::assets::DecodedImage;
use crate::{Canvas, Color, RenderError, Result};

/// Reference to a background image on disk
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageReference {
    path: PathBuf,
}

impl ImageReference {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// CSS-style `url("...")` form used in saved records
    pub fn to_css(&self) -> String {
        format!("url(\"{}\")", self.path.display())
    }

    /// Parse `url(...)`, `url("...")` or a bare path; `none` and empty are absent.
    ///
    /// Only one matching pair of quotes is removed, so quoted paths keep
    /// their own spaces and quote characters.
    pub fn from_css(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("none") {
            return None;
        }
        let inner = value
            .strip_prefix("url(")
            .and_then(|rest| rest.strip_suffix(')'))
            .map(|s| unquote(s.trim()))
            .unwrap_or(value);
        if inner.is_empty() {
            None
        } else {
            Some(Self::new(inner))
        }
    }

    /// Read and decode the referenced image
    pub fn load(&self) -> Result<DecodedImage> {
        let bytes = std::fs::read(&self.path)
            .map_err(|e| RenderError::Background(format!("{}: {e}", self.path.display())))?;
        DecodedImage::decode(&bytes)
    }
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|q| value.strip_prefix(q)?.strip_suffix(q))
        .unwrap_or(value)
}

/// Composition background: a solid color or an image, never both
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Background {
    Color(Color),
    Image(ImageReference),
}

impl Default for Background {
    fn default() -> Self {
        Self::Color(Color::WHITE)
    }
}

impl Background {
    pub fn color(&self) -> Option<Color> {
        match self {
            Self::Color(color) => Some(*color),
            Self::Image(_) => None,
        }
    }

    pub fn image(&self) -> Option<&ImageReference> {
        match self {
            Self::Image(image) => Some(image),
            Self::Color(_) => None,
        }
    }
}

/// Paint a background over the whole canvas.
///
/// Images are scaled to cover the canvas and centered.
pub fn paint_background(canvas: &mut Canvas, background: &Background) -> Result<()> {
    match background {
        Background::Color(color) => {
            canvas.clear(*color);
        }
        Background::Image(reference) => {
            let image = reference.load()?;
            canvas.clear(Color::TRANSPARENT);
            let (w, h) = (canvas.width() as f32, canvas.height() as f32);
            let (x, y, dw, dh) = cover(image.width as f32, image.height as f32, w, h);
            canvas.draw_image_clipped(image.pixmap().as_ref(), (x, y, dw, dh), (0.0, 0.0, w, h));
        }
    }
    Ok(())
}

/// Destination rect that scales `(iw, ih)` to cover `(w, h)`, centered
fn cover(iw: f32, ih: f32, w: f32, h: f32) -> (f32, f32, f32, f32) {
    let scale = (w / iw).max(h / ih);
    let (dw, dh) = (iw * scale, ih * scale);
    ((w - dw) / 2.0, (h - dh) / 2.0, dw, dh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_paint_color() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        paint_background(&mut canvas, &Background::Color(Color::rgb(1, 2, 3))).unwrap();
        assert_eq!(canvas.get_pixel(9, 9), Some(Color::rgb(1, 2, 3)));
    }

    #[test]
    fn test_missing_image_is_error() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        let bg = Background::Image(ImageReference::new("/nonexistent/bg.png"));
        assert!(matches!(paint_background(&mut canvas, &bg), Err(RenderError::Background(_))));
    }

    #[test]
    fn test_cover_wide_image() {
        // 200x100 into 100x100: scale 1, cropped left/right
        assert_eq!(cover(200.0, 100.0, 100.0, 100.0), (-50.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn test_css_forms() {
        assert_eq!(ImageReference::from_css("none"), None);
        assert_eq!(ImageReference::from_css(""), None);
        assert_eq!(
            ImageReference::from_css("url(\"bg/a b.png\")"),
            Some(ImageReference::new("bg/a b.png"))
        );
        let reference = ImageReference::new("/tmp/x.jpg");
        assert_eq!(ImageReference::from_css(&reference.to_css()), Some(reference));
        assert_eq!(ImageReference::from_css("url(plain.png)"), Some(ImageReference::new("plain.png")));
    }

    #[test]
    fn test_css_keeps_spaces_and_quotes() {
        for path in [" padded.png ", "it's \"quoted\".png", "'single'", "trailing)"] {
            let reference = ImageReference::new(path);
            assert_eq!(
                ImageReference::from_css(&reference.to_css()),
                Some(reference),
                "{path:?}"
            );
        }
    }
}
