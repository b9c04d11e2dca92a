//! Kween Render - Composition and Export
//!
//! CPU rendering of glyph layouts using tiny-skia.
//!
//! This crate provides:
//! - Canvas backed by a tiny-skia Pixmap
//! - Glyph asset loading, caching and measurement
//! - Text fallback glyphs from a system or bundled font
//! - The composition surface (wrapped glyphs over a background)
//! - PNG export

mod canvas;
mod background;
mod painter;
pub mod assets;
pub mod fallback;
pub mod surface;
pub mod export;

pub use canvas::Canvas;
pub use background::{Background, ImageReference};
pub use painter::Painter;
pub use assets::{AssetCache, AssetMetrics, AssetSource, DecodedImage, DirAssetSource, MemoryAssetSource};
pub use fallback::FallbackFont;
pub use surface::{CompositionSurface, PlacedGlyph, SurfaceContent};
pub use export::{ExportedImage, Exporter, PngExporter};

/// Color (RGBA)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    pub const GRAY: Color = Color { r: 0x66, g: 0x66, b: 0x66, a: 255 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create from hex string (e.g., "#ff0000")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }

        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
                Some(Color::rgb(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Color::rgb(r, g, b))
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
                Some(Color::rgba(r, g, b, a))
            }
            _ => None,
        }
    }

    /// Parse a CSS color value: hex, `rgb()`/`rgba()`, or a few keywords
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "white" => return Some(Color::WHITE),
            "black" => return Some(Color::BLACK),
            "transparent" => return Some(Color::TRANSPARENT),
            _ => {}
        }

        if let Some(args) = value
            .strip_prefix("rgba(")
            .or_else(|| value.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts: Vec<&str> = args.split(',').map(str::trim).collect();
            let channel = |s: &str| s.parse::<u8>().ok();
            return match parts.as_slice() {
                [r, g, b] => Some(Color::rgb(channel(r)?, channel(g)?, channel(b)?)),
                [r, g, b, a] => {
                    let alpha = a.parse::<f32>().ok()?.clamp(0.0, 1.0);
                    Some(Color::rgba(channel(r)?, channel(g)?, channel(b)?, (alpha * 255.0).round() as u8))
                }
                _ => None,
            };
        }

        Self::from_hex(value)
    }

    /// `#rrggbb`, or `#rrggbbaa` when not opaque
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    pub(crate) fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

/// Rendering error types
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Invalid canvas size {width}x{height}")]
    CanvasSize { width: u32, height: u32 },

    #[error("Failed to load font: {0}")]
    Font(String),

    #[error("Failed to encode PNG: {0}")]
    Encode(String),

    #[error("Background image unavailable: {0}")]
    Background(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#ffffff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("000"), Some(Color::BLACK));
        assert_eq!(Color::from_hex("#00ff0080"), Some(Color::rgba(0, 255, 0, 128)));
        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("#gg0000").is_none());
        assert!(Color::from_hex("#ééé").is_none());
    }

    #[test]
    fn test_parse_css_forms() {
        assert_eq!(Color::parse("rgb(255, 255, 255)"), Some(Color::WHITE));
        assert_eq!(Color::parse("rgba(10, 20, 30, 0)"), Some(Color::rgba(10, 20, 30, 0)));
        assert_eq!(Color::parse(" White "), Some(Color::WHITE));
        assert!(Color::parse("rgb(1, 2)").is_none());
        assert!(Color::parse("rgb(300, 0, 0)").is_none());
    }

    #[test]
    fn test_hex_round_trip() {
        for color in [Color::WHITE, Color::rgb(18, 52, 86), Color::rgba(1, 2, 3, 4)] {
            assert_eq!(Color::from_hex(&color.to_hex()), Some(color));
        }
    }
}
