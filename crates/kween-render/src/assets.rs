//! Glyph asset loading and measurement
//!
//! Assets are decoded once and cached together with their failures, so a
//! missing glyph image is only probed on the first generation pass that
//! needs it.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use kween_text::{AssetId, GlyphCatalog, GlyphMeasure, GlyphUnit};
use tiny_skia::{ColorU8, IntSize, Pixmap};

use crate::fallback::FallbackFont;
use crate::{RenderError, Result};

/// A decoded image ready for drawing
#[derive(Clone)]
pub struct DecodedImage {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    pixmap: Pixmap,
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl DecodedImage {
    /// Decode PNG, JPEG, GIF or WebP bytes
    pub fn decode(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data).map_err(|e| RenderError::Decode(e.to_string()))?;
        let rgba = img.into_rgba8();
        Self::from_rgba(rgba.width(), rgba.height(), rgba.as_raw())
    }

    /// Create from straight-alpha RGBA data
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self> {
        let size = IntSize::from_wh(width, height)
            .ok_or(RenderError::CanvasSize { width, height })?;
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(RenderError::Decode(format!(
                "expected {expected} bytes of RGBA, got {}",
                rgba.len()
            )));
        }

        let mut pixmap = Pixmap::new(size.width(), size.height())
            .ok_or(RenderError::CanvasSize { width, height })?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.chunks_exact(4)) {
            *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }

        Ok(Self { width, height, pixmap })
    }

    /// Width / height
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

/// Where glyph asset bytes come from
pub trait AssetSource: Send + Sync {
    fn read(&self, asset: &AssetId) -> std::io::Result<Vec<u8>>;
}

/// Assets stored as files under a root directory
#[derive(Debug, Clone)]
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirAssetSource {
    fn read(&self, asset: &AssetId) -> std::io::Result<Vec<u8>> {
        std::fs::read(self.root.join(asset.as_str()))
    }
}

/// In-memory assets
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetSource {
    assets: HashMap<AssetId, Vec<u8>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, asset: impl Into<AssetId>, bytes: Vec<u8>) {
        self.assets.insert(asset.into(), bytes);
    }
}

impl AssetSource for MemoryAssetSource {
    fn read(&self, asset: &AssetId) -> std::io::Result<Vec<u8>> {
        self.assets
            .get(asset)
            .cloned()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, asset.to_string()))
    }
}

#[derive(Debug, Clone)]
enum AssetEntry {
    Ready(Arc<DecodedImage>),
    Failed(String),
}

/// Decoded asset cache
#[derive(Clone)]
pub struct AssetCache {
    source: Arc<dyn AssetSource>,
    entries: HashMap<AssetId, AssetEntry>,
}

impl AssetCache {
    pub fn new(source: impl AssetSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
            entries: HashMap::new(),
        }
    }

    /// Load an asset, reading and decoding it on first use
    pub fn load(&mut self, asset: &AssetId) -> Option<Arc<DecodedImage>> {
        if !self.entries.contains_key(asset) {
            let decoded = self
                .source
                .read(asset)
                .map_err(RenderError::from)
                .and_then(|bytes| DecodedImage::decode(&bytes));
            let entry = match decoded {
                Ok(image) => {
                    tracing::debug!(%asset, width = image.width, height = image.height, "loaded glyph asset");
                    AssetEntry::Ready(Arc::new(image))
                }
                Err(e) => {
                    tracing::debug!(%asset, error = %e, "glyph asset unavailable");
                    AssetEntry::Failed(e.to_string())
                }
            };
            self.entries.insert(asset.clone(), entry);
        }
        self.get(asset).cloned()
    }

    /// Load every asset the characters of `text` resolve to
    pub fn preload_text(&mut self, text: &str, catalog: &GlyphCatalog) {
        for c in text.chars() {
            if let Some(asset) = catalog.resolve(c) {
                self.load(asset);
            }
        }
    }

    /// A loaded asset; `None` if not loaded yet or failed
    pub fn get(&self, asset: &AssetId) -> Option<&Arc<DecodedImage>> {
        match self.entries.get(asset) {
            Some(AssetEntry::Ready(image)) => Some(image),
            _ => None,
        }
    }

    /// Failure reason for an asset that could not be loaded
    pub fn failure(&self, asset: &AssetId) -> Option<&str> {
        match self.entries.get(asset) {
            Some(AssetEntry::Failed(reason)) => Some(reason.as_str()),
            _ => None,
        }
    }

    /// Record that an asset turned out to be unusable
    pub fn mark_failed(&mut self, asset: &AssetId, reason: impl Into<String>) {
        self.entries
            .insert(asset.clone(), AssetEntry::Failed(reason.into()));
    }

    /// Intrinsic size of a loaded asset
    pub fn dimensions(&self, asset: &AssetId) -> Option<(u32, u32)> {
        self.get(asset).map(|image| (image.width, image.height))
    }

    /// Measurement view over this cache
    pub fn metrics<'a>(&'a self, font: &'a FallbackFont) -> AssetMetrics<'a> {
        AssetMetrics { cache: self, font }
    }
}

/// Measures glyphs from decoded asset sizes and fallback font advances
#[derive(Clone, Copy)]
pub struct AssetMetrics<'a> {
    cache: &'a AssetCache,
    font: &'a FallbackFont,
}

impl GlyphMeasure for AssetMetrics<'_> {
    fn glyph_width(&self, unit: &GlyphUnit) -> f32 {
        match unit {
            GlyphUnit::Image { ch, asset, height } => match self.cache.get(asset) {
                Some(image) => height * image.aspect(),
                None => self.font.advance(*ch, *height),
            },
            GlyphUnit::Fallback { ch, height } => self.font.advance(*ch, *height),
        }
    }

    fn is_available(&self, asset: &AssetId) -> bool {
        self.cache.get(asset).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 0, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn cache() -> AssetCache {
        let mut source = MemoryAssetSource::new();
        source.insert("A.png", png(30, 60));
        source.insert("B.png", b"not an image".to_vec());
        AssetCache::new(source)
    }

    #[test]
    fn test_load_and_dimensions() {
        let mut cache = cache();
        let a = AssetId::new("A.png");
        assert!(cache.load(&a).is_some());
        assert_eq!(cache.dimensions(&a), Some((30, 60)));
    }

    #[test]
    fn test_failures_are_cached() {
        let mut cache = cache();
        let b = AssetId::new("B.png");
        let missing = AssetId::new("C.png");
        assert!(cache.load(&b).is_none());
        assert!(cache.failure(&b).is_some());
        assert!(cache.load(&missing).is_none());
        assert!(cache.failure(&missing).is_some());
    }

    #[test]
    fn test_mark_failed() {
        let mut cache = cache();
        let a = AssetId::new("A.png");
        cache.load(&a);
        cache.mark_failed(&a, "draw failed");
        assert!(cache.get(&a).is_none());
        assert_eq!(cache.failure(&a), Some("draw failed"));
    }

    #[test]
    fn test_metrics_use_aspect_ratio() {
        let mut cache = cache();
        cache.preload_text("AB", &GlyphCatalog::standard());
        let font = FallbackFont::none();
        let metrics = cache.metrics(&font);

        let a = GlyphUnit::Image { ch: 'A', asset: AssetId::new("A.png"), height: 50.0 };
        assert_eq!(metrics.glyph_width(&a), 25.0);
        assert!(metrics.is_available(&AssetId::new("A.png")));
        assert!(!metrics.is_available(&AssetId::new("B.png")));

        let fallback = GlyphUnit::Fallback { ch: '1', height: 50.0 };
        assert!((metrics.glyph_width(&fallback) - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_from_rgba_rejects_bad_length() {
        assert!(DecodedImage::from_rgba(2, 2, &[0; 15]).is_err());
        assert!(DecodedImage::from_rgba(0, 2, &[]).is_err());
    }
}
