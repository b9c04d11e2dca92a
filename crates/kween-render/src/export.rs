//! PNG export
//!
//! The export adapter is a boundary: anything that can turn a surface into
//! image bytes implements [`Exporter`].

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::assets::AssetCache;
use crate::fallback::FallbackFont;
use crate::surface::CompositionSurface;
use crate::{Painter, Result};

/// Exported picture
#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub file_name: String,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl ExportedImage {
    /// Write into `dir` under the export's file name
    pub fn save_to(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Turns a composition surface into a downloadable image
pub trait Exporter: Send + Sync {
    fn export(
        &self,
        surface: &CompositionSurface,
        assets: &AssetCache,
        font: &FallbackFont,
    ) -> Result<ExportedImage>;
}

/// Paints with tiny-skia and encodes PNG
#[derive(Debug, Clone, Default)]
pub struct PngExporter {
    painter: Painter,
}

impl PngExporter {
    pub fn new(painter: Painter) -> Self {
        Self { painter }
    }

    /// `kween-sans-<unix millis>.png`
    pub fn file_name() -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        format!("kween-sans-{millis}.png")
    }
}

impl Exporter for PngExporter {
    fn export(
        &self,
        surface: &CompositionSurface,
        assets: &AssetCache,
        font: &FallbackFont,
    ) -> Result<ExportedImage> {
        let canvas = self.painter.paint(surface, assets, font)?;
        let bytes = canvas.encode_png()?;
        tracing::info!(
            width = canvas.width(),
            height = canvas.height(),
            bytes = bytes.len(),
            "exported surface"
        );

        Ok(ExportedImage {
            file_name: Self::file_name(),
            mime_type: "image/png",
            width: canvas.width(),
            height: canvas.height(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssetSource;
    use crate::surface::SurfaceContent;
    use crate::Background;

    #[test]
    fn test_file_name_shape() {
        let name = PngExporter::file_name();
        assert!(name.starts_with("kween-sans-"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_export_writes_png() {
        let surface = CompositionSurface::new(
            1,
            40.0,
            4.0,
            Background::default(),
            SurfaceContent::Placeholder("x".into()),
        );
        let assets = AssetCache::new(MemoryAssetSource::new());
        let image = PngExporter::default()
            .export(&surface, &assets, &FallbackFont::none())
            .unwrap();

        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.width, 80);
        let decoded = image::load_from_memory(&image.bytes).unwrap();
        assert_eq!(decoded.width(), 80);

        let dir = tempfile::tempdir().unwrap();
        let path = image.save_to(dir.path()).unwrap();
        assert!(path.exists());
    }
}
