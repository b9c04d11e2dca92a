//! Studio controller
//!
//! Owns the current configuration and the last generated surface. Every
//! generation pass bumps a counter; asset notifications carry the counter
//! they were issued under and are dropped once a newer pass has run.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use kween_render::{
    AssetCache, AssetSource, Background, Color, CompositionSurface, DirAssetSource, ExportedImage,
    Exporter, FallbackFont, ImageReference, Painter, PngExporter, SurfaceContent,
};
use kween_text::{AssetId, GlyphCatalog, LineSplitter, TextPipeline, WrapStyle};

use crate::config::{Configuration, StudioConfig};
use crate::notice::Notice;
use crate::store::{PersistenceStore, SlotStore};
use crate::upload::BackgroundUpload;
use crate::{Result, StudioError};

/// Shown instead of glyphs when the text is blank
pub const PLACEHOLDER_MESSAGE: &str = "Please enter some text to transform.";

const SAVED_MESSAGE: &str = "Text configuration saved!";

/// Interactive composition state
pub struct Studio<S> {
    settings: StudioConfig,
    config: Configuration,
    catalog: GlyphCatalog,
    assets: AssetCache,
    font: FallbackFont,
    store: PersistenceStore<S>,
    exporter: Arc<dyn Exporter>,
    generation: u64,
    surface: Option<CompositionSurface>,
    export_busy: Arc<AtomicU64>,
    export_seq: u64,
    notices: Vec<Notice>,
}

impl<S: SlotStore> Studio<S> {
    /// Create a studio reading glyphs from `settings.asset_root`
    pub fn new(settings: StudioConfig, store: S) -> Self {
        let assets = AssetCache::new(DirAssetSource::new(settings.asset_root.clone()));
        let exporter = PngExporter::new(Painter::new(settings.export_scale));
        let store = PersistenceStore::new(store, settings.slot.clone());

        Self {
            settings,
            config: Configuration::default(),
            catalog: GlyphCatalog::standard(),
            assets,
            font: FallbackFont::none(),
            store,
            exporter: Arc::new(exporter),
            generation: 0,
            surface: None,
            export_busy: Arc::new(AtomicU64::new(0)),
            export_seq: 0,
            notices: Vec::new(),
        }
    }

    /// Font for fallback glyphs
    pub fn with_font(mut self, font: FallbackFont) -> Self {
        self.font = font;
        self
    }

    /// Glyph asset source; drops anything already cached
    pub fn with_assets(mut self, source: impl AssetSource + 'static) -> Self {
        self.assets = AssetCache::new(source);
        self
    }

    pub fn with_exporter(mut self, exporter: impl Exporter + 'static) -> Self {
        self.exporter = Arc::new(exporter);
        self
    }

    pub fn with_catalog(mut self, catalog: GlyphCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Restore the saved configuration (or defaults) and generate
    pub fn init(&mut self) -> Result<()> {
        let mut config = self.store.load_or_default();
        config.glyph_height = self.settings.clamp_height(config.glyph_height);
        self.config = config;
        tracing::info!(
            text = %self.config.text,
            height = self.config.glyph_height,
            "studio initialized"
        );
        self.generate()?;
        Ok(())
    }

    pub fn settings(&self) -> &StudioConfig {
        &self.settings
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn store(&self) -> &PersistenceStore<S> {
        &self.store
    }

    pub fn assets(&self) -> &AssetCache {
        &self.assets
    }

    pub fn font(&self) -> &FallbackFont {
        &self.font
    }

    /// Last generated surface
    pub fn surface(&self) -> Option<&CompositionSurface> {
        self.surface.as_ref()
    }

    /// Number of generation passes run so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_exporting(&self) -> bool {
        self.export_busy.load(Ordering::SeqCst) != 0
    }

    /// Take pending notifications
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Replace the input text; takes effect on the next `generate()`
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.config.text = text.into();
    }

    /// Set the glyph height, clamped to the allowed range
    pub fn set_glyph_height(&mut self, height: u32) -> Result<()> {
        self.config.glyph_height = self.settings.clamp_height(height);
        if self.surface.is_some() {
            self.generate()?;
        }
        Ok(())
    }

    /// Solid background; replaces any image
    pub fn set_background_color(&mut self, color: Color) {
        self.set_background(Background::Color(color));
    }

    /// Back to plain white
    pub fn clear_background(&mut self) {
        self.set_background(Background::default());
    }

    fn set_background(&mut self, background: Background) {
        if let Some(surface) = &mut self.surface {
            surface.set_background(background.clone());
        }
        self.config.background = background;
    }

    /// Validate an uploaded image and make it the background.
    ///
    /// The image is copied into the state directory so a saved configuration
    /// can refer to it. Rejected uploads leave the configuration unchanged.
    pub fn upload_background(&mut self, upload: &BackgroundUpload) -> Result<()> {
        let stored = upload
            .validate(self.settings.max_upload_bytes)
            .and_then(|image| {
                let ext = upload.extension().unwrap_or_else(|| "png".to_string());
                let path = self.settings.state_dir.join(format!("background.{ext}"));
                std::fs::create_dir_all(&self.settings.state_dir)
                    .and_then(|()| std::fs::write(&path, &upload.bytes))
                    .map_err(|e| StudioError::UploadUnreadable(e.to_string()))?;
                tracing::info!(
                    path = %path.display(),
                    width = image.width,
                    height = image.height,
                    "stored background image"
                );
                Ok(path)
            });

        match stored {
            Ok(path) => {
                self.set_background(Background::Image(ImageReference::new(path)));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(file = %upload.file_name, error = %e, "rejected background upload");
                self.notices.push(Notice::Alert(e.to_string()));
                Err(e)
            }
        }
    }

    /// Change the container width and regenerate
    pub fn resize(&mut self, width: f32) -> Result<()> {
        self.settings.container_width = width;
        if self.surface.is_some() {
            self.generate()?;
        }
        Ok(())
    }

    /// Run a generation pass over the current configuration
    pub fn generate(&mut self) -> Result<&CompositionSurface> {
        self.generation += 1;
        let generation = self.generation;
        let height = self.config.glyph_height as f32;

        let content = if self.config.text.trim().is_empty() {
            SurfaceContent::Placeholder(PLACEHOLDER_MESSAGE.to_string())
        } else {
            self.assets.preload_text(&self.config.text, &self.catalog);
            let style = WrapStyle {
                max_width: self.settings.wrap_width(),
                spacer: height * self.settings.spacer_ratio,
                align: self.settings.align,
            };
            let pipeline = TextPipeline::new(height, style)?
                .splitter(LineSplitter::new(self.settings.delimiter));
            let layout = pipeline.layout(
                &self.config.text,
                &self.catalog,
                &self.assets.metrics(&self.font),
            );
            let fallback_lines = layout.lines.iter().filter(|l| l.has_fallback()).count();
            if fallback_lines > 0 {
                tracing::debug!(generation, fallback_lines, "some characters drawn as text");
            }
            SurfaceContent::Glyphs(layout)
        };

        let surface = CompositionSurface::new(
            generation,
            self.settings.container_width,
            self.settings.padding,
            self.config.background.clone(),
            content,
        );
        tracing::info!(
            generation,
            width = surface.width(),
            height = surface.height(),
            "generated surface"
        );

        Ok(&*self.surface.insert(surface))
    }

    /// Report that an asset failed to load while showing `generation`.
    ///
    /// Returns whether the notification was applied. Stale notifications
    /// are ignored.
    pub fn asset_failed(
        &mut self,
        generation: u64,
        asset: &AssetId,
        reason: impl Into<String>,
    ) -> Result<bool> {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, %asset, "ignoring stale asset failure");
            return Ok(false);
        }

        self.assets.mark_failed(asset, reason);
        let used = self
            .surface
            .as_ref()
            .is_some_and(|surface| surface.uses_asset(asset));
        if used {
            tracing::debug!(%asset, "asset failed, regenerating with fallbacks");
            self.generate()?;
        }
        Ok(true)
    }

    /// Persist the current configuration
    pub fn save(&mut self) -> Result<()> {
        match self.store.save(&self.config) {
            Ok(()) => {
                self.notices.push(Notice::Toast(SAVED_MESSAGE.to_string()));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to save configuration");
                self.notices.push(Notice::Alert(e.to_string()));
                Err(e)
            }
        }
    }

    /// Snapshot the surface for export and mark the studio busy
    pub fn begin_export(&mut self) -> Result<ExportJob> {
        if self.is_exporting() {
            return Err(StudioError::Busy);
        }
        let surface = match &self.surface {
            Some(surface) if surface.has_glyphs() => surface.clone(),
            _ => {
                let e = StudioError::NothingToExport;
                self.notices.push(Notice::Alert(e.to_string()));
                return Err(e);
            }
        };

        self.export_seq += 1;
        self.export_busy.store(self.export_seq, Ordering::SeqCst);
        Ok(ExportJob {
            surface,
            assets: self.assets.clone(),
            font: self.font.clone(),
            exporter: Arc::clone(&self.exporter),
            busy: BusyGuard {
                flag: Arc::clone(&self.export_busy),
                id: self.export_seq,
            },
        })
    }

    /// Clear the busy flag and report the export outcome.
    ///
    /// Dropping an unfinished [`ExportJob`] also clears the flag.
    pub fn finish_export(
        &mut self,
        result: kween_render::Result<ExportedImage>,
    ) -> Result<ExportedImage> {
        self.export_busy.store(0, Ordering::SeqCst);
        result.map_err(|e| {
            tracing::warn!(error = %e, "export failed");
            let e = StudioError::Export(e);
            self.notices.push(Notice::Alert(e.to_string()));
            e
        })
    }

    /// Export the current surface
    pub async fn export(&mut self) -> Result<ExportedImage> {
        let job = self.begin_export()?;
        let result = job.run().await;
        self.finish_export(result)
    }
}

/// Marks the studio busy while an export is alive
struct BusyGuard {
    flag: Arc<AtomicU64>,
    id: u64,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        // a later export may already own the flag
        let _ = self
            .flag
            .compare_exchange(self.id, 0, Ordering::SeqCst, Ordering::SeqCst);
    }
}

/// Owned snapshot of everything an export needs
pub struct ExportJob {
    surface: CompositionSurface,
    assets: AssetCache,
    font: FallbackFont,
    exporter: Arc<dyn Exporter>,
    busy: BusyGuard,
}

impl ExportJob {
    pub fn surface(&self) -> &CompositionSurface {
        &self.surface
    }

    /// Paint and encode on the blocking pool
    pub async fn run(self) -> kween_render::Result<ExportedImage> {
        let Self {
            surface,
            assets,
            font,
            exporter,
            busy,
        } = self;
        let result = smol::unblock(move || exporter.export(&surface, &assets, &font)).await;
        drop(busy);
        result
    }
}
