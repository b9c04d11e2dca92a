//! Studio configuration

use std::path::PathBuf;

use kween_render::Background;
use kween_text::TextAlign;

/// Text shown when nothing has been saved
pub const DEFAULT_TEXT: &str = "Hello World";

/// Glyph height in pixels when nothing has been saved
pub const DEFAULT_GLYPH_HEIGHT: u32 = 50;

/// The user's composition settings; this is what gets saved
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    /// Raw input text, untrimmed
    pub text: String,
    /// Glyph height in pixels
    pub glyph_height: u32,
    /// Solid color or image background
    pub background: Background,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            glyph_height: DEFAULT_GLYPH_HEIGHT,
            background: Background::default(),
        }
    }
}

/// Studio options
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Directory holding the glyph images
    pub asset_root: PathBuf,

    /// Directory for the saved configuration and uploaded backgrounds
    pub state_dir: PathBuf,

    /// Name of the saved-configuration slot
    pub slot: String,

    /// Width of the output container in pixels
    pub container_width: f32,

    /// Padding around the glyphs inside the container
    pub padding: f32,

    /// Allowed glyph heights
    pub min_glyph_height: u32,
    pub max_glyph_height: u32,

    /// Logical line delimiter
    pub delimiter: char,

    /// Line alignment
    pub align: TextAlign,

    /// Gap between words relative to the glyph height
    pub spacer_ratio: f32,

    /// Export pixels per container pixel
    pub export_scale: f32,

    /// Maximum background upload size (bytes)
    pub max_upload_bytes: u64,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("images"),
            state_dir: PathBuf::from(".kween"),
            slot: "kweenSansData".to_string(),
            container_width: 800.0,
            padding: 20.0,
            min_glyph_height: 10,
            max_glyph_height: 200,
            delimiter: ',',
            align: TextAlign::Center,
            spacer_ratio: 0.3,
            export_scale: 2.0,
            max_upload_bytes: 5 * 1024 * 1024, // 5MB
        }
    }
}

impl StudioConfig {
    /// Clamp a glyph height into the allowed range
    pub fn clamp_height(&self, height: u32) -> u32 {
        height.clamp(self.min_glyph_height, self.max_glyph_height.max(self.min_glyph_height))
    }

    /// Width available to wrapped lines
    pub fn wrap_width(&self) -> f32 {
        (self.container_width - 2.0 * self.padding).max(1.0)
    }
}
