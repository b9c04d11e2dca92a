//! Kween Text - glyph-image text pipeline
//!
//! This crate turns raw text into wrapped lines of glyph units:
//! - Glyph catalog (character -> image asset)
//! - Line splitting (delimiter + whitespace)
//! - Glyph rendering with text fallback
//! - Greedy word wrap over measured glyph widths

pub mod catalog;
pub mod split;
pub mod glyph;
pub mod layout;
mod pipeline;

pub use catalog::{AssetId, GlyphCatalog};
pub use split::{LineSplitter, LogicalLine};
pub use glyph::{GlyphRenderer, GlyphUnit, Word};
pub use layout::{
    DisplayLine, FixedAdvance, GlyphLayout, GlyphMeasure, TextAlign, WordWrapEngine, WrapStyle,
};
pub use pipeline::TextPipeline;

/// Text pipeline error types
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("No glyph asset may be registered for {0:?}")]
    UnsupportedGlyph(char),

    #[error("Glyph height must be positive, got {0}")]
    InvalidHeight(f32),

    #[error("Available width must be positive, got {0}")]
    InvalidWidth(f32),
}

pub type Result<T> = std::result::Result<T, TextError>;
