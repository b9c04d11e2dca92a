//! Kween Studio
//!
//! Ties the glyph pipeline to user state: the current configuration, the
//! saved-configuration slot, background uploads, and export.
//!
//! # Example
//! ```rust,ignore
//! use kween_studio::{MemorySlotStore, Studio, StudioConfig};
//!
//! let mut studio = Studio::new(StudioConfig::default(), MemorySlotStore::new());
//! studio.init()?;
//! studio.set_text("Hello, World");
//! studio.generate()?;
//! let png = smol::block_on(studio.export())?;
//! ```

mod config;
mod notice;
pub mod store;
pub mod upload;
mod studio;

pub use config::{Configuration, StudioConfig, DEFAULT_GLYPH_HEIGHT, DEFAULT_TEXT};
pub use notice::Notice;
pub use store::{FileSlotStore, MemorySlotStore, PersistenceStore, SlotStore};
pub use upload::BackgroundUpload;
pub use studio::{ExportJob, Studio, PLACEHOLDER_MESSAGE};

// Re-export sub-crates for hosts
pub use kween_render as render;
pub use kween_text as text;

/// Studio version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Studio error types.
///
/// Display strings of the user-facing variants are the messages shown in
/// alerts.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    #[error("Please upload an image file (JPEG, PNG, etc.)")]
    NotAnImage { mime_type: String },

    #[error("Please select an image smaller than {}MB", .max / (1024 * 1024))]
    UploadTooLarge { size: u64, max: u64 },

    #[error("Error reading the file. Please try again.")]
    UploadUnreadable(String),

    #[error("Please generate some text first!")]
    NothingToExport,

    #[error("An export is already in progress")]
    Busy,

    #[error("Error generating image. Please try again.")]
    Export(#[source] kween_render::RenderError),

    #[error("Error saving configuration: {0}")]
    Persistence(String),

    #[error(transparent)]
    Text(#[from] kween_text::TextError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StudioError>;
