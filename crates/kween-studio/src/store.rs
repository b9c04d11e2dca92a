//! Saved configuration
//!
//! One named slot holds the whole configuration as a JSON record:
//!
//! ```json
//! { "text": "Hello World", "fontSize": 50, "backgroundColor": "#ffffff" }
//! ```
//!
//! `fontSize` may also be a numeric string, and `backgroundImage` holds a
//! `url(...)` reference (`"none"` means no image). Missing or unreadable
//! fields fall back to the defaults; an unreadable record loads as nothing.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use kween_render::{Background, Color, ImageReference};
use serde::{Deserialize, Serialize};

use crate::config::{Configuration, DEFAULT_GLYPH_HEIGHT, DEFAULT_TEXT};
use crate::{Result, StudioError};

/// Key-value storage for serialized records
pub trait SlotStore {
    /// Read a slot; `Ok(None)` if it was never written
    fn read(&self, slot: &str) -> io::Result<Option<String>>;

    /// Overwrite a slot
    fn write(&mut self, slot: &str, value: &str) -> io::Result<()>;
}

/// Slots kept in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySlotStore {
    slots: HashMap<String, String>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemorySlotStore {
    fn read(&self, slot: &str) -> io::Result<Option<String>> {
        Ok(self.slots.get(slot).cloned())
    }

    fn write(&mut self, slot: &str, value: &str) -> io::Result<()> {
        self.slots.insert(slot.to_string(), value.to_string());
        Ok(())
    }
}

/// Slots stored as `<dir>/<slot>.json`
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    dir: PathBuf,
}

impl FileSlotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }
}

impl SlotStore for FileSlotStore {
    fn read(&self, slot: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.path(slot)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, slot: &str, value: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path(slot);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum FontSize {
    Number(f64),
    Text(String),
}

impl FontSize {
    fn pixels(&self) -> Option<u32> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().trim_end_matches("px").parse().ok()?,
        };
        (value.is_finite() && value >= 1.0 && value <= u32::MAX as f64).then(|| value.round() as u32)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedRecord {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    font_size: Option<FontSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    background_image: Option<String>,
}

impl From<&Configuration> for SavedRecord {
    fn from(config: &Configuration) -> Self {
        let (background_color, background_image) = match &config.background {
            Background::Color(color) => (Some(color.to_hex()), None),
            Background::Image(image) => (None, Some(image.to_css())),
        };
        Self {
            text: Some(config.text.clone()),
            font_size: Some(FontSize::Number(config.glyph_height as f64)),
            background_color,
            background_image,
        }
    }
}

impl From<SavedRecord> for Configuration {
    fn from(record: SavedRecord) -> Self {
        let background = record
            .background_image
            .as_deref()
            .and_then(ImageReference::from_css)
            .map(Background::Image)
            .or_else(|| {
                record
                    .background_color
                    .as_deref()
                    .and_then(Color::parse)
                    .map(Background::Color)
            })
            .unwrap_or_default();

        Self {
            text: record.text.unwrap_or_else(|| DEFAULT_TEXT.to_string()),
            glyph_height: record
                .font_size
                .as_ref()
                .and_then(FontSize::pixels)
                .unwrap_or(DEFAULT_GLYPH_HEIGHT),
            background,
        }
    }
}

/// Saves and restores the configuration in a single slot
#[derive(Debug, Clone)]
pub struct PersistenceStore<S> {
    store: S,
    slot: String,
}

impl<S: SlotStore> PersistenceStore<S> {
    pub fn new(store: S, slot: impl Into<String>) -> Self {
        Self {
            store,
            slot: slot.into(),
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Overwrite the slot with `config`
    pub fn save(&mut self, config: &Configuration) -> Result<()> {
        let json = serde_json::to_string(&SavedRecord::from(config))
            .map_err(|e| StudioError::Persistence(e.to_string()))?;
        self.store
            .write(&self.slot, &json)
            .map_err(|e| StudioError::Persistence(e.to_string()))?;
        tracing::info!(slot = %self.slot, "saved configuration");
        Ok(())
    }

    /// Restore the saved configuration.
    ///
    /// A missing slot, an unreadable store or a malformed record all give
    /// `None`; the caller supplies defaults.
    pub fn load(&self) -> Option<Configuration> {
        let json = match self.store.read(&self.slot) {
            Ok(Some(json)) => json,
            Ok(None) => {
                tracing::debug!(slot = %self.slot, "no saved configuration");
                return None;
            }
            Err(e) => {
                tracing::warn!(slot = %self.slot, error = %e, "failed to read saved configuration");
                return None;
            }
        };

        match serde_json::from_str::<SavedRecord>(&json) {
            Ok(record) => Some(record.into()),
            Err(e) => {
                tracing::warn!(slot = %self.slot, error = %e, "ignoring malformed saved configuration");
                None
            }
        }
    }

    /// `load()`, or the defaults
    pub fn load_or_default(&self) -> Configuration {
        self.load().unwrap_or_default()
    }
}
