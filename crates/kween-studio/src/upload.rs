//! Background image uploads

use std::path::Path;

use kween_render::DecodedImage;

use crate::{Result, StudioError};

/// MIME type for files with no recognized image extension
const UNKNOWN_MIME: &str = "application/octet-stream";

/// A file the user picked as background
#[derive(Debug, Clone)]
pub struct BackgroundUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl BackgroundUpload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file, taking the MIME type from its extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(file_name, mime_for(path), bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Lowercase file extension, if any
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }

    /// Check type and size, then decode.
    ///
    /// Type is checked before size, so an oversized non-image reports
    /// [`StudioError::NotAnImage`].
    pub fn validate(&self, max_bytes: u64) -> Result<DecodedImage> {
        if !self.mime_type.to_ascii_lowercase().starts_with("image/") {
            return Err(StudioError::NotAnImage {
                mime_type: self.mime_type.clone(),
            });
        }
        if self.size() > max_bytes {
            return Err(StudioError::UploadTooLarge {
                size: self.size(),
                max: max_bytes,
            });
        }
        DecodedImage::decode(&self.bytes).map_err(|e| StudioError::UploadUnreadable(e.to_string()))
    }
}

fn mime_for(path: &Path) -> &'static str {
    image::ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(UNKNOWN_MIME)
}
