//! Image references embedded in markup pages.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// An image referenced by a page's markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageImage {
    /// Index of the page the image belongs to
    pub page_index: usize,

    /// Position of the image within the page
    pub ordinal: usize,

    /// Path as written in the `src` attribute
    pub source: PathBuf,

    /// Raw binary data, once loaded
    #[serde(skip_serializing)]
    pub data: Option<Vec<u8>>,
}

impl PageImage {
    /// Create an image reference.
    pub fn new(page_index: usize, ordinal: usize, source: impl Into<PathBuf>) -> Self {
        Self {
            page_index,
            ordinal,
            source: source.into(),
            data: None,
        }
    }

    /// Identifier unique within a document (`image_{page}_{ordinal}`).
    pub fn uid(&self) -> String {
        format!("image_{}_{}", self.page_index, self.ordinal)
    }

    /// Base file name used inside the packaged book.
    pub fn file_name(&self) -> String {
        file_name_of(&self.source)
    }

    /// MIME type guessed from the file extension.
    pub fn media_type(&self) -> &'static str {
        let ext = self
            .source
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "svg" => "image/svg+xml",
            "webp" => "image/webp",
            "tif" | "tiff" => "image/tiff",
            _ => "image/png",
        }
    }

    /// Read the image bytes, resolving relative paths against `base_dir`.
    pub fn load(&mut self, base_dir: Option<&Path>) -> Result<()> {
        let path = match base_dir {
            Some(dir) if self.source.is_relative() => dir.join(&self.source),
            _ => self.source.clone(),
        };
        self.data = Some(std::fs::read(path)?);
        Ok(())
    }

    /// Whether the bytes have been loaded.
    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    /// Size of the loaded data in bytes.
    pub fn size(&self) -> usize {
        self.data.as_ref().map(Vec::len).unwrap_or(0)
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_naming() {
        let image = PageImage::new(3, 1, "/tmp/out/fig-3_1.JPG");
        assert_eq!(image.uid(), "image_3_1");
        assert_eq!(image.file_name(), "fig-3_1.JPG");
        assert_eq!(image.media_type(), "image/jpeg");
        assert!(!image.is_loaded());
    }

    #[test]
    fn test_default_media_type() {
        let image = PageImage::new(0, 0, "figure");
        assert_eq!(image.media_type(), "image/png");
    }

    #[test]
    fn test_load_relative() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), [1u8, 2, 3]).unwrap();

        let mut image = PageImage::new(0, 0, "a.png");
        image.load(Some(dir.path())).unwrap();
        assert_eq!(image.size(), 3);

        let mut missing = PageImage::new(0, 1, "missing.png");
        assert!(missing.load(Some(dir.path())).is_err());
        assert!(!missing.is_loaded());
    }
}
