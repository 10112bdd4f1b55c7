//! Form-feed delimited text converter.

use super::pipeline::{process, SourceInfo};
use super::{ConvertOptions, ConvertResult, DocumentConverter};
use crate::detect::SourceKind;
use crate::error::Result;
use crate::model::{PageSequence, TextPage};
use std::path::Path;

/// Converter for pdftotext-style output (pages separated by form feeds).
#[derive(Debug, Clone, Default)]
pub struct TextConverter {
    _private: (),
}

impl TextConverter {
    /// Create a new text converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for TextConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["txt", "text"]
    }

    fn name(&self) -> &str {
        "text"
    }

    fn convert(&self, path: &Path, options: &ConvertOptions) -> Result<ConvertResult> {
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        let sequence = PageSequence::<TextPage>::from_text(&text)?;
        process(sequence, SourceInfo::from_path(SourceKind::Text, path), options)
    }

    fn convert_bytes(&self, bytes: &[u8], options: &ConvertOptions) -> Result<ConvertResult> {
        let text = String::from_utf8_lossy(bytes);
        let sequence = PageSequence::<TextPage>::from_text(&text)?;
        process(sequence, SourceInfo::detached(SourceKind::Text), options)
    }
}
