//! HTML converter for pdftohtml / pdf2htmlEX output.

use super::pipeline::{process, SourceInfo};
use super::{ConvertOptions, ConvertResult, DocumentConverter};
use crate::detect::SourceKind;
use crate::error::Result;
use crate::model::{HtmlPage, PageSequence};
use std::path::Path;

/// Converter for HTML documents whose pages are separated by `<hr>`.
#[derive(Debug, Clone, Default)]
pub struct HtmlConverter {
    _private: (),
}

impl HtmlConverter {
    /// Create a new HTML converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for HtmlConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["html", "htm", "xhtml"]
    }

    fn name(&self) -> &str {
        "html"
    }

    fn convert(&self, path: &Path, options: &ConvertOptions) -> Result<ConvertResult> {
        let bytes = std::fs::read(path)?;
        let html = String::from_utf8_lossy(&bytes);
        let sequence = PageSequence::<HtmlPage>::from_html_document(&html)?;
        process(sequence, SourceInfo::from_path(SourceKind::Html, path), options)
    }

    fn convert_bytes(&self, bytes: &[u8], options: &ConvertOptions) -> Result<ConvertResult> {
        let html = String::from_utf8_lossy(bytes);
        let sequence = PageSequence::<HtmlPage>::from_html_document(&html)?;
        process(sequence, SourceInfo::detached(SourceKind::Html), options)
    }
}
