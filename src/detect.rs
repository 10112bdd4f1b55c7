//! Source format detection.

use crate::error::{Error, Result};
use crate::model::PAGE_BREAK;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Kind of extracted source a document was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Plain text with form-feed page breaks (pdftotext output)
    Text,
    /// HTML with `<hr>` page breaks (pdftohtml / pdf2htmlEX output)
    Html,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Text => write!(f, "text"),
            SourceKind::Html => write!(f, "html"),
        }
    }
}

impl SourceKind {
    /// Kind implied by a file extension, if any.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" | "text" => Some(SourceKind::Text),
            "html" | "htm" | "xhtml" => Some(SourceKind::Html),
            _ => None,
        }
    }
}

/// Bytes inspected when sniffing a file.
const SNIFF_LEN: usize = 64 * 1024;

const HTML_MARKERS: &[&str] = &["<!doctype html", "<html", "<body", "<div", "<br", "<hr", "<p"];

/// Detect the source kind of a file.
///
/// The extension decides when it is recognized; otherwise the leading
/// bytes are sniffed.
///
/// # Example
/// ```no_run
/// use folio::detect::{detect_source_from_path, SourceKind};
///
/// let kind = detect_source_from_path("book.txt").unwrap();
/// assert_eq!(kind, SourceKind::Text);
/// ```
pub fn detect_source_from_path<P: AsRef<Path>>(path: P) -> Result<SourceKind> {
    let path = path.as_ref();
    if let Some(kind) = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(SourceKind::from_extension)
    {
        return Ok(kind);
    }

    let file = File::open(path)?;
    let mut reader = BufReader::new(file).take(SNIFF_LEN as u64);
    let mut head = Vec::with_capacity(SNIFF_LEN);
    reader.read_to_end(&mut head)?;
    detect_source_from_bytes(&head)
}

/// Detect the source kind from the leading bytes of a file.
///
/// # Returns
/// * `Ok(SourceKind::Html)` if the data opens with HTML markup
/// * `Ok(SourceKind::Text)` if the data contains a form feed
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_source_from_bytes(data: &[u8]) -> Result<SourceKind> {
    let data = data.strip_prefix(b"\xef\xbb\xbf").unwrap_or(data);
    let text = String::from_utf8_lossy(data);
    let trimmed = text.trim_start();

    if trimmed.starts_with('<') {
        let head: String = trimmed.chars().take(1024).collect::<String>().to_lowercase();
        if HTML_MARKERS.iter().any(|m| head.contains(m)) {
            return Ok(SourceKind::Html);
        }
    }

    if text.contains(PAGE_BREAK) {
        return Ok(SourceKind::Text);
    }

    Err(Error::UnknownFormat)
}

/// Check if a file is a supported source.
pub fn is_supported<P: AsRef<Path>>(path: P) -> bool {
    detect_source_from_path(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_html() {
        let data = b"<!DOCTYPE html>\n<html><body>page<hr/></body></html>";
        assert_eq!(detect_source_from_bytes(data).unwrap(), SourceKind::Html);

        let data = b"\xef\xbb\xbf  <div class=\"pf\"><div>line</div></div>";
        assert_eq!(detect_source_from_bytes(data).unwrap(), SourceKind::Html);
    }

    #[test]
    fn test_detect_text() {
        let data = b"first page\x0csecond page\x0c";
        assert_eq!(detect_source_from_bytes(data).unwrap(), SourceKind::Text);
    }

    #[test]
    fn test_detect_unknown() {
        assert!(matches!(
            detect_source_from_bytes(b"%PDF-1.7\n"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(
            detect_source_from_bytes(b"plain text without breaks"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_extension_wins() {
        assert_eq!(SourceKind::from_extension("TXT"), Some(SourceKind::Text));
        assert_eq!(SourceKind::from_extension("htm"), Some(SourceKind::Html));
        assert_eq!(SourceKind::from_extension("pdf"), None);
    }

    #[test]
    fn test_sniff_file_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book");
        std::fs::write(&path, "one\x0ctwo\x0c").unwrap();
        assert_eq!(detect_source_from_path(&path).unwrap(), SourceKind::Text);
        assert!(is_supported(&path));
    }
}
