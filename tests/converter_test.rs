//! Integration tests for the converter module.

use std::path::Path;
use std::sync::Arc;
use folio::convert::{
    convert_batch, ConvertOptions, ConvertResult, ConverterRegistry, DocumentConverter,
    HtmlConverter, OutputFormat, TextConverter,
};
use folio::error::{Error, Result};
use folio::{
    MetadataCache, MetadataResolver, NoCatalog, NormalizationDriver, PackagedBook, PageSequence,
    SourceKind, StopwordDetector,
};

/// Mock converter for testing.
struct MockConverter {
    extensions: Vec<&'static str>,
    name: &'static str,
}

impl MockConverter {
    fn new(extensions: Vec<&'static str>, name: &'static str) -> Self {
        Self { extensions, name }
    }

    fn result(&self, content: String) -> Result<ConvertResult> {
        let mut pages = PageSequence::from_text("mock\x0c")?;
        let report = NormalizationDriver::new().run(&mut pages);
        let book = PackagedBook::package(&pages, report.fingerprint, &StopwordDetector::new());
        Ok(ConvertResult {
            content,
            book,
            report,
            source: SourceKind::Text,
            mime_type: "text/plain",
        })
    }
}

impl DocumentConverter for MockConverter {
    fn supported_extensions(&self) -> &[&str] {
        &self.extensions
    }

    fn name(&self) -> &str {
        self.name
    }

    fn convert(&self, _path: &Path, _options: &ConvertOptions) -> Result<ConvertResult> {
        self.result(format!("Converted by {}", self.name))
    }

    fn convert_bytes(&self, _bytes: &[u8], _options: &ConvertOptions) -> Result<ConvertResult> {
        self.result(format!("Converted bytes by {}", self.name))
    }
}

fn running_book(pages: usize) -> String {
    let mut text = String::new();
    for i in 1..=pages {
        text.push_str(&format!(
            "Pride and Prejudice\nChapter text number {i} goes here.\nAnd it is another sentence of the book {i}x.\n{i}\n\x0c"
        ));
    }
    text
}

#[test]
fn test_convert_options_builder() {
    let options = ConvertOptions::new()
        .with_title("Pride and Prejudice")
        .with_images(true)
        .with_format(OutputFormat::Text);

    assert_eq!(options.title, Some("Pride and Prejudice".to_string()));
    assert!(options.load_images);
    assert_eq!(options.output_format, OutputFormat::Text);
}

#[test]
fn test_converter_registry_new() {
    let registry = ConverterRegistry::new();

    // Empty registry should support nothing
    assert!(!registry.supports("txt"));
    assert!(!registry.supports("html"));
}

#[test]
fn test_converter_registry_with_defaults() {
    let registry = ConverterRegistry::with_defaults();

    assert!(registry.supports("txt"));
    assert!(registry.supports("TXT")); // Case insensitive
    assert!(registry.supports("html"));
    assert!(!registry.supports("pdf"));
}

#[test]
fn test_converter_registry_multiple_converters() {
    let mut registry = ConverterRegistry::new();

    registry.register(Arc::new(TextConverter::new()));
    registry.register(Arc::new(MockConverter::new(vec!["djvu"], "djvu")));
    registry.register(Arc::new(MockConverter::new(vec!["rtf", "doc"], "word")));

    assert!(registry.supports("txt"));
    assert!(registry.supports("djvu"));
    assert!(registry.supports("doc"));

    let converter = registry.get_by_name("word");
    assert!(converter.is_some());
    assert!(converter.unwrap().supports_extension("rtf"));

    let result = registry
        .convert_bytes(b"ignored", "djvu", &ConvertOptions::default())
        .unwrap();
    assert_eq!(result.content, "Converted bytes by djvu");
}

#[test]
fn test_supported_extensions() {
    let registry = ConverterRegistry::with_defaults();
    let extensions = registry.supported_extensions();

    assert!(extensions.contains(&"txt"));
    assert!(extensions.contains(&"htm"));
}

#[test]
fn test_html_converter_name() {
    let converter = HtmlConverter::new();
    assert_eq!(converter.name(), "html");
    assert!(converter.supports_extension("html"));
}

#[test]
fn test_output_format_default() {
    assert_eq!(OutputFormat::default(), OutputFormat::Json);
}

#[test]
fn test_registry_convert_missing_file() {
    let registry = ConverterRegistry::with_defaults();
    let result = registry.convert(Path::new("does-not-exist.txt"), &ConvertOptions::default());
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_registry_convert_unknown_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.xyz");
    std::fs::write(&path, "no page breaks in here").unwrap();

    let registry = ConverterRegistry::with_defaults();
    let result = registry.convert(&path, &ConvertOptions::default());
    assert!(matches!(result, Err(Error::UnknownFormat)));
}

#[test]
fn test_registry_convert_bytes_unsupported() {
    let registry = ConverterRegistry::with_defaults();

    let result = registry.convert_bytes(b"test", "xyz", &ConvertOptions::default());
    assert!(result.is_err());
}

#[test]
fn test_convert_text_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Pride_and_Prejudice.txt");
    std::fs::write(&path, running_book(6)).unwrap();

    let options = ConvertOptions::new().with_format(OutputFormat::Text);
    let result = ConverterRegistry::with_defaults().convert(&path, &options).unwrap();

    assert!(result.report.converged);
    assert_eq!(result.report.headers, vec!["Pride and Prejudice".to_string()]);
    assert_eq!(result.book.page_count(), 6);
    assert!(!result.content.contains("Pride and Prejudice"));
    assert!(result
        .content
        .starts_with("Chapter text number 1 goes here.\nAnd it is another sentence of the book 1x."));
    assert_eq!(result.book.language.as_deref(), Some("en"));
}

#[test]
fn test_convert_sniffs_source_without_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.out");
    std::fs::write(&path, "<html><body>One<br/>\n<hr/>\nTwo<br/>\n<hr/>\n</body></html>").unwrap();

    let result = ConverterRegistry::with_defaults()
        .convert(&path, &ConvertOptions::default())
        .unwrap();
    assert_eq!(result.source, SourceKind::Html);
    assert_eq!(result.mime_type, "application/json");
    assert!(result.content.contains("page_1.xhtml"));
}

#[test]
fn test_convert_html_with_images() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("fig.png"), [0x89u8, b'P', b'N', b'G']).unwrap();
    let path = dir.path().join("book.html");
    std::fs::write(
        &path,
        "<html><body>\n<img src=\"fig.png\"/><br/>\n<hr/>\n<img src=\"missing.png\"/><br/>\n<hr/>\n</body></html>",
    )
    .unwrap();

    let options = ConvertOptions::new().with_images(true);
    let result = ConverterRegistry::with_defaults().convert(&path, &options).unwrap();

    assert_eq!(result.book.images.len(), 2);
    assert_eq!(result.book.images[0].size(), 4);
    assert!(!result.book.images[1].is_loaded());
}

#[test]
fn test_batch_shares_cache() {
    let dir = tempfile::tempdir().unwrap();
    let paths: Vec<_> = (0..3)
        .map(|i| {
            let path = dir.path().join(format!("book_{i}.txt"));
            std::fs::write(&path, running_book(4 + i)).unwrap();
            path
        })
        .collect();
    let broken = dir.path().join("broken.txt");
    std::fs::write(&broken, "no breaks").unwrap();

    let mut inputs = paths.clone();
    inputs.push(broken);

    let cache = MetadataCache::new();
    let options = ConvertOptions::new()
        .with_metadata(MetadataResolver::new(Arc::new(NoCatalog)).with_cache(cache.clone()));

    let done = std::sync::atomic::AtomicUsize::new(0);
    let items = convert_batch(&ConverterRegistry::with_defaults(), inputs.as_slice(), &options, |_| {
        done.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    });

    assert_eq!(items.len(), 4);
    assert_eq!(done.into_inner(), 4);
    assert_eq!(items[0].path, paths[0]);
    assert!(items[..3].iter().all(|item| item.result.is_ok()));
    assert!(matches!(items[3].result, Err(Error::MalformedInput(_))));
    assert_eq!(cache.len(), 3);
}
