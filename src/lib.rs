//! # folio
//!
//! Page normalization for PDF-to-ebook conversion.
//!
//! Text extracted from a PDF carries print artifacts on every page: running
//! headers, running footers and page numbers. This library loads extracted
//! pages (form-feed delimited text or `<hr>` separated HTML), removes those
//! artifacts with document-wide detectors iterated to a fixed point, and
//! packages the cleaned pages with their metadata for an ebook writer.
//!
//! ## Quick Start
//!
//! ```no_run
//! use folio::{parse_text, NormalizationDriver, Page};
//!
//! fn main() -> folio::Result<()> {
//!     let text = std::fs::read_to_string("book.txt")?;
//!     let mut pages = parse_text(&text)?;
//!
//!     let report = NormalizationDriver::new().run(&mut pages);
//!     println!("{} passes, header {:?}", report.iterations, report.headers);
//!
//!     for page in pages.iter() {
//!         println!("{}", page.cleaned_text_content());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Two front ends**: pdftotext output and pdftohtml / pdf2htmlEX output
//! - **Fixed-point cleanup**: header, footer and page-number removal until
//!   the document fingerprint stops changing
//! - **Fuzzy matching**: Unicode-normalized similarity for headers and footers
//! - **Metadata**: ISBN discovery, expected title and pluggable catalog lookups
//! - **Parallel batches**: Uses Rayon across independent documents

pub mod convert;
pub mod detect;
pub mod error;
pub mod lang;
pub mod metadata;
pub mod model;
pub mod normalize;
pub mod render;

// Re-export commonly used types
pub use convert::{
    ConvertOptions, ConvertResult, ConverterRegistry, DocumentConverter, HtmlConverter,
    OutputFormat, TextConverter,
};
pub use detect::{detect_source_from_bytes, detect_source_from_path, SourceKind};
pub use error::{Error, Result};
pub use lang::{LanguageDetector, StopwordDetector};
pub use metadata::{
    BookMetadata, CatalogLookup, MetadataCache, MetadataResolver, NoCatalog, ResolvedMetadata,
};
pub use model::{
    DetectionConfig, HtmlPage, Page, PageImage, PageNumberPosition, PageSequence, TextDocument,
    TextPage,
};
pub use normalize::{
    ContentHasher, Fingerprint, NormalizationDriver, NormalizeOptions, NormalizeReport,
};
pub use render::{JsonFormat, PackagedBook, PackagedPage};

use std::path::Path;
use std::sync::Arc;

/// Split a form-feed delimited text blob into linked pages.
///
/// # Example
///
/// ```
/// use folio::{parse_text, Page};
///
/// let pages = parse_text("first\x0csecond\x0c").unwrap();
/// assert_eq!(pages.len(), 2);
/// assert_eq!(pages[1].cleaned_text_content(), "second");
/// ```
pub fn parse_text(text: &str) -> Result<PageSequence<TextPage>> {
    PageSequence::from_text(text)
}

/// Split an HTML document on its `<hr>` page breaks.
pub fn parse_html(html: &str) -> Result<PageSequence<HtmlPage>> {
    PageSequence::from_html_document(html)
}

/// Parse and normalize a text blob with default options.
///
/// # Example
///
/// ```
/// use folio::normalize_text;
///
/// let (pages, report) = normalize_text("one\x0ctwo\x0cthree\x0c").unwrap();
/// assert!(report.converged);
/// assert_eq!(pages.len(), 3);
/// ```
pub fn normalize_text(text: &str) -> Result<(PageSequence<TextPage>, NormalizeReport)> {
    let mut pages = parse_text(text)?;
    let report = NormalizationDriver::new().run(&mut pages);
    Ok((pages, report))
}

/// Parse and normalize an HTML document with default options.
pub fn normalize_html(html: &str) -> Result<(PageSequence<HtmlPage>, NormalizeReport)> {
    let mut pages = parse_html(html)?;
    let report = NormalizationDriver::new().run(&mut pages);
    Ok((pages, report))
}

/// Convert a file to a packaged book with default options.
///
/// # Example
///
/// ```no_run
/// use folio::convert_file;
///
/// let result = convert_file("book.txt").unwrap();
/// println!("{} pages", result.book.page_count());
/// ```
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<ConvertResult> {
    ConverterRegistry::with_defaults().convert(path.as_ref(), &ConvertOptions::default())
}

/// Convert a file to cleaned plain text.
pub fn to_text<P: AsRef<Path>>(path: P) -> Result<String> {
    Folio::new().with_format(OutputFormat::Text).convert(path).map(|r| r.content)
}

/// Convert a file to a JSON packaged book.
///
/// # Example
///
/// ```no_run
/// use folio::{to_json, JsonFormat};
///
/// let json = to_json("book.html", JsonFormat::Pretty).unwrap();
/// std::fs::write("book.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    Folio::new()
        .with_format(OutputFormat::Json)
        .with_json_format(format)
        .convert(path)
        .map(|r| r.content)
}

/// Builder for converting extracted documents.
///
/// # Example
///
/// ```no_run
/// use folio::{Folio, OutputFormat};
///
/// let result = Folio::new()
///     .with_title("Moby Dick")
///     .with_max_iterations(10)
///     .with_format(OutputFormat::Xhtml)
///     .force_html()
///     .convert("moby_dick.out")?;
/// println!("{}", result.content);
/// # Ok::<(), folio::Error>(())
/// ```
pub struct Folio {
    options: ConvertOptions,
    registry: ConverterRegistry,
}

impl Folio {
    /// Create a new Folio builder.
    pub fn new() -> Self {
        Self {
            options: ConvertOptions::default(),
            registry: ConverterRegistry::with_defaults(),
        }
    }

    /// Set an explicit title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.options = self.options.with_title(title);
        self
    }

    /// Set the normalization iteration cap.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.options.normalize = self.options.normalize.with_max_iterations(max);
        self
    }

    /// Set detection thresholds.
    pub fn with_detection(mut self, detection: DetectionConfig) -> Self {
        self.options.normalize = self.options.normalize.with_detection(detection);
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.options = self.options.with_format(format);
        self
    }

    /// Set the JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.options = self.options.with_json_format(format);
        self
    }

    /// Treat the input as form-feed delimited text.
    pub fn force_text(mut self) -> Self {
        self.options = self.options.with_source(SourceKind::Text);
        self
    }

    /// Treat the input as `<hr>` separated HTML.
    pub fn force_html(mut self) -> Self {
        self.options = self.options.with_source(SourceKind::Html);
        self
    }

    /// Read referenced image bytes.
    pub fn with_images(mut self, load: bool) -> Self {
        self.options = self.options.with_images(load);
        self
    }

    /// Use a catalog for metadata lookups, keeping the current cache.
    pub fn with_catalog(mut self, catalog: Arc<dyn CatalogLookup>) -> Self {
        let cache = self.options.metadata.cache().clone();
        self.options.metadata = MetadataResolver::new(catalog).with_cache(cache);
        self
    }

    /// Share a metadata cache with other conversions in the same run.
    pub fn with_cache(mut self, cache: MetadataCache) -> Self {
        self.options.metadata = self.options.metadata.with_cache(cache);
        self
    }

    /// Use a custom language detector.
    pub fn with_language_detector(mut self, detector: Arc<dyn LanguageDetector>) -> Self {
        self.options = self.options.with_language_detector(detector);
        self
    }

    /// Register an additional converter.
    pub fn with_converter(mut self, converter: Arc<dyn DocumentConverter>) -> Self {
        self.registry.register(converter);
        self
    }

    /// Options that will be used for conversion.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert a file.
    pub fn convert<P: AsRef<Path>>(&self, path: P) -> Result<ConvertResult> {
        self.registry.convert(path.as_ref(), &self.options)
    }

    /// Convert bytes, picking the converter by extension.
    pub fn convert_bytes(&self, data: &[u8], ext: &str) -> Result<ConvertResult> {
        self.registry.convert_bytes(data, ext, &self.options)
    }

    /// Convert many files in parallel, sharing the metadata cache.
    pub fn convert_batch<P, F>(&self, paths: &[P], on_done: F) -> Vec<convert::BatchItem>
    where
        P: AsRef<Path> + Sync,
        F: Fn(&Path) + Sync,
    {
        convert::convert_batch(&self.registry, paths, &self.options, on_done)
    }
}

impl Default for Folio {
    fn default() -> Self {
        Self::new()
    }
}
