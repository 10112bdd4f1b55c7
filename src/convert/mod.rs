//! Document converter module providing a plugin architecture for source formats.
//!
//! A converter loads one kind of extracted source into a page sequence,
//! normalizes it, resolves metadata and packages the result. Converters are
//! registered by file extension and dispatched by the [`ConverterRegistry`].
//!
//! # Example
//!
//! ```no_run
//! use folio::convert::{ConverterRegistry, ConvertOptions, TextConverter};
//! use std::sync::Arc;
//! use std::path::Path;
//!
//! fn main() -> folio::Result<()> {
//!     let mut registry = ConverterRegistry::new();
//!     registry.register(Arc::new(TextConverter::new()));
//!
//!     let result = registry.convert(Path::new("book.txt"), &ConvertOptions::default())?;
//!     println!("{}", result.content);
//!     Ok(())
//! }
//! ```

mod batch;
mod html;
mod pipeline;
mod text;

pub use batch::{convert_batch, BatchItem};
pub use html::HtmlConverter;
pub use text::TextConverter;

use crate::detect::{detect_source_from_path, SourceKind};
use crate::error::{Error, Result};
use crate::lang::{LanguageDetector, StopwordDetector};
use crate::metadata::MetadataResolver;
use crate::normalize::{NormalizeOptions, NormalizeReport};
use crate::render::{JsonFormat, PackagedBook};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Options for document conversion.
#[derive(Clone)]
pub struct ConvertOptions {
    /// Normalization options
    pub normalize: NormalizeOptions,

    /// Explicit title; wins over any guessed or catalog title
    pub title: Option<String>,

    /// Output format
    pub output_format: OutputFormat,

    /// JSON layout when the output format is JSON
    pub json_format: JsonFormat,

    /// Force the source kind instead of detecting it
    pub source: Option<SourceKind>,

    /// Read the bytes of referenced images
    pub load_images: bool,

    /// Metadata resolver (catalog + per-run cache)
    pub metadata: MetadataResolver,

    /// Language detector for pages and the document
    pub language: Arc<dyn LanguageDetector>,
}

impl std::fmt::Debug for ConvertOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConvertOptions")
            .field("normalize", &self.normalize)
            .field("title", &self.title)
            .field("output_format", &self.output_format)
            .field("json_format", &self.json_format)
            .field("source", &self.source)
            .field("load_images", &self.load_images)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            normalize: NormalizeOptions::default(),
            title: None,
            output_format: OutputFormat::default(),
            json_format: JsonFormat::default(),
            source: None,
            load_images: false,
            metadata: MetadataResolver::default(),
            language: Arc::new(StopwordDetector::new()),
        }
    }
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set normalization options.
    pub fn with_normalize_options(mut self, options: NormalizeOptions) -> Self {
        self.normalize = options;
        self
    }

    /// Set an explicit title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set the JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Force the source kind.
    pub fn with_source(mut self, source: SourceKind) -> Self {
        self.source = Some(source);
        self
    }

    /// Read image bytes while packaging.
    pub fn with_images(mut self, load: bool) -> Self {
        self.load_images = load;
        self
    }

    /// Set the metadata resolver.
    pub fn with_metadata(mut self, resolver: MetadataResolver) -> Self {
        self.metadata = resolver;
        self
    }

    /// Set the language detector.
    pub fn with_language_detector(mut self, detector: Arc<dyn LanguageDetector>) -> Self {
        self.language = detector;
        self
    }
}

/// Output format for conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Packaged book as JSON
    #[default]
    Json,

    /// Plain text
    Text,

    /// Single XHTML document
    Xhtml,
}

impl OutputFormat {
    /// MIME type of the rendered content.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Text => "text/plain",
            OutputFormat::Xhtml => "application/xhtml+xml",
        }
    }

    /// Conventional file extension of the rendered content.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "txt",
            OutputFormat::Xhtml => "xhtml",
        }
    }
}

/// Result of document conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Rendered content
    pub content: String,

    /// Packaged book the content was rendered from
    pub book: PackagedBook,

    /// Normalization outcome
    pub report: NormalizeReport,

    /// Kind of source the book was loaded from
    pub source: SourceKind,

    /// MIME type of the output
    pub mime_type: &'static str,
}

impl ConvertResult {
    /// Get content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Trait for document converters.
///
/// Implement this trait to add support for a new source format.
pub trait DocumentConverter: Send + Sync {
    /// Get the supported file extensions for this converter.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["txt"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this converter.
    fn name(&self) -> &str;

    /// Convert a file at the given path.
    fn convert(&self, path: &Path, options: &ConvertOptions) -> Result<ConvertResult>;

    /// Convert from bytes.
    fn convert_bytes(&self, bytes: &[u8], options: &ConvertOptions) -> Result<ConvertResult>;

    /// Check if this converter supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry for document converters.
///
/// The registry maps file extensions to converters and provides
/// convenient methods for converting documents.
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn DocumentConverter>>,
    by_name: HashMap<String, Arc<dyn DocumentConverter>>,
}

impl ConverterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with default converters (text, HTML).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(TextConverter::new()));
        registry.register(Arc::new(HtmlConverter::new()));
        registry
    }

    /// Register a converter.
    ///
    /// The converter will be registered for all its supported extensions.
    pub fn register(&mut self, converter: Arc<dyn DocumentConverter>) {
        for ext in converter.supported_extensions() {
            self.converters.insert(ext.to_lowercase(), converter.clone());
        }
        self.by_name.insert(converter.name().to_lowercase(), converter);
    }

    /// Get a converter by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.converters.get(&ext.to_lowercase()).cloned()
    }

    /// Get a converter by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Get the converter for a source kind.
    pub fn get_by_source(&self, source: SourceKind) -> Option<Arc<dyn DocumentConverter>> {
        self.get_by_name(&source.to_string())
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.converters.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions.
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.converters.keys().map(|s| s.as_str()).collect()
    }

    /// Convert a file using the appropriate converter.
    ///
    /// A forced source kind wins, then the file extension; files with an
    /// unknown extension are sniffed.
    pub fn convert(&self, path: &Path, options: &ConvertOptions) -> Result<ConvertResult> {
        let converter = self.resolve(path, options)?;
        log::info!("Converting {} with {} converter", path.display(), converter.name());
        converter.convert(path, options)
    }

    /// Convert bytes using the specified extension to determine the converter.
    pub fn convert_bytes(
        &self,
        bytes: &[u8],
        ext: &str,
        options: &ConvertOptions,
    ) -> Result<ConvertResult> {
        let converter = match options.source {
            Some(source) => self.get_by_source(source),
            None => self.get_by_extension(ext),
        }
        .ok_or_else(|| Error::Other(format!("No converter for extension: {}", ext)))?;

        converter.convert_bytes(bytes, options)
    }

    fn resolve(&self, path: &Path, options: &ConvertOptions) -> Result<Arc<dyn DocumentConverter>> {
        if let Some(source) = options.source {
            return self
                .get_by_source(source)
                .ok_or_else(|| Error::Other(format!("No converter for source: {}", source)));
        }

        if let Some(converter) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| self.get_by_extension(ext))
        {
            return Ok(converter);
        }

        let source = detect_source_from_path(path)?;
        self.get_by_source(source)
            .ok_or_else(|| Error::Other(format!("No converter for source: {}", source)))
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
