//! Error types for folio library.

use std::io;
use thiserror::Error;

/// Result type alias for folio operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading and normalizing pages.
///
/// Only malformed input is a hard failure of the normalization core.
/// Inconclusive detection, language detection and catalog lookups degrade
/// to "no information" instead of surfacing here.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source could not be segmented into pages.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// The source format is not recognized as page-delimited text or HTML.
    #[error("Unknown source format")]
    UnknownFormat,

    /// Error during rendering (JSON, text, XHTML).
    #[error("Rendering error: {0}")]
    Render(String),

    /// A catalog or identifier lookup failed.
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
