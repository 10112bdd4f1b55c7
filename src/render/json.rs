//! JSON rendering for packaged books.

use super::PackagedBook;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a packaged book to JSON.
pub fn to_json(book: &PackagedBook, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(book),
        JsonFormat::Compact => serde_json::to_string(book),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
