//! Best-guess title from the file name and the first page.

use crate::normalize::similarity::similarity_ratio;
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static BY_CLAUSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[- ]by[-: ].*").unwrap());

/// Minimum similarity between the file-name title and the content title.
pub const TITLE_SIMILARITY: f64 = 0.4;

/// Title implied by a file stem: underscores become spaces, lower-cased,
/// with any trailing "by ..." clause dropped.
pub fn title_from_file_stem(stem: &str) -> String {
    let title = stem.replace('_', " ").to_lowercase();
    BY_CLAUSE.replace(&title, "").trim().to_string()
}

/// Title implied by the first page: everything before the last line that
/// starts a "by" credit, NFKD-normalized and lower-cased.
pub fn title_from_first_page(cleaned: &str) -> Option<String> {
    let lowered = cleaned.to_lowercase();
    let lines: Vec<&str> = lowered.split('\n').collect();
    let by_line = lines
        .iter()
        .rposition(|l| *l == "by" || l.starts_with("by:") || l.starts_with("by "))?;

    let title: String = lines[..by_line].join("\n").trim().nfkd().collect();
    log::debug!("Title guessed from page content: {:?}", title);
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Title of the content when it agrees with the file name.
///
/// Returns the first-page title if its similarity with the file-name title
/// exceeds [`TITLE_SIMILARITY`].
pub fn expected_title(file_stem: &str, first_page_cleaned: &str) -> Option<String> {
    let file_title = title_from_file_stem(file_stem);
    let content_title = title_from_first_page(first_page_cleaned)?;

    if similarity_ratio(&file_title, &content_title) > TITLE_SIMILARITY {
        log::debug!("File name and content title agree: {:?}", content_title);
        Some(content_title)
    } else {
        None
    }
}
