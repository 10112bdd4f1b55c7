//! Plain text rendering for packaged books.

use super::PackagedBook;

/// Convert a packaged book to plain text, one blank line between pages.
pub fn to_text(book: &PackagedBook) -> String {
    book.pages
        .iter()
        .map(|p| p.text.as_str())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::StopwordDetector;
    use crate::model::{PageSequence, TextPage};
    use crate::normalize::Fingerprint;

    #[test]
    fn test_to_text() {
        let seq = PageSequence::<TextPage>::from_text("Hello, world!\x0c\x0cSecond page.\x0c").unwrap();
        let book = PackagedBook::package(&seq, Fingerprint(0), &StopwordDetector::new());

        assert_eq!(to_text(&book), "Hello, world!\n\nSecond page.");
    }
}
