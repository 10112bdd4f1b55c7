//! Statistics collected while packaging a book.

use serde::{Deserialize, Serialize};

/// Counts gathered while packaging pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookStats {
    /// Pages in the source document
    pub source_pages: u32,

    /// Pages kept in the packaged book
    pub page_count: u32,

    /// Pages omitted because nothing was left on them
    pub omitted_pages: u32,

    /// Images referenced by kept pages
    pub image_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl BookStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a kept page and its text.
    pub fn add_page(&mut self, text: &str, images: usize) {
        self.source_pages += 1;
        self.page_count += 1;
        self.image_count += images as u32;
        self.count_text(text);
    }

    /// Record an omitted page.
    pub fn omit_page(&mut self) {
        self.source_pages += 1;
        self.omitted_pages += 1;
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &BookStats) {
        self.source_pages += other.source_pages;
        self.page_count += other.page_count;
        self.omitted_pages += other.omitted_pages;
        self.image_count += other.image_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_text() {
        let mut stats = BookStats::new();
        stats.count_text("Hello, world! This is a test.");

        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.char_count, 24);
    }

    #[test]
    fn test_pages_and_merge() {
        let mut a = BookStats::new();
        a.add_page("one two", 1);
        a.omit_page();

        let mut b = BookStats::new();
        b.add_page("three", 0);

        a.merge(&b);
        assert_eq!(a.source_pages, 3);
        assert_eq!(a.page_count, 2);
        assert_eq!(a.omitted_pages, 1);
        assert_eq!(a.image_count, 1);
        assert_eq!(a.word_count, 3);
    }
}
