//! Packaged book handed to ebook writers.

use super::BookStats;
use crate::lang::LanguageDetector;
use crate::metadata::ResolvedMetadata;
use crate::model::{Page, PageImage, PageSequence};
use crate::normalize::Fingerprint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One page of a packaged book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagedPage {
    /// Index of the source page
    pub index: usize,

    /// File name inside the package (`page_{index}.xhtml`)
    pub file_name: String,

    /// Navigation title (`title_{index}`)
    pub title: String,

    /// Language detected on the page
    pub lang: Option<String>,

    /// Markup body of the page
    pub content: String,

    /// Cleaned plain text of the page
    pub text: String,
}

impl PackagedPage {
    /// Package one normalized page.
    pub fn from_page<P: Page>(page: &P, detector: &dyn LanguageDetector) -> Self {
        let index = page.index();
        Self {
            index,
            file_name: format!("page_{}.xhtml", index),
            title: format!("title_{}", index),
            lang: page.lang_with(detector),
            content: page.markup_content(),
            text: page.cleaned_text_content(),
        }
    }
}

/// A normalized document with its resolved metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagedBook {
    /// Book title
    pub title: Option<String>,

    /// Authors
    pub authors: Vec<String>,

    /// Publisher
    pub publisher: Option<String>,

    /// Year of publication
    pub year: Option<String>,

    /// Primary ISBN
    pub isbn: Option<String>,

    /// Cover image URL
    pub cover_url: Option<String>,

    /// Most frequent page language
    pub language: Option<String>,

    /// Fingerprint of the normalized content
    pub fingerprint: Fingerprint,

    /// Packaging time
    pub modified: DateTime<Utc>,

    /// Pages with content, in document order
    pub pages: Vec<PackagedPage>,

    /// Images referenced by the kept pages
    pub images: Vec<PageImage>,

    /// Packaging statistics
    pub stats: BookStats,
}

impl PackagedBook {
    /// Package a normalized sequence.
    ///
    /// Pages left without text or images are omitted.
    pub fn package<P: Page>(
        sequence: &PageSequence<P>,
        fingerprint: Fingerprint,
        detector: &dyn LanguageDetector,
    ) -> Self {
        let mut pages = Vec::with_capacity(sequence.len());
        let mut images = Vec::new();
        let mut stats = BookStats::new();

        for page in sequence.iter() {
            if page.is_empty() {
                log::debug!("Omitting empty page {}", page.index());
                stats.omit_page();
                continue;
            }
            let page_images = page.images();
            let packaged = PackagedPage::from_page(page, detector);
            stats.add_page(&packaged.text, page_images.len());
            images.extend(page_images);
            pages.push(packaged);
        }

        Self {
            title: None,
            authors: Vec::new(),
            publisher: None,
            year: None,
            isbn: None,
            cover_url: None,
            language: sequence.dominant_lang(detector),
            fingerprint,
            modified: Utc::now(),
            pages,
            images,
            stats,
        }
    }

    /// Fill bibliographic fields from resolved metadata.
    ///
    /// A title already set is kept.
    pub fn with_metadata(mut self, metadata: &ResolvedMetadata) -> Self {
        self.isbn = metadata.isbn.clone();
        self.cover_url = metadata.cover_url.clone();
        if let Some(book) = &metadata.book {
            if self.title.is_none() {
                self.title = book.title.clone();
            }
            self.authors = book.authors.clone();
            self.publisher = book.publisher.clone();
            self.year = book.year.clone();
        }
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Number of packaged pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Title for display, falling back to "Untitled".
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }
}
