//! Catalog lookups and the per-run metadata cache.

use super::isbn::{find_isbn, find_isbns};
use crate::error::Result;
use crate::model::{Page, PageSequence};
use crate::normalize::Fingerprint;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Bibliographic record returned by a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMetadata {
    /// Book title
    pub title: Option<String>,

    /// Authors in catalog order
    #[serde(default)]
    pub authors: Vec<String>,

    /// Publisher
    pub publisher: Option<String>,

    /// Year of publication
    pub year: Option<String>,
}

/// External bibliographic service.
///
/// Every method may fail or find nothing; callers treat both as "no
/// information".
pub trait CatalogLookup: Send + Sync {
    /// Record for an ISBN.
    fn metadata(&self, isbn: &str) -> Result<Option<BookMetadata>>;

    /// Best ISBN match for a free-text title.
    fn isbn_from_title(&self, title: &str) -> Result<Option<String>>;

    /// Cover image URL for an ISBN.
    fn cover_url(&self, isbn: &str) -> Result<Option<String>>;
}

/// Catalog that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCatalog;

impl CatalogLookup for NoCatalog {
    fn metadata(&self, _isbn: &str) -> Result<Option<BookMetadata>> {
        Ok(None)
    }

    fn isbn_from_title(&self, _title: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn cover_url(&self, _isbn: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Everything resolved for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMetadata {
    /// Primary ISBN (found in the text, or guessed from the title)
    pub isbn: Option<String>,

    /// All candidate ISBNs, used for cover lookup
    pub isbns: Vec<String>,

    /// Catalog record for the primary ISBN
    pub book: Option<BookMetadata>,

    /// First cover URL found among the candidates
    pub cover_url: Option<String>,
}

/// Thread-safe cache of resolved metadata keyed by document fingerprint.
///
/// Entries are written once: a later insert for a fingerprint already
/// present is ignored. Create one per conversion run and drop it after.
#[derive(Debug, Clone, Default)]
pub struct MetadataCache {
    entries: Arc<Mutex<HashMap<Fingerprint, ResolvedMetadata>>>,
}

impl MetadataCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Fingerprint, ResolvedMetadata>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached entry for a fingerprint.
    pub fn get(&self, fingerprint: Fingerprint) -> Option<ResolvedMetadata> {
        self.lock().get(&fingerprint).cloned()
    }

    /// Store an entry unless one exists. Returns whether it was stored.
    pub fn insert(&self, fingerprint: Fingerprint, metadata: ResolvedMetadata) -> bool {
        let mut entries = self.lock();
        if entries.contains_key(&fingerprint) {
            return false;
        }
        entries.insert(fingerprint, metadata);
        true
    }

    /// Number of cached documents.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Resolves ISBN, catalog record and cover for normalized documents.
#[derive(Clone)]
pub struct MetadataResolver {
    catalog: Arc<dyn CatalogLookup>,
    cache: MetadataCache,
}

impl std::fmt::Debug for MetadataResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataResolver")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl Default for MetadataResolver {
    fn default() -> Self {
        Self::new(Arc::new(NoCatalog))
    }
}

impl MetadataResolver {
    /// Create a resolver with a fresh cache.
    pub fn new(catalog: Arc<dyn CatalogLookup>) -> Self {
        Self {
            catalog,
            cache: MetadataCache::new(),
        }
    }

    /// Share an existing cache.
    pub fn with_cache(mut self, cache: MetadataCache) -> Self {
        self.cache = cache;
        self
    }

    /// The cache in use.
    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    /// Resolve metadata for a normalized document.
    ///
    /// `fingerprint` must be taken after normalization finished. Lookup
    /// failures are logged and leave the corresponding field empty.
    pub fn resolve<P: Page>(
        &self,
        sequence: &PageSequence<P>,
        fingerprint: Fingerprint,
        expected_title: Option<&str>,
    ) -> ResolvedMetadata {
        if let Some(cached) = self.cache.get(fingerprint) {
            log::debug!("Metadata cache hit for {}", fingerprint);
            return cached;
        }

        let texts: Vec<String> = sequence.iter().map(|p| p.cleaned_text_content()).collect();

        let mut isbn = texts.iter().find_map(|t| find_isbn(t));
        let mut isbns: Vec<String> = Vec::new();
        for text in &texts {
            for found in find_isbns(text) {
                if !isbns.contains(&found) {
                    isbns.push(found);
                }
            }
        }

        if let Some(title) = expected_title {
            log::info!("Guessing the ISBN from title: {}", title);
            let guess = self.lookup("isbn_from_title", || self.catalog.isbn_from_title(title));
            if let Some(guess) = guess {
                if !isbns.contains(&guess) {
                    isbns.push(guess.clone());
                }
                isbn.get_or_insert(guess);
            }
        }

        let book = isbn
            .as_deref()
            .and_then(|i| self.lookup("metadata", || self.catalog.metadata(i)));

        let cover_url = isbns
            .iter()
            .find_map(|i| self.lookup("cover_url", || self.catalog.cover_url(i)));

        let resolved = ResolvedMetadata {
            isbn,
            isbns,
            book,
            cover_url,
        };

        self.cache.insert(fingerprint, resolved.clone());
        resolved
    }

    fn lookup<T>(&self, what: &str, call: impl FnOnce() -> Result<Option<T>>) -> Option<T> {
        match call() {
            Ok(found) => found,
            Err(e) => {
                log::warn!("Catalog {} lookup failed: {}", what, e);
                None
            }
        }
    }
}
