//! Integration tests for metadata resolution.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use folio::error::{Error, Result};
use folio::metadata::{expected_title, find_isbn, find_isbns, is_valid_isbn};
use folio::{BookMetadata, CatalogLookup, Fingerprint, Folio, MetadataCache, MetadataResolver};
use folio::{parse_text, OutputFormat};

const GUESSED_ISBN: &str = "9780142437247";
const PRINTED_ISBN: &str = "978-1-86197-876-9";

/// Catalog that knows one title and records every call.
#[derive(Default)]
struct MockCatalog {
    calls: Mutex<Vec<String>>,
}

impl MockCatalog {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CatalogLookup for MockCatalog {
    fn metadata(&self, isbn: &str) -> Result<Option<BookMetadata>> {
        self.record(format!("metadata:{isbn}"));
        Ok(Some(BookMetadata {
            title: Some("Moby-Dick; or, The Whale".to_string()),
            authors: vec!["Herman Melville".to_string()],
            publisher: Some("Penguin Classics".to_string()),
            year: Some("2003".to_string()),
        }))
    }

    fn isbn_from_title(&self, title: &str) -> Result<Option<String>> {
        self.record(format!("isbn_from_title:{title}"));
        Ok(title.starts_with("moby dick").then(|| GUESSED_ISBN.to_string()))
    }

    fn cover_url(&self, isbn: &str) -> Result<Option<String>> {
        self.record(format!("cover_url:{isbn}"));
        Ok(Some(format!("https://covers.example.org/{isbn}.jpg")))
    }
}

struct FailingCatalog;

impl CatalogLookup for FailingCatalog {
    fn metadata(&self, _isbn: &str) -> Result<Option<BookMetadata>> {
        Err(Error::Lookup("connection refused".to_string()))
    }

    fn isbn_from_title(&self, _title: &str) -> Result<Option<String>> {
        Err(Error::Lookup("connection refused".to_string()))
    }

    fn cover_url(&self, _isbn: &str) -> Result<Option<String>> {
        Err(Error::Lookup("connection refused".to_string()))
    }
}

fn moby_pages(extra: &str) -> String {
    [
        "Moby Dick\nor, the Whale\nby Herman Melville",
        "Call me Ishmael. It is a way I have of driving off the spleen.",
        "There is now your insular city of the Manhattoes, belted round by wharves.",
        extra,
    ]
    .join("\x0c")
        + "\x0c"
}

fn write_book(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_catalog_record_from_guessed_title() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_book(&dir, "Moby_Dick.txt", &moby_pages("And the whale went down."));

    let catalog = Arc::new(MockCatalog::default());
    let result = Folio::new().with_catalog(catalog.clone()).convert(&path).unwrap();
    let book = &result.book;

    assert_eq!(book.isbn.as_deref(), Some(GUESSED_ISBN));
    assert_eq!(book.title.as_deref(), Some("Moby-Dick; or, The Whale"));
    assert_eq!(book.authors, vec!["Herman Melville".to_string()]);
    assert_eq!(book.publisher.as_deref(), Some("Penguin Classics"));
    assert_eq!(
        book.cover_url.as_deref(),
        Some("https://covers.example.org/9780142437247.jpg")
    );
    assert_eq!(
        catalog.calls()[0],
        "isbn_from_title:moby dick\nor, the whale".to_string()
    );
    assert!(result.content.contains("\"Herman Melville\""));
}

#[test]
fn test_printed_isbn_wins_over_title_guess() {
    let dir = tempfile::tempdir().unwrap();
    let extra = format!("Copyright page.\nISBN {PRINTED_ISBN}");
    let path = write_book(&dir, "Moby_Dick.txt", &moby_pages(&extra));

    let catalog = Arc::new(MockCatalog::default());
    let result = Folio::new().with_catalog(catalog.clone()).convert(&path).unwrap();

    assert_eq!(result.book.isbn.as_deref(), Some(PRINTED_ISBN));
    assert!(catalog.calls().contains(&format!("metadata:{PRINTED_ISBN}")));
    assert!(catalog.calls().contains(&format!("cover_url:{PRINTED_ISBN}")));
}

#[test]
fn test_resolver_collects_candidate_isbns() {
    let pages = parse_text(&moby_pages(&format!("ISBN {PRINTED_ISBN}\nalso 0-306-40615-2"))).unwrap();
    let resolver = MetadataResolver::new(Arc::new(MockCatalog::default()));

    let resolved = resolver.resolve(&pages, Fingerprint(42), Some("moby dick"));

    assert_eq!(resolved.isbn.as_deref(), Some(PRINTED_ISBN));
    assert_eq!(
        resolved.isbns,
        vec![
            PRINTED_ISBN.to_string(),
            "0-306-40615-2".to_string(),
            GUESSED_ISBN.to_string(),
        ]
    );
}

#[test]
fn test_cache_avoids_repeat_lookups() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_book(&dir, "Moby_Dick.txt", &moby_pages("And the whale went down."));

    let catalog = Arc::new(MockCatalog::default());
    let cache = MetadataCache::new();
    let folio = Folio::new()
        .with_format(OutputFormat::Text)
        .with_cache(cache.clone())
        .with_catalog(catalog.clone());

    let first = folio.convert(&path).unwrap();
    let calls = catalog.calls().len();
    let second = folio.convert(&path).unwrap();

    assert_eq!(catalog.calls().len(), calls);
    assert_eq!(first.book.fingerprint, second.book.fingerprint);
    assert_eq!(second.book.isbn.as_deref(), Some(GUESSED_ISBN));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_failing_catalog_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_book(&dir, "Moby_Dick.txt", &moby_pages("And the whale went down."));

    let result = Folio::new()
        .with_catalog(Arc::new(FailingCatalog))
        .convert(&path)
        .unwrap();

    assert_eq!(result.book.isbn, None);
    assert_eq!(result.book.cover_url, None);
    assert_eq!(result.book.title.as_deref(), Some("moby dick\nor, the whale"));
}

#[test]
fn test_explicit_title_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_book(&dir, "Moby_Dick.txt", &moby_pages("And the whale went down."));

    let catalog = Arc::new(MockCatalog::default());
    let result = Folio::new()
        .with_title("The Whale")
        .with_catalog(catalog.clone())
        .convert(&path)
        .unwrap();

    assert_eq!(result.book.title.as_deref(), Some("The Whale"));
    assert_eq!(result.book.isbn, None);
    assert_eq!(catalog.calls()[0], "isbn_from_title:The Whale".to_string());
}

#[test]
fn test_unrelated_file_name_gives_no_title() {
    assert_eq!(
        expected_title("Moby_Dick", "Moby Dick\nby Herman Melville"),
        Some("moby dick".to_string())
    );
    assert_eq!(
        expected_title("quarterly_report_2023", "Moby Dick\nby Herman Melville"),
        None
    );
    assert_eq!(expected_title("Moby_Dick", "Moby Dick\nChapter 1"), None);
}

#[test]
fn test_isbn_discovery() {
    assert!(is_valid_isbn("0-8044-2957-X"));
    assert_eq!(
        find_isbn("Printed in 1851. ISBN 0-8044-2957-X"),
        Some("0-8044-2957-X".to_string())
    );
    assert_eq!(find_isbn("Call 555-123-4567 for details"), None);
    assert_eq!(
        find_isbns("ISBN 9780142437247 (pbk), 978-0-14-243724-7 (ebook)"),
        vec![GUESSED_ISBN.to_string()]
    );
}
