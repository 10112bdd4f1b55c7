//! XHTML rendering for packaged books.

use super::{PackagedBook, PackagedPage};
use crate::model::escape_html;
use std::fmt::Write;

const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

fn open_document(out: &mut String, title: &str, lang: Option<&str>) {
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str("<!DOCTYPE html>\n");
    match lang {
        Some(lang) => {
            let _ = writeln!(out, "<html xmlns=\"{XHTML_NS}\" xml:lang=\"{lang}\" lang=\"{lang}\">");
        }
        None => {
            let _ = writeln!(out, "<html xmlns=\"{XHTML_NS}\">");
        }
    }
    let _ = writeln!(out, "<head>\n<title>{}</title>\n</head>\n<body>", escape_html(title));
}

/// Standalone XHTML file for one packaged page.
pub fn page_to_xhtml(page: &PackagedPage, fallback_lang: Option<&str>) -> String {
    let mut out = String::new();
    let lang = page.lang.as_deref().or(fallback_lang);
    open_document(&mut out, &page.title, lang);
    out.push_str(&page.content);
    out.push_str("\n</body>\n</html>\n");
    out
}

/// Whole book as a single XHTML document, one section per page.
pub fn to_xhtml(book: &PackagedBook) -> String {
    let mut out = String::new();
    open_document(&mut out, book.display_title(), book.language.as_deref());

    for page in &book.pages {
        let _ = writeln!(out, "<section id=\"{}\">", page.title);
        out.push_str(&page.content);
        out.push_str("\n</section>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::StopwordDetector;
    use crate::model::{PageSequence, TextPage};
    use crate::normalize::Fingerprint;

    fn book() -> PackagedBook {
        let seq = PageSequence::<TextPage>::from_text(
            "This is the first page and it is in English\x0cthe second <page> of the book\x0c",
        )
        .unwrap();
        PackagedBook::package(&seq, Fingerprint(0), &StopwordDetector::new()).with_title("A & B")
    }

    #[test]
    fn test_to_xhtml() {
        let xhtml = to_xhtml(&book());
        assert!(xhtml.contains("<title>A &amp; B</title>"));
        assert!(xhtml.contains("xml:lang=\"en\""));
        assert!(xhtml.contains("<section id=\"title_1\">"));
        assert!(xhtml.contains("&lt;page&gt;"));
        assert!(xhtml.ends_with("</html>\n"));
    }

    #[test]
    fn test_page_to_xhtml() {
        let book = book();
        let page = page_to_xhtml(&book.pages[0], Some("fr"));
        assert!(page.contains("<title>title_0</title>"));
        assert!(page.contains("lang=\"en\""));
        assert!(page.contains("<p>This is the first page and it is in English</p>"));
    }
}
