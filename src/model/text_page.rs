//! Pages backed by form-feed delimited plain text.

use super::page::{
    content_bounds, footer_cut, header_cut, page_number_edit, Page, PageNumberEdit,
    PageNumberPosition,
};
use std::ops::Range;
use std::sync::Arc;

/// Page-break sentinel emitted by text extractors between pages.
pub const PAGE_BREAK: char = '\x0c';

/// A form-feed delimited document shared by all of its pages.
///
/// Segment start offsets are computed once, so cloning is two reference
/// count bumps and slicing a page is a lookup.
#[derive(Debug, Clone)]
pub struct TextDocument {
    text: Arc<str>,
    starts: Arc<[usize]>,
}

impl TextDocument {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        let text: Arc<str> = text.into();
        let starts: Vec<usize> = std::iter::once(0)
            .chain(text.match_indices(PAGE_BREAK).map(|(i, _)| i + PAGE_BREAK.len_utf8()))
            .collect();
        Self {
            text,
            starts: starts.into(),
        }
    }

    /// Number of form-feed delimited segments, including a trailing empty one.
    pub fn segment_count(&self) -> usize {
        self.starts.len()
    }

    /// Byte range covering segments `first..last`, without the form feed
    /// that ends the last of them.
    fn range(&self, first: usize, last: usize) -> Range<usize> {
        let last = last.min(self.starts.len());
        if first >= last {
            return 0..0;
        }
        let end = match self.starts.get(last) {
            Some(next) => next - PAGE_BREAK.len_utf8(),
            None => self.text.len(),
        };
        self.starts[first]..end
    }

    /// Text of segments `first..last`, joined by newlines.
    fn segments(&self, first: usize, last: usize) -> String {
        self.text[self.range(first, last)].replace(PAGE_BREAK, "\n")
    }
}

impl From<&str> for TextDocument {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for TextDocument {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<Arc<str>> for TextDocument {
    fn from(text: Arc<str>) -> Self {
        Self::new(text)
    }
}

#[derive(Debug, Clone)]
enum TextContent {
    /// The whole document; the page owns the segments from its index up to
    /// the next page's index.
    Shared(TextDocument),
    /// The page's own text, once it has been edited.
    Owned(String),
}

/// A page whose content is a slice of a form-feed delimited text blob.
#[derive(Debug, Clone)]
pub struct TextPage {
    index: usize,
    next_index: Option<usize>,
    content: TextContent,
    position: PageNumberPosition,
}

impl TextPage {
    /// Create a page over a whole document; the page owns segment `index`
    /// up to the next page's index (or the end of the document).
    pub fn new(index: usize, document: impl Into<TextDocument>) -> Self {
        Self {
            index,
            next_index: None,
            content: TextContent::Shared(document.into()),
            position: PageNumberPosition::Unknown,
        }
    }

    /// Create a page that owns exactly `text`.
    pub fn with_text(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            next_index: None,
            content: TextContent::Owned(text.into()),
            position: PageNumberPosition::Unknown,
        }
    }

    /// Whether the page still reads from the shared document.
    pub fn is_shared(&self) -> bool {
        matches!(self.content, TextContent::Shared(_))
    }

    fn lines(&self) -> Vec<String> {
        self.text_content().split('\n').map(String::from).collect()
    }

    fn set_lines(&mut self, lines: &[String]) {
        self.content = TextContent::Owned(lines.join("\n"));
    }
}

impl Page for TextPage {
    fn index(&self) -> usize {
        self.index
    }

    fn next_page_index(&self) -> Option<usize> {
        self.next_index
    }

    fn set_next_page_index(&mut self, next: Option<usize>) {
        self.next_index = next;
    }

    fn text_content(&self) -> String {
        match &self.content {
            TextContent::Owned(text) => text.clone(),
            TextContent::Shared(document) => {
                let last = self.next_index.unwrap_or(document.segment_count());
                document.segments(self.index, last)
            }
        }
    }

    fn raw_content(&self) -> String {
        self.text_content()
    }

    fn markup_content(&self) -> String {
        self.cleaned_text_content()
            .split("\n\n")
            .filter(|para| !para.trim().is_empty())
            .map(|para| format!("<p>{}</p>", escape_html(para)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn page_number_position(&self) -> PageNumberPosition {
        self.position
    }

    fn set_page_number_position(&mut self, position: PageNumberPosition) {
        self.position = position;
    }

    fn remove_page_number(&mut self) {
        let mut lines = self.lines();
        match page_number_edit(&lines, self.position) {
            Some(PageNumberEdit::Rewrite { line, text }) => lines[line] = text,
            Some(PageNumberEdit::Remove { line }) => {
                lines.remove(line);
            }
            None => return,
        }
        self.set_lines(&lines);
    }

    fn remove_header_with(&mut self, candidate: Option<&str>, threshold: f64) {
        let mut lines = self.lines();
        if let Some(cut) = header_cut(&lines, candidate, threshold) {
            lines.drain(..=cut);
            self.set_lines(&lines);
        }
    }

    fn remove_footer_with(&mut self, candidate: Option<&str>, threshold: f64) {
        let mut lines = self.lines();
        if let Some(cut) = footer_cut(&lines, candidate, threshold) {
            lines.truncate(cut);
            self.set_lines(&lines);
        }
    }

    fn strip_whitespace(&mut self) {
        let lines = self.lines();
        match content_bounds(&lines, |l| l.trim().is_empty()) {
            Some((start, end)) if start > 0 || end + 1 < lines.len() => {
                self.set_lines(&lines[start..=end]);
            }
            Some(_) => {}
            None => self.content = TextContent::Owned(String::new()),
        }
    }
}

/// Escape text for inclusion in XHTML.
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "one\x0ctwo\x0cthree\x0cfour\x0cfive\x0csix\x0cseven\x0ceight";

    #[test]
    fn test_text_content_bounded_by_next_page() {
        let mut page = TextPage::new(1, DOC);
        page.set_next_page_index(Some(4));
        assert_eq!(page.text_content(), "two\nthree\nfour");
    }

    #[test]
    fn test_text_content_last_page_runs_to_end() {
        let page = TextPage::new(1, DOC);
        assert_eq!(
            page.text_content(),
            "two\nthree\nfour\nfive\nsix\nseven\neight"
        );
    }

    #[test]
    fn test_cleaned_text_content() {
        let page = TextPage::with_text(0, "\n  \n  Title  \n\n body line \n\n");
        assert_eq!(page.cleaned_text_content(), "Title\n\nbody line");
    }

    #[test]
    fn test_included_page_number_top() {
        let mut page = TextPage::with_text(0, "42 Chapter One\nIt was a dark night.");
        assert_eq!(page.included_page_number(), None);

        page.set_page_number_position(PageNumberPosition::Top);
        assert_eq!(page.included_page_number(), Some("42".to_string()));

        page.remove_page_number();
        assert_eq!(page.cleaned_text_content().lines().next(), Some("Chapter One"));
        assert_eq!(page.included_page_number(), None);
    }

    #[test]
    fn test_included_page_number_bottom() {
        let mut page = TextPage::with_text(0, "Body text\nmore text\n  17  \n\n");
        page.set_page_number_position(PageNumberPosition::Bottom);
        assert_eq!(page.included_page_number(), Some("17".to_string()));

        page.remove_page_number();
        assert_eq!(page.cleaned_text_content(), "Body text\nmore text");
    }

    #[test]
    fn test_included_page_number_spelled_out() {
        let mut page = TextPage::with_text(0, "blah\nblah blah blah\ntwo");
        page.set_page_number_position(PageNumberPosition::Bottom);
        assert_eq!(page.included_page_number(), Some("2".to_string()));
    }

    #[test]
    fn test_remove_page_number_noop() {
        let mut page = TextPage::new(0, "Body\x0cNext");
        page.set_next_page_index(Some(1));
        page.set_page_number_position(PageNumberPosition::Bottom);
        page.remove_page_number();
        assert!(page.is_shared());
        assert_eq!(page.text_content(), "Body");
    }

    #[test]
    fn test_remove_header() {
        let mut page = TextPage::with_text(
            0,
            "Moby Dick:\u{a0}Chapter 1\u{a0}by Herman Melville\nCall me Ishmael.",
        );
        page.remove_header(Some("Moby Dick: Chapter 1"));
        assert_eq!(page.cleaned_text_content(), "Call me Ishmael.");
    }

    #[test]
    fn test_remove_header_drops_preceding_lines() {
        let mut page = TextPage::with_text(0, "stray\nRUNNING HEADER\nbody");
        page.remove_header(Some("RUNNING HEADER"));
        assert_eq!(page.text_content(), "body");
    }

    #[test]
    fn test_remove_header_unrelated() {
        let mut page = TextPage::with_text(0, "Something else entirely\nbody");
        page.remove_header(Some("Moby Dick: Chapter 1"));
        assert_eq!(page.text_content(), "Something else entirely\nbody");

        page.remove_header(None);
        page.remove_header(Some(""));
        assert_eq!(page.text_content(), "Something else entirely\nbody");
    }

    #[test]
    fn test_remove_footer_drops_following_lines() {
        let mut page = TextPage::with_text(
            0,
            "body\n2\nCreated for Lit2Go on the web at etc.usf.edu\n\n",
        );
        page.remove_footer(Some("Created for Lit2Go on the web at etc.usf.edu"));
        assert_eq!(page.text_content(), "body\n2");
    }

    #[test]
    fn test_strip_whitespace() {
        let mut page = TextPage::with_text(0, "\n \nbody\n\nmore\n  \n");
        page.strip_whitespace();
        assert_eq!(page.text_content(), "body\n\nmore");

        let mut blank = TextPage::with_text(1, " \n \n");
        blank.strip_whitespace();
        assert_eq!(blank.text_content(), "");
        assert!(blank.is_empty());
    }

    #[test]
    fn test_markup_content_escapes_paragraphs() {
        let page = TextPage::with_text(0, "A & B\nline two\n\n<second>");
        assert_eq!(
            page.markup_content(),
            "<p>A &amp; B\nline two</p>\n<p>&lt;second&gt;</p>"
        );
    }

    #[test]
    fn test_lang_recomputed_after_edit() {
        let mut page = TextPage::with_text(
            0,
            "Ce programme convertit les fichiers d'un format dans un autre\nThis is the text of the book and it is in English",
        );
        page.remove_header(Some("Ce programme convertit les fichiers d'un format dans un autre"));
        assert_eq!(page.lang(), Some("en".to_string()));
    }

    #[test]
    fn test_document_segment_ranges() {
        let document = TextDocument::new("caf\u{e9}\x0ctwo\x0c\x0cfour\x0c");
        assert_eq!(document.segment_count(), 5);
        assert_eq!(document.segments(0, 1), "caf\u{e9}");
        assert_eq!(document.segments(1, 3), "two\n");
        assert_eq!(document.segments(3, 5), "four\n");
        assert_eq!(document.segments(2, 2), "");
        assert_eq!(document.segments(4, 1), "");
        assert_eq!(document.segments(9, 12), "");
    }

    #[test]
    fn test_pages_share_one_document() {
        let document = TextDocument::new(DOC);
        let mut first = TextPage::new(0, document.clone());
        let mut second = TextPage::new(2, document.clone());
        first.set_next_page_index(Some(2));
        second.set_next_page_index(Some(3));

        let TextContent::Shared(shared) = &second.content else {
            panic!("page should read from the shared document");
        };
        assert!(Arc::ptr_eq(&document.starts, &shared.starts));
        assert_eq!(first.text_content(), "one\ntwo");
        assert_eq!(second.text_content(), "three");
    }
}
