//! Ordered page collections and document-wide detectors.

use super::html_page::HR_TAG;
use super::page::{Page, PageNumberPosition, DEFAULT_SIMILARITY_THRESHOLD};
use super::{HtmlPage, TextDocument, TextPage, PAGE_BREAK};
use crate::error::{Error, Result};
use crate::lang::LanguageDetector;
use crate::normalize::numbers::has_digit_run;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<body\b[^>]*>(.*)</body>").unwrap());

/// Thresholds used by the document-wide detectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionConfig {
    /// Non-empty lines inspected at the top (header) or bottom (footer) of each page
    pub boundary_lines: usize,

    /// Share of pages a line must recur on to count as a header or footer
    pub recurrence_ratio: f64,

    /// Minimum number of pages a header or footer must recur on
    pub min_recurrence: usize,

    /// Share of pages that must carry a digit run at a boundary
    pub page_number_ratio: f64,

    /// Similarity above which a line matches a header or footer candidate
    pub similarity_threshold: f64,
}

impl DetectionConfig {
    /// Create a config with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many boundary lines are inspected per page.
    pub fn with_boundary_lines(mut self, lines: usize) -> Self {
        self.boundary_lines = lines.max(1);
        self
    }

    /// Set the header/footer recurrence ratio.
    pub fn with_recurrence_ratio(mut self, ratio: f64) -> Self {
        self.recurrence_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Set the minimum number of recurrences.
    pub fn with_min_recurrence(mut self, pages: usize) -> Self {
        self.min_recurrence = pages;
        self
    }

    /// Set the page-number position ratio.
    pub fn with_page_number_ratio(mut self, ratio: f64) -> Self {
        self.page_number_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Set the line similarity threshold.
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold.clamp(0.0, 1.0);
        self
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            boundary_lines: 3,
            recurrence_ratio: 0.25,
            min_recurrence: 3,
            page_number_ratio: 0.5,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

#[derive(Clone, Copy)]
enum Edge {
    Top,
    Bottom,
}

/// An ordered list of pages owned by one document.
///
/// After [`PageSequence::set_context`], `pages[i]` records `pages[i + 1]`'s
/// index as its next page and the last page records none.
#[derive(Debug, Clone)]
pub struct PageSequence<P> {
    pages: Vec<P>,
    config: DetectionConfig,
}

impl<P: Page> PageSequence<P> {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            config: DetectionConfig::default(),
        }
    }

    /// Set detection thresholds.
    pub fn with_config(mut self, config: DetectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Detection thresholds in use.
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Replace the detection thresholds.
    pub fn set_config(&mut self, config: DetectionConfig) {
        self.config = config;
    }

    /// Append a page.
    pub fn push(&mut self, page: P) {
        self.pages.push(page);
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the sequence has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Get a page by position.
    pub fn get(&self, i: usize) -> Option<&P> {
        self.pages.get(i)
    }

    /// Get a page mutably by position.
    pub fn get_mut(&mut self, i: usize) -> Option<&mut P> {
        self.pages.get_mut(i)
    }

    /// Iterate over pages in order.
    pub fn iter(&self) -> std::slice::Iter<'_, P> {
        self.pages.iter()
    }

    /// Iterate mutably over pages in order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, P> {
        self.pages.iter_mut()
    }

    /// All pages as a slice.
    pub fn pages(&self) -> &[P] {
        &self.pages
    }

    /// Consume the sequence, returning its pages.
    pub fn into_pages(self) -> Vec<P> {
        self.pages
    }

    /// Link every page to the page after it.
    ///
    /// Call once all pages are appended and before reading the text of a
    /// text-backed page. Re-linking an already linked sequence is harmless.
    pub fn set_context(&mut self) {
        let next: Vec<Option<usize>> = (0..self.pages.len())
            .map(|i| self.pages.get(i + 1).map(|p| p.index()))
            .collect();
        for (page, next) in self.pages.iter_mut().zip(next) {
            page.set_next_page_index(next);
        }
    }

    /// Most frequent line among the first non-empty lines of every page.
    pub fn detect_header(&self) -> Option<String> {
        let header = self.detect_recurring(Edge::Top);
        log::debug!("Header candidate: {:?}", header);
        header
    }

    /// Most frequent line among the last non-empty lines of every page.
    pub fn detect_footer(&self) -> Option<String> {
        let footer = self.detect_recurring(Edge::Bottom);
        log::debug!("Footer candidate: {:?}", footer);
        footer
    }

    fn detect_recurring(&self, edge: Edge) -> Option<String> {
        if self.pages.is_empty() {
            return None;
        }

        // line -> (pages it occurs on, first position seen)
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        let mut seen = 0usize;

        for page in &self.pages {
            let cleaned = page.cleaned_text_content();
            let lines: Vec<&str> = cleaned.lines().filter(|l| !l.is_empty()).collect();
            let boundary = match edge {
                Edge::Top => &lines[..lines.len().min(self.config.boundary_lines)],
                Edge::Bottom => &lines[lines.len().saturating_sub(self.config.boundary_lines)..],
            };

            let mut on_page: Vec<&str> = Vec::with_capacity(boundary.len());
            for line in boundary {
                if on_page.contains(line) {
                    continue;
                }
                on_page.push(line);
                let entry = counts.entry((*line).to_string()).or_insert((0, seen));
                entry.0 += 1;
                seen += 1;
            }
        }

        let (line, (count, _)) = counts
            .into_iter()
            .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1)))?;

        let threshold = self.config.recurrence_ratio * self.pages.len() as f64;
        log::debug!(
            "Most frequent boundary line occurs on {} of {} pages (threshold {:.2}, minimum {})",
            count,
            self.pages.len(),
            threshold,
            self.config.min_recurrence
        );

        if count as f64 > threshold && count >= self.config.min_recurrence {
            Some(line)
        } else {
            None
        }
    }

    /// Decide one page-number position for the whole document and assign
    /// it to every page.
    ///
    /// `Top` wins when more than half of the pages start with a digit run
    /// and no more than half end with one; `Bottom` is the mirror case;
    /// anything else resets every page to `Unknown`.
    pub fn set_page_number_position(&mut self) -> PageNumberPosition {
        let mut top = 0usize;
        let mut bottom = 0usize;

        for page in &self.pages {
            let cleaned = page.cleaned_text_content();
            if cleaned.lines().next().map(has_digit_run).unwrap_or(false) {
                top += 1;
            }
            if cleaned.lines().last().map(has_digit_run).unwrap_or(false) {
                bottom += 1;
            }
        }

        let threshold = self.config.page_number_ratio * self.pages.len() as f64;
        let top_wins = top as f64 > threshold;
        let bottom_wins = bottom as f64 > threshold;

        let position = match (top_wins, bottom_wins) {
            (true, false) => PageNumberPosition::Top,
            (false, true) => PageNumberPosition::Bottom,
            _ => PageNumberPosition::Unknown,
        };

        log::debug!(
            "Page number position {:?} (top {}, bottom {}, pages {})",
            position,
            top,
            bottom,
            self.pages.len()
        );

        for page in &mut self.pages {
            page.set_page_number_position(position);
        }
        position
    }

    /// Position currently assigned to the pages.
    pub fn page_number_position(&self) -> PageNumberPosition {
        self.pages
            .first()
            .map(|p| p.page_number_position())
            .unwrap_or_default()
    }

    /// Most frequent language across pages, ignoring inconclusive pages.
    ///
    /// Ties go to the language seen first.
    pub fn dominant_lang(&self, detector: &dyn LanguageDetector) -> Option<String> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for lang in self.pages.iter().filter_map(|p| p.lang_with(detector)) {
            match counts.iter_mut().find(|(l, _)| *l == lang) {
                Some(entry) => entry.1 += 1,
                None => counts.push((lang, 1)),
            }
        }

        let mut best: Option<(String, usize)> = None;
        for (lang, count) in counts {
            if best.as_ref().map(|b| count > b.1).unwrap_or(true) {
                best = Some((lang, count));
            }
        }
        best.map(|(lang, _)| lang)
    }

    /// Cleaned text of every page joined with blank lines.
    pub fn cleaned_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.cleaned_text_content())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl<P: Page> Default for PageSequence<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> std::ops::Index<usize> for PageSequence<P> {
    type Output = P;

    fn index(&self, i: usize) -> &P {
        &self.pages[i]
    }
}

impl<'a, P> IntoIterator for &'a PageSequence<P> {
    type Item = &'a P;
    type IntoIter = std::slice::Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

impl PageSequence<TextPage> {
    /// Segment a form-feed delimited text blob into linked pages.
    ///
    /// The empty segment after a final form feed is not a page.
    pub fn from_text(text: &str) -> Result<Self> {
        if !text.contains(PAGE_BREAK) {
            return Err(Error::MalformedInput(
                "no page break (form feed) found in text".to_string(),
            ));
        }

        let mut count = text.split(PAGE_BREAK).count();
        if text
            .rsplit(PAGE_BREAK)
            .next()
            .map(|last| last.trim().is_empty())
            .unwrap_or(false)
        {
            count -= 1;
        }

        let document = TextDocument::new(text);
        let mut sequence = Self::new();
        for index in 0..count.max(1) {
            sequence.push(TextPage::new(index, document.clone()));
        }
        sequence.set_context();

        log::debug!("Segmented text into {} pages", sequence.len());
        Ok(sequence)
    }
}

impl PageSequence<HtmlPage> {
    /// Split an HTML document's body on `<hr>` page breaks.
    ///
    /// A blank segment after the last break is not a page.
    pub fn from_html_document(html: &str) -> Result<Self> {
        let body = BODY
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or(html);

        if !HR_TAG.is_match(body) {
            return Err(Error::MalformedInput(
                "no <hr> page break found in HTML body".to_string(),
            ));
        }

        let mut segments: Vec<&str> = HR_TAG.split(body).collect();
        if segments.last().map(|s| s.trim().is_empty()).unwrap_or(false) {
            segments.pop();
        }

        Self::from_html_fragments(segments)
    }

    /// Build linked pages from one HTML fragment per page.
    pub fn from_html_fragments<I, S>(fragments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sequence = Self::new();
        for (index, fragment) in fragments.into_iter().enumerate() {
            sequence.push(HtmlPage::new(index, fragment.as_ref()));
        }

        if sequence.is_empty() {
            return Err(Error::MalformedInput("no pages in HTML input".to_string()));
        }

        sequence.set_context();
        log::debug!("Segmented HTML into {} pages", sequence.len());
        Ok(sequence)
    }
}
