//! Page capability shared by text-backed and markup-backed pages.

use super::PageImage;
use crate::lang::{LanguageDetector, StopwordDetector, LANG_SAMPLE_CHARS};
use crate::normalize::numbers::{
    leading_digits, strip_leading_digits, strip_trailing_digits, trailing_digits,
    words_to_number,
};
use crate::normalize::similarity::line_matches;
use serde::{Deserialize, Serialize};

/// Similarity above which a line counts as a header or footer occurrence.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Where the printed page number sits on every page of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageNumberPosition {
    /// First line of the page
    Top,
    /// Last line of the page
    Bottom,
    /// Not decided, or no consistent position
    #[default]
    Unknown,
}

/// One logical page of a document.
///
/// Derived views (`text_content`, `cleaned_text_content`,
/// `included_page_number`, `lang`) are computed from the current content
/// on every call. Removal operations mutate the page in place.
pub trait Page {
    /// 0-based position of the page in its document.
    fn index(&self) -> usize;

    /// Index of the following page, assigned by [`PageSequence::set_context`].
    ///
    /// [`PageSequence::set_context`]: super::PageSequence::set_context
    fn next_page_index(&self) -> Option<usize>;

    /// Record the following page's index (`None` for the last page).
    fn set_next_page_index(&mut self, next: Option<usize>);

    /// Raw text of the page.
    fn text_content(&self) -> String;

    /// Content the fingerprint is computed from.
    fn raw_content(&self) -> String;

    /// Markup handed to packaging.
    fn markup_content(&self) -> String;

    /// Current page-number position.
    fn page_number_position(&self) -> PageNumberPosition;

    /// Set the page-number position (decided document-wide).
    fn set_page_number_position(&mut self, position: PageNumberPosition);

    /// Strip the page number found by [`Page::included_page_number`].
    fn remove_page_number(&mut self);

    /// Remove the first line matching `candidate` and every line before it.
    fn remove_header_with(&mut self, candidate: Option<&str>, threshold: f64);

    /// Remove the last line matching `candidate` and every line after it.
    fn remove_footer_with(&mut self, candidate: Option<&str>, threshold: f64);

    /// Drop blank lines at the start and end of the page.
    fn strip_whitespace(&mut self);

    /// Images embedded in the page.
    fn images(&self) -> Vec<PageImage> {
        Vec::new()
    }

    /// Text with every line trimmed and blank edge lines removed.
    fn cleaned_text_content(&self) -> String {
        clean_text(&self.text_content())
    }

    /// Page number printed at the decided boundary of the page.
    fn included_page_number(&self) -> Option<String> {
        let cleaned = self.cleaned_text_content();
        let line = match self.page_number_position() {
            PageNumberPosition::Top => cleaned.lines().next(),
            PageNumberPosition::Bottom => cleaned.lines().last(),
            PageNumberPosition::Unknown => None,
        }?;
        page_number_in_line(line, self.page_number_position())
    }

    /// Remove a running header with the default similarity threshold.
    fn remove_header(&mut self, candidate: Option<&str>) {
        self.remove_header_with(candidate, DEFAULT_SIMILARITY_THRESHOLD);
    }

    /// Remove a running footer with the default similarity threshold.
    fn remove_footer(&mut self, candidate: Option<&str>) {
        self.remove_footer_with(candidate, DEFAULT_SIMILARITY_THRESHOLD);
    }

    /// Dominant language with the built-in detector.
    fn lang(&self) -> Option<String> {
        self.lang_with(&StopwordDetector::new())
    }

    /// Dominant language of the first characters of the page.
    fn lang_with(&self, detector: &dyn LanguageDetector) -> Option<String> {
        let sample: String = self.text_content().chars().take(LANG_SAMPLE_CHARS).collect();
        detector.detect(&sample)
    }

    /// Whether packaging should omit this page.
    fn is_empty(&self) -> bool {
        self.cleaned_text_content().is_empty() && self.images().is_empty()
    }
}

/// Trim every line and drop blank lines at the start and end.
///
/// Interior blank lines are kept.
pub fn clean_text(text: &str) -> String {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let (start, end) = match content_bounds(&lines, |l| l.is_empty()) {
        Some(bounds) => bounds,
        None => return String::new(),
    };
    lines[start..=end].join("\n")
}

/// Indices of the first and last line that is not blank.
pub(crate) fn content_bounds<T>(lines: &[T], is_blank: impl Fn(&T) -> bool) -> Option<(usize, usize)> {
    let start = lines.iter().position(|l| !is_blank(l))?;
    let end = lines.iter().rposition(|l| !is_blank(l))?;
    Some((start, end))
}

fn page_number_in_line(line: &str, position: PageNumberPosition) -> Option<String> {
    let line = line.trim();
    let digits = match position {
        PageNumberPosition::Top => leading_digits(line),
        PageNumberPosition::Bottom => trailing_digits(line),
        PageNumberPosition::Unknown => return None,
    };
    match digits {
        Some(d) => Some(d.to_string()),
        None => words_to_number(line).map(|n| n.to_string()),
    }
}

/// Edit to apply to a page's boundary line when removing its page number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PageNumberEdit {
    /// Replace the line's text with the remainder
    Rewrite { line: usize, text: String },
    /// The line held only the number
    Remove { line: usize },
}

/// Work out how to strip the page number from `lines` (one entry per line).
pub(crate) fn page_number_edit(lines: &[String], position: PageNumberPosition) -> Option<PageNumberEdit> {
    let (start, end) = content_bounds(lines, |l| l.trim().is_empty())?;
    let line = match position {
        PageNumberPosition::Top => start,
        PageNumberPosition::Bottom => end,
        PageNumberPosition::Unknown => return None,
    };
    let text = lines[line].trim();

    let digits = match position {
        PageNumberPosition::Top => leading_digits(text),
        _ => trailing_digits(text),
    };

    let rest = match digits {
        Some(_) if position == PageNumberPosition::Top => strip_leading_digits(text),
        Some(_) => strip_trailing_digits(text),
        None if words_to_number(text).is_some() => String::new(),
        None => return None,
    };

    if rest.is_empty() {
        Some(PageNumberEdit::Remove { line })
    } else {
        Some(PageNumberEdit::Rewrite { line, text: rest })
    }
}

/// Index of the first line matching a header candidate.
pub(crate) fn header_cut(lines: &[String], candidate: Option<&str>, threshold: f64) -> Option<usize> {
    let candidate = candidate.filter(|c| !c.trim().is_empty())?;
    lines.iter().position(|l| line_matches(l, candidate, threshold))
}

/// Index of the last line matching a footer candidate.
pub(crate) fn footer_cut(lines: &[String], candidate: Option<&str>, threshold: f64) -> Option<usize> {
    let candidate = candidate.filter(|c| !c.trim().is_empty())?;
    lines.iter().rposition(|l| line_matches(l, candidate, threshold))
}
