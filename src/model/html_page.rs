//! Pages backed by HTML fragments produced by PDF-to-HTML extractors.
//!
//! A fragment is a sequence of positioned text lines. Two layouts occur in
//! practice: one leaf `<div>` per line (pdf2htmlEX) and `<br>`-separated
//! lines (pdftohtml). Each line keeps its original markup so packaging can
//! emit it unchanged; its text is derived once when the line is parsed and
//! a line is replaced, never edited, when a removal touches it.

use super::page::{
    content_bounds, footer_cut, header_cut, page_number_edit, Page, PageNumberEdit,
    PageNumberPosition,
};
use super::resource::file_name_of;
use super::text_page::escape_html;
use super::PageImage;
use regex::{Captures, Regex};
use scraper::{Html, Selector};
use std::path::Path;
use std::sync::LazyLock;

static IMG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img[src]").unwrap());
static DIV_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div").unwrap());
pub(crate) static HR_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<hr\b[^>]*>").unwrap());
static BR_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\b[^>]*>").unwrap());
static IMG_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)(<img\b[^>]*?\bsrc\s*=\s*")([^"]*)(")"#).unwrap());
static MARKUP_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>|&#?\w+;|[\s\S]").unwrap());

/// How the lines of a fragment are delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineLayout {
    /// One leaf `<div>` per line
    Block,
    /// Lines separated by `<br>` tags
    Break,
}

/// One line of a markup page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupLine {
    markup: String,
    text: String,
    images: Vec<String>,
}

impl MarkupLine {
    /// Parse a line's markup, extracting its text and image sources.
    pub fn parse(markup: impl Into<String>) -> Self {
        let markup = markup.into();
        let fragment = Html::parse_fragment(&markup);

        let raw: String = fragment.root_element().text().collect();
        let text = raw
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let images = fragment
            .select(&IMG_SELECTOR)
            .filter_map(|img| img.value().attr("src"))
            .map(String::from)
            .collect();

        Self {
            markup,
            text,
            images,
        }
    }

    /// The line's markup.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// The line's text on a single line.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// `src` values of images on the line.
    pub fn image_sources(&self) -> &[String] {
        &self.images
    }

    /// Blank lines have no text and no image.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty() && self.images.is_empty()
    }
}

/// A page whose content is an HTML fragment.
#[derive(Debug, Clone)]
pub struct HtmlPage {
    index: usize,
    next_index: Option<usize>,
    layout: LineLayout,
    lines: Vec<MarkupLine>,
    position: PageNumberPosition,
}

impl HtmlPage {
    /// Split a fragment into lines.
    ///
    /// `<hr>` page separators left in the fragment are dropped.
    pub fn new(index: usize, fragment: &str) -> Self {
        let fragment = HR_TAG.replace_all(fragment, "");

        let block_lines = leaf_divs(&fragment);
        let (layout, lines) = if block_lines.is_empty() {
            (LineLayout::Break, break_lines(&fragment))
        } else {
            (LineLayout::Block, block_lines)
        };

        Self {
            index,
            next_index: None,
            layout,
            lines: lines.into_iter().map(MarkupLine::parse).collect(),
            position: PageNumberPosition::Unknown,
        }
    }

    /// Line layout detected for the fragment.
    pub fn layout(&self) -> LineLayout {
        self.layout
    }

    /// Current lines.
    pub fn lines(&self) -> &[MarkupLine] {
        &self.lines
    }

    fn line_texts(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.text.clone()).collect()
    }

    fn rewrite_line(&self, line: &MarkupLine, text: &str) -> MarkupLine {
        let count = visible_len(&line.text).saturating_sub(visible_len(text));
        let from_end = self.position != PageNumberPosition::Top;
        let rewritten = MarkupLine::parse(drop_text(&line.markup, count, from_end));
        if rewritten.text == text && rewritten.images == line.images {
            return rewritten;
        }

        // Markup the tokenizer cannot follow: rebuild from text, keeping images
        let images: String = line
            .images
            .iter()
            .map(|src| format!(r#"<img src="{}"/>"#, escape_html(src)))
            .collect();
        let body = format!("{}{}", images, escape_html(text));
        match self.layout {
            LineLayout::Block => MarkupLine::parse(format!("<div>{}</div>", body)),
            LineLayout::Break => MarkupLine::parse(body),
        }
    }
}

/// A piece of line markup: a whole tag, or one character or entity of text.
#[derive(Debug, Clone, Copy)]
enum Token<'a> {
    Tag(&'a str),
    Text { raw: &'a str, blank: bool },
}

fn tokenize(markup: &str) -> Vec<Token<'_>> {
    MARKUP_TOKEN
        .find_iter(markup)
        .map(|m| {
            let raw = m.as_str();
            if raw.len() > 1 && raw.starts_with('<') && raw.ends_with('>') {
                Token::Tag(raw)
            } else {
                let blank = raw.chars().all(char::is_whitespace)
                    || matches!(raw, "&nbsp;" | "&#160;" | "&#xa0;" | "&#xA0;");
                Token::Text { raw, blank }
            }
        })
        .collect()
}

fn visible_len(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Drop `count` visible characters of text from one end of `markup`, along
/// with the whitespace around them. Tags are never touched.
fn drop_text(markup: &str, count: usize, from_end: bool) -> String {
    let mut tokens = tokenize(markup);
    if from_end {
        tokens.reverse();
    }

    let mut left = count;
    let mut trimming = true;
    let mut kept: Vec<Token<'_>> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match token {
            Token::Text { blank, .. } if trimming => {
                if blank {
                    continue;
                }
                if left > 0 {
                    left -= 1;
                    continue;
                }
                trimming = false;
                kept.push(token);
            }
            _ => kept.push(token),
        }
    }

    if from_end {
        kept.reverse();
    }
    kept.iter()
        .map(|token| match token {
            Token::Tag(raw) | Token::Text { raw, .. } => *raw,
        })
        .collect()
}

fn leaf_divs(fragment: &str) -> Vec<String> {
    let html = Html::parse_fragment(fragment);
    html.select(&DIV_SELECTOR)
        .filter(|div| {
            !div.descendants().skip(1).any(|node| {
                node.value()
                    .as_element()
                    .map(|el| el.name() == "div")
                    .unwrap_or(false)
            })
        })
        .map(|div| div.html())
        .collect()
}

fn break_lines(fragment: &str) -> Vec<String> {
    let mut lines: Vec<String> = BR_TAG
        .split(fragment)
        .map(|segment| segment.trim_matches(|c| c == '\n' || c == '\r').to_string())
        .collect();
    if lines.last().map(|l| l.trim().is_empty()).unwrap_or(false) {
        lines.pop();
    }
    lines
}

impl Page for HtmlPage {
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
        self.line_texts().join("\n")
    }

    fn raw_content(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.markup.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn markup_content(&self) -> String {
        let rewrite_src = |caps: &Captures| {
            format!("{}{}{}", &caps[1], file_name_of(Path::new(&caps[2])), &caps[3])
        };
        self.lines
            .iter()
            .map(|l| {
                let markup = IMG_SRC.replace_all(&l.markup, rewrite_src);
                match self.layout {
                    LineLayout::Block => markup.to_string(),
                    LineLayout::Break => format!("{}<br/>", markup),
                }
            })
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
        match page_number_edit(&self.line_texts(), self.position) {
            Some(PageNumberEdit::Rewrite { line, text }) => {
                let rewritten = self.rewrite_line(&self.lines[line], &text);
                self.lines[line] = rewritten;
            }
            Some(PageNumberEdit::Remove { line }) => {
                // An image sharing the line survives as its own line
                if self.lines[line].images.is_empty() {
                    self.lines.remove(line);
                } else {
                    let rewritten = self.rewrite_line(&self.lines[line], "");
                    self.lines[line] = rewritten;
                }
            }
            None => {}
        }
    }

    fn remove_header_with(&mut self, candidate: Option<&str>, threshold: f64) {
        if let Some(cut) = header_cut(&self.line_texts(), candidate, threshold) {
            self.lines.drain(..=cut);
        }
    }

    fn remove_footer_with(&mut self, candidate: Option<&str>, threshold: f64) {
        if let Some(cut) = footer_cut(&self.line_texts(), candidate, threshold) {
            self.lines.truncate(cut);
        }
    }

    fn strip_whitespace(&mut self) {
        match content_bounds(&self.lines, MarkupLine::is_blank) {
            Some((start, end)) => {
                self.lines.truncate(end + 1);
                self.lines.drain(..start);
            }
            None => self.lines.clear(),
        }
    }

    fn images(&self) -> Vec<PageImage> {
        self.lines
            .iter()
            .flat_map(|l| l.images.iter())
            .enumerate()
            .map(|(ordinal, src)| PageImage::new(self.index, ordinal, src.as_str()))
            .collect()
    }
}
