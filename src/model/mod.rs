//! Page model for normalizing extracted book content.
//!
//! A document is an ordered [`PageSequence`] of pages that share the
//! [`Page`] capability. Two variants exist: [`TextPage`] over form-feed
//! delimited text and [`HtmlPage`] over per-page HTML fragments.

mod html_page;
mod page;
mod resource;
mod sequence;
mod text_page;

pub use html_page::{HtmlPage, LineLayout, MarkupLine};
pub use page::{clean_text, Page, PageNumberPosition, DEFAULT_SIMILARITY_THRESHOLD};
pub use resource::PageImage;
pub use sequence::{DetectionConfig, PageSequence};
pub use text_page::{TextDocument, TextPage, PAGE_BREAK};

pub(crate) use text_page::escape_html;
