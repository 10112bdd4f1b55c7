//! Packaging normalized documents and rendering them to output formats.

mod book;
mod json;
mod stats;
mod text;
mod xhtml;

pub use book::{PackagedBook, PackagedPage};
pub use json::{to_json, JsonFormat};
pub use stats::BookStats;
pub use text::to_text;
pub use xhtml::{page_to_xhtml, to_xhtml};
