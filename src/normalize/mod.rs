//! Boilerplate removal for page sequences.
//!
//! [`NormalizationDriver`] repeatedly detects running headers, footers and
//! page numbers across a [`PageSequence`](crate::model::PageSequence) and
//! strips them until a [`ContentHasher`] fingerprint stops changing.

mod driver;
mod fingerprint;
pub mod numbers;
pub mod similarity;

pub use driver::{NormalizationDriver, NormalizeOptions, NormalizeReport};
pub use fingerprint::{ContentHasher, Fingerprint};
