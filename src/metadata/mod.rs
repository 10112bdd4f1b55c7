//! Book metadata: ISBNs, expected title and catalog lookups.

pub mod catalog;
pub mod isbn;
pub mod title;

pub use catalog::{
    BookMetadata, CatalogLookup, MetadataCache, MetadataResolver, NoCatalog, ResolvedMetadata,
};
pub use isbn::{find_isbn, find_isbns, is_valid_isbn};
pub use title::expected_title;
