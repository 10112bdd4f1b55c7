//! Document fingerprints.

use crate::model::{Page, PageSequence};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Composite hash of a document's current content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(pub u64);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Computes [`Fingerprint`]s from page content.
///
/// Every call hashes the pages as they are now; nothing is memoized, so a
/// fingerprint taken after a mutation always reflects it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentHasher;

impl ContentHasher {
    /// Create a hasher.
    pub fn new() -> Self {
        Self
    }

    /// Hash of one page's raw content, salted with its index.
    pub fn page_hash<P: Page>(&self, page: &P) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update((page.index() as u64).to_le_bytes());
        hasher.update(page.raw_content().as_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Fingerprint of the whole document.
    ///
    /// Page hashes are combined with a wrapping sum; because each page hash
    /// covers the page index, reordering pages changes the result.
    pub fn fingerprint<P: Page>(&self, sequence: &PageSequence<P>) -> Fingerprint {
        Fingerprint(
            sequence
                .iter()
                .fold(0u64, |acc, page| acc.wrapping_add(self.page_hash(page))),
        )
    }
}
