//! Fixed-point header, footer and page-number removal.

use super::fingerprint::{ContentHasher, Fingerprint};
use crate::model::{DetectionConfig, Page, PageNumberPosition, PageSequence};
use serde::Serialize;

/// Options for [`NormalizationDriver`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeOptions {
    /// Maximum number of passes before giving up on convergence
    pub max_iterations: usize,

    /// Thresholds handed to the document-wide detectors
    pub detection: DetectionConfig,

    /// Drop blank leading and trailing lines once the loop finishes
    pub strip_whitespace: bool,
}

impl NormalizeOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the iteration cap (at least one pass always runs).
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    /// Set detection thresholds.
    pub fn with_detection(mut self, detection: DetectionConfig) -> Self {
        self.detection = detection;
        self
    }

    /// Keep blank edge lines after normalization.
    pub fn keep_whitespace(mut self) -> Self {
        self.strip_whitespace = false;
        self
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            detection: DetectionConfig::default(),
            strip_whitespace: true,
        }
    }
}

/// Outcome of a normalization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    /// Passes executed
    pub iterations: usize,

    /// Whether the last pass left the content unchanged
    pub converged: bool,

    /// Distinct header candidates removed, in the order they were found
    pub headers: Vec<String>,

    /// Distinct footer candidates removed, in the order they were found
    pub footers: Vec<String>,

    /// Page-number position decided in the last pass
    pub page_number_position: PageNumberPosition,

    /// Fingerprint of the final content
    pub fingerprint: Fingerprint,
}

/// Drives header, footer and page-number removal to a fixed point.
///
/// Each pass decides the page-number position, detects a header and a
/// footer over the whole document and applies all three removals to every
/// page. The loop stops when a pass leaves the fingerprint unchanged or
/// after `max_iterations` passes, in which case the last state is kept.
#[derive(Debug, Clone, Default)]
pub struct NormalizationDriver {
    options: NormalizeOptions,
    hasher: ContentHasher,
}

impl NormalizationDriver {
    /// Create a driver with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a driver with the given options.
    pub fn with_options(options: NormalizeOptions) -> Self {
        Self {
            options,
            hasher: ContentHasher::new(),
        }
    }

    /// Options in use.
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Normalize `sequence` in place.
    pub fn run<P: Page>(&self, sequence: &mut PageSequence<P>) -> NormalizeReport {
        sequence.set_config(self.options.detection);
        let threshold = self.options.detection.similarity_threshold;

        let mut headers: Vec<String> = Vec::new();
        let mut footers: Vec<String> = Vec::new();
        let mut position = PageNumberPosition::Unknown;
        let mut iterations = 0;
        let mut converged = false;

        let mut current = self.hasher.fingerprint(sequence);

        while iterations < self.options.max_iterations {
            iterations += 1;
            let previous = current;

            position = sequence.set_page_number_position();
            let header = sequence.detect_header();
            let footer = sequence.detect_footer();

            for page in sequence.iter_mut() {
                page.remove_page_number();
                page.remove_header_with(header.as_deref(), threshold);
                page.remove_footer_with(footer.as_deref(), threshold);
            }

            record(&mut headers, header);
            record(&mut footers, footer);

            // Only after every page of the pass has been edited
            current = self.hasher.fingerprint(sequence);
            log::debug!("Pass {}: fingerprint {} -> {}", iterations, previous, current);

            if current == previous {
                converged = true;
                break;
            }
        }

        if !converged {
            log::warn!(
                "Normalization did not converge after {} passes; keeping last state",
                iterations
            );
        }

        if self.options.strip_whitespace {
            for page in sequence.iter_mut() {
                page.strip_whitespace();
            }
            current = self.hasher.fingerprint(sequence);
        }

        NormalizeReport {
            iterations,
            converged,
            headers,
            footers,
            page_number_position: position,
            fingerprint: current,
        }
    }
}

fn record(found: &mut Vec<String>, candidate: Option<String>) {
    if let Some(candidate) = candidate {
        if !found.contains(&candidate) {
            found.push(candidate);
        }
    }
}
