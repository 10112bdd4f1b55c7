//! Shared normalize, resolve and package steps.

use super::{ConvertOptions, ConvertResult, OutputFormat};
use crate::detect::SourceKind;
use crate::error::Result;
use crate::metadata::expected_title;
use crate::model::{Page, PageSequence};
use crate::normalize::NormalizationDriver;
use crate::render::{to_json, to_text, to_xhtml, PackagedBook};
use std::path::Path;

/// Where a sequence was loaded from.
pub(crate) struct SourceInfo<'a> {
    pub kind: SourceKind,
    pub file_stem: Option<&'a str>,
    pub base_dir: Option<&'a Path>,
}

impl<'a> SourceInfo<'a> {
    pub fn from_path(kind: SourceKind, path: &'a Path) -> Self {
        Self {
            kind,
            file_stem: path.file_stem().and_then(|s| s.to_str()),
            base_dir: path.parent(),
        }
    }

    pub fn detached(kind: SourceKind) -> Self {
        Self {
            kind,
            file_stem: None,
            base_dir: None,
        }
    }
}

/// Normalize a loaded sequence and package it.
pub(crate) fn process<P: Page>(
    mut sequence: PageSequence<P>,
    source: SourceInfo<'_>,
    options: &ConvertOptions,
) -> Result<ConvertResult> {
    let driver = NormalizationDriver::with_options(options.normalize);
    let report = driver.run(&mut sequence);
    log::debug!(
        "Normalized {} pages in {} passes (converged: {}, fingerprint {})",
        sequence.len(),
        report.iterations,
        report.converged,
        report.fingerprint
    );

    let guessed_title = match (&options.title, source.file_stem, sequence.get(0)) {
        (Some(title), _, _) => Some(title.clone()),
        (None, Some(stem), Some(first)) => expected_title(stem, &first.cleaned_text_content()),
        _ => None,
    };

    let resolved = options
        .metadata
        .resolve(&sequence, report.fingerprint, guessed_title.as_deref());

    let mut book = PackagedBook::package(&sequence, report.fingerprint, options.language.as_ref())
        .with_metadata(&resolved);
    match (&options.title, &guessed_title) {
        (Some(title), _) => book = book.with_title(title.clone()),
        (None, Some(guess)) if book.title.is_none() => book = book.with_title(guess.clone()),
        _ => {}
    }

    if options.load_images {
        for image in &mut book.images {
            if let Err(e) = image.load(source.base_dir) {
                log::warn!("Skipping image {}: {}", image.source.display(), e);
            }
        }
    }

    let content = match options.output_format {
        OutputFormat::Json => to_json(&book, options.json_format)?,
        OutputFormat::Text => to_text(&book),
        OutputFormat::Xhtml => to_xhtml(&book),
    };

    log::info!(
        "Packaged {} of {} pages ({} omitted)",
        book.stats.page_count,
        book.stats.source_pages,
        book.stats.omitted_pages
    );

    Ok(ConvertResult {
        content,
        book,
        report,
        source: source.kind,
        mime_type: options.output_format.mime_type(),
    })
}
