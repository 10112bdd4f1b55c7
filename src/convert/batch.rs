//! Parallel conversion of independent documents.

use super::{ConvertOptions, ConvertResult, ConverterRegistry};
use crate::error::Result;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Outcome of converting one file in a batch.
#[derive(Debug)]
pub struct BatchItem {
    /// Input path
    pub path: PathBuf,

    /// Conversion result
    pub result: Result<ConvertResult>,
}

/// Convert many documents in parallel.
///
/// Each document is normalized on its own thread; the metadata cache in
/// `options` is shared by all of them. `on_done` is called once per file as
/// it finishes. Results keep the order of `paths`.
pub fn convert_batch<P, F>(
    registry: &ConverterRegistry,
    paths: &[P],
    options: &ConvertOptions,
    on_done: F,
) -> Vec<BatchItem>
where
    P: AsRef<Path> + Sync,
    F: Fn(&Path) + Sync,
{
    log::info!("Converting {} documents", paths.len());

    paths
        .par_iter()
        .map(|path| {
            let path = path.as_ref();
            let result = registry.convert(path, options);
            if let Err(e) = &result {
                log::warn!("Failed to convert {}: {}", path.display(), e);
            }
            on_done(path);
            BatchItem {
                path: path.to_path_buf(),
                result,
            }
        })
        .collect()
}
