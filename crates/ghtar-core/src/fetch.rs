//! Download-then-unpack step of a run.
//!
//! Strictly sequential: the archive is fully written before extraction
//! starts, and removed only after extraction succeeds.

use crate::downloader::{download_to_file, DownloadOptions};
use crate::extract::{extract, ExtractSummary};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use url::Url;

/// Downloads `url` to `archive`, unpacks it into `dest`, then deletes `archive`.
///
/// A failed download removes the partial archive (best effort). A failed
/// extraction leaves the archive in place for inspection. Failing to delete
/// the archive after a good extraction is an error.
pub fn download_and_extract(
    url: &Url,
    archive: &Path,
    dest: &Path,
    opts: &DownloadOptions,
) -> Result<ExtractSummary> {
    let bytes = match download_to_file(url.as_str(), archive, opts) {
        Ok(n) => n,
        Err(e) => {
            discard_partial(archive);
            return Err(e);
        }
    };
    tracing::info!(bytes, archive = %archive.display(), "download complete");

    let summary = extract(archive, dest)
        .with_context(|| format!("extract {}", archive.display()))?;

    fs::remove_file(archive).with_context(|| format!("remove {}", archive.display()))?;
    tracing::debug!(archive = %archive.display(), "temporary archive removed");
    Ok(summary)
}

fn discard_partial(archive: &Path) {
    match fs::remove_file(archive) {
        Ok(()) => tracing::debug!("removed partial archive {}", archive.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("could not remove partial archive {}: {}", archive.display(), e),
    }
}
