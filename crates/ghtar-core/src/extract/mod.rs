//! Unpacking of gzip-compressed tar archives.
//!
//! Entries are processed one at a time in stream order. Directories and
//! regular files are materialized with the permission bits from their
//! headers; every other entry type (symlinks, hard links, devices, pax
//! global headers) is skipped. No entry may resolve outside the
//! destination root.

mod entry_path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::Path;
use tar::EntryType;

/// What an extraction produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub directories: u64,
    pub files: u64,
    /// Entries of unsupported types, plus entries naming the root itself.
    pub skipped: u64,
}

/// Decompresses and unpacks the archive at `archive` into `dest`.
///
/// End of stream is the normal termination. Fails on a non-gzip file, a
/// malformed tar header, an entry escaping `dest`, or any filesystem error.
pub fn extract(archive: &Path, dest: &Path) -> Result<ExtractSummary> {
    let file = File::open(archive).with_context(|| format!("open {}", archive.display()))?;
    let mut tar = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
    let mut summary = ExtractSummary::default();

    let entries = tar
        .entries()
        .with_context(|| format!("read {}", archive.display()))?;
    for entry in entries {
        let mut entry =
            entry.with_context(|| format!("read tar entry from {}", archive.display()))?;
        let name = entry.path().context("decode entry path")?.into_owned();
        let entry_type = entry.header().entry_type();

        let rel = match entry_path::contained(&name)? {
            Some(rel) => rel,
            None => {
                summary.skipped += 1;
                continue;
            }
        };
        let target = dest.join(&rel);

        match entry_type {
            EntryType::Directory => {
                let mode = entry
                    .header()
                    .mode()
                    .with_context(|| format!("mode of {}", name.display()))?;
                fs::create_dir_all(&target)
                    .with_context(|| format!("create directory {}", target.display()))?;
                set_mode(&target, mode)?;
                summary.directories += 1;
            }
            EntryType::Regular | EntryType::Continuous => {
                let mode = entry
                    .header()
                    .mode()
                    .with_context(|| format!("mode of {}", name.display()))?;
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("create directory {}", parent.display()))?;
                }
                let mut out = File::create(&target)
                    .with_context(|| format!("create {}", target.display()))?;
                io::copy(&mut entry, &mut out)
                    .with_context(|| format!("write {}", target.display()))?;
                out.flush()
                    .with_context(|| format!("write {}", target.display()))?;
                drop(out);
                set_mode(&target, mode)?;
                summary.files += 1;
            }
            other => {
                tracing::debug!(entry = %name.display(), kind = ?other, "skipping unsupported entry");
                summary.skipped += 1;
            }
        }
    }

    tracing::debug!(
        directories = summary.directories,
        files = summary.files,
        skipped = summary.skipped,
        "archive extracted"
    );
    Ok(summary)
}

/// Only the rwx bits are taken from the archive; setuid, setgid and sticky are dropped.
const PERMISSION_BITS: u32 = 0o777;

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mode = mode & PERMISSION_BITS;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .with_context(|| format!("chmod {:o} {}", mode, path.display()))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
