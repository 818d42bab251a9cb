//! Local filename derivation for downloaded archives.
//!
//! Owner, repository and branch come from the user and may contain `/`
//! (branches like `release/1.x`), so each part is sanitized into a single
//! Linux-safe path component before it is used on disk.

mod sanitize;

pub use sanitize::sanitize_component;

use sanitize::{truncate_on_char_boundary, NAME_MAX};

/// Suffix of every downloaded archive.
pub const ARCHIVE_SUFFIX: &str = ".tar.gz";

/// Stand-in for a part that sanitizes to nothing.
const PLACEHOLDER: &str = "_";

/// Builds the temporary archive filename `<owner>-<repo>-<branch>.tar.gz`.
///
/// The whole name fits in NAME_MAX; an over-long name loses the tail of its
/// branch part (or, past that, of the repo part).
///
/// # Examples
///
/// - `archive_filename("rust-lang", "log", "master")` → `"rust-lang-log-master.tar.gz"`
/// - `archive_filename("a", "b", "feature/x")` → `"a-b-feature_x.tar.gz"`
pub fn archive_filename(owner: &str, repo: &str, branch: &str) -> String {
    let parts: Vec<String> = [owner, repo, branch]
        .iter()
        .map(|part| {
            let clean = sanitize_component(part);
            if clean.is_empty() {
                PLACEHOLDER.to_string()
            } else {
                clean
            }
        })
        .collect();
    let stem = parts.join("-");
    let max_stem = NAME_MAX - ARCHIVE_SUFFIX.len();
    if stem.len() <= max_stem {
        return format!("{}{}", stem, ARCHIVE_SUFFIX);
    }
    let cut = truncate_on_char_boundary(&stem, max_stem)
        .trim_end_matches(|c| c == '-' || c == '_' || c == '.');
    format!("{}{}", cut, ARCHIVE_SUFFIX)
}
