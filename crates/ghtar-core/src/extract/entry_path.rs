//! Containment check for tar entry names.

use anyhow::Result;
use std::path::{Component, Path, PathBuf};

/// Turns an entry name into a path relative to the extraction root.
///
/// `.` components are dropped. Absolute paths, drive prefixes and `..`
/// components are rejected outright: such an entry could write outside the
/// root. Returns `None` when nothing is left (e.g. `./`).
pub(crate) fn contained(name: &Path) -> Result<Option<PathBuf>> {
    let mut out = PathBuf::new();
    for component in name.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                anyhow::bail!("entry {:?} escapes the extraction root", name.display().to_string());
            }
        }
    }
    if out.as_os_str().is_empty() {
        Ok(None)
    } else {
        Ok(Some(out))
    }
}
