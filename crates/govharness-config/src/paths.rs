// SPDX-License-Identifier: Apache-2.0

use std::path::{Component, Path, PathBuf};

use govharness_core::HarnessError;
use tracing::debug;

use crate::schema::CatalogEntry;

/// Joins the entry's posix-style definition path onto `caller_root`,
/// normalizes it and checks that the file exists right now.
pub fn resolve_definition_path(
    entry: &CatalogEntry,
    caller_root: &Path,
) -> Result<PathBuf, HarnessError> {
    let mut joined = anchor(caller_root);
    for segment in entry.definition_relative_path.split('/') {
        if !segment.is_empty() {
            joined.push(segment);
        }
    }
    let resolved = normalize_path(&joined);
    if !resolved.exists() {
        return Err(HarnessError::FileNotFound { path: resolved });
    }
    debug!(policy = %entry.key(), path = %resolved.display(), "resolved definition path");
    Ok(resolved)
}

/// Lexically resolves `.` and `..` without touching the filesystem.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn anchor(root: &Path) -> PathBuf {
    if root.is_absolute() {
        return root.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(root))
        .unwrap_or_else(|_| root.to_path_buf())
}
