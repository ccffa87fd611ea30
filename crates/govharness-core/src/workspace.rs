// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use crate::ENV_GOVHARNESS_ROOT;

/// Walks upward from `start` to the first directory holding `configs/harness`,
/// falling back to the nearest directory with a `Cargo.toml`.
#[must_use]
pub fn discover_workspace_root(start: &Path) -> Option<PathBuf> {
    find_upward(start, |dir| dir.join("configs").join("harness").is_dir())
        .or_else(|| find_upward(start, |dir| dir.join("Cargo.toml").is_file()))
}

fn find_upward(start: &Path, marker: impl Fn(&Path) -> bool) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| marker(dir))
        .map(Path::to_path_buf)
}

/// `GOVHARNESS_ROOT` when set and non-empty, otherwise the discovered root
/// above the current directory, otherwise the current directory itself.
#[must_use]
pub fn resolve_workspace_root() -> PathBuf {
    if let Ok(explicit) = std::env::var(ENV_GOVHARNESS_ROOT) {
        let trimmed = explicit.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    discover_workspace_root(&cwd).unwrap_or(cwd)
}
