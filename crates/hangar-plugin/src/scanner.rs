// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discovery of candidate plugin directories.

use std::path::{Path, PathBuf};

use tracing::warn;

/// Immediate subdirectories of `root`, sorted lexically.
///
/// A missing root or a path that does not exist yields nothing. Scanning never
/// recurses and never fails; an unreadable root is logged and skipped.
pub fn scan_plugin_path(root: Option<&Path>) -> Vec<PathBuf> {
    let Some(root) = root else {
        return Vec::new();
    };
    if !root.exists() {
        return Vec::new();
    }

    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %root.display(), error = %e, "cannot read plugin root");
            return Vec::new();
        }
    };

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    dirs
}

/// Scan several roots, concatenating results in the order the roots are given.
pub fn scan_plugin_paths<P: AsRef<Path>>(roots: &[P]) -> Vec<PathBuf> {
    roots
        .iter()
        .flat_map(|root| scan_plugin_path(Some(root.as_ref())))
        .collect()
}
