// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structural validation of plugin candidates.

use std::path::Path;

/// Decides whether a scanned directory looks like a plugin at all.
///
/// A rejected candidate is skipped, not reported as a failure. A candidate
/// that passes but carries a malformed manifest is a load error.
pub trait StructuralValidator: Send + Sync {
    /// Returns `true` if `path` is structurally a plugin.
    fn validate(&self, path: &Path) -> bool;
}
