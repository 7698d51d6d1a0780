// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structural check deciding whether a directory is a plugin at all.

use std::path::Path;

use hangar_core::StructuralValidator;

use crate::manifest::MANIFEST_FILE_NAME;

/// Accepts directories containing the manifest file as a regular file.
#[derive(Debug, Clone)]
pub struct ManifestPresenceValidator {
    manifest_file: String,
}

impl ManifestPresenceValidator {
    pub fn new(manifest_file: impl Into<String>) -> Self {
        Self {
            manifest_file: manifest_file.into(),
        }
    }
}

impl Default for ManifestPresenceValidator {
    fn default() -> Self {
        Self::new(MANIFEST_FILE_NAME)
    }
}

impl StructuralValidator for ManifestPresenceValidator {
    fn validate(&self, path: &Path) -> bool {
        path.is_dir() && path.join(&self.manifest_file).is_file()
    }
}
