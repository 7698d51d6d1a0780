// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::{HangarConfig, StorageBackend};

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &HangarConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let manifest_file = config.loader.manifest_file.trim();
    if manifest_file.is_empty() {
        errors.push(ConfigError::Validation {
            message: "loader.manifest_file must not be empty".to_string(),
        });
    } else if manifest_file.contains('/') || manifest_file.contains('\\') {
        errors.push(ConfigError::Validation {
            message: format!(
                "loader.manifest_file `{manifest_file}` must be a bare file name, not a path"
            ),
        });
    }

    for (i, path) in config.loader.plugin_paths.iter().enumerate() {
        if path.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("loader.plugin_paths[{i}] must not be empty"),
            });
        }
    }

    if config.storage.backend == StorageBackend::Sqlite
        && config.storage.database_path.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty for the sqlite backend".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
