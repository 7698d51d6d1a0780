// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Hangar plugin loader.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level Hangar configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HangarConfig {
    /// Plugin discovery settings.
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Catalog persistence settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log output settings for the loader itself.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Plugin discovery configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderConfig {
    /// Root directories whose immediate subdirectories are plugin candidates.
    #[serde(default = "default_plugin_paths")]
    pub plugin_paths: Vec<String>,

    /// File name of the manifest inside each plugin directory.
    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            plugin_paths: default_plugin_paths(),
            manifest_file: default_manifest_file(),
        }
    }
}

fn default_plugin_paths() -> Vec<String> {
    vec!["plugins".to_string()]
}

fn default_manifest_file() -> String {
    "plugin.toml".to_string()
}

/// Which catalog backend to open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// SQLite database file.
    #[default]
    Sqlite,
    /// Process-local catalog; forgotten on exit.
    Memory,
}

/// Catalog persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Backend used for the system/instance catalog.
    #[serde(default)]
    pub backend: StorageBackend,

    /// Path to the SQLite database file. Ignored by the memory backend.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "hangar.db".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter level for hangar crates (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
