// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./hangar.toml` > `~/.config/hangar/hangar.toml` > `/etc/hangar/hangar.toml`,
//! with environment variable overrides via the `HANGAR_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::HangarConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/hangar/hangar.toml";

/// Configuration file looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = "hangar.toml";

/// Per-user configuration file under the XDG config directory, if one exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("hangar").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/hangar/hangar.toml`
/// 3. `~/.config/hangar/hangar.toml`
/// 4. `./hangar.toml`
/// 5. `HANGAR_*` environment variables
pub fn load_config() -> Result<HangarConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no environment).
pub fn load_config_from_str(toml_content: &str) -> Result<HangarConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HangarConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, still honouring env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HangarConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HangarConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment without extracting it.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(HangarConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Top-level config sections that environment variables can address.
const ENV_SECTIONS: &[&str] = &["loader", "storage", "logging"];

/// Environment provider mapping `HANGAR_<SECTION>_<KEY>` to `section.key`.
///
/// Figment hands over the key in its original case, so it is lowercased
/// first. Only the first underscore after a known section name becomes a dot,
/// so `HANGAR_STORAGE_DATABASE_PATH` maps to `storage.database_path`.
fn env_provider() -> Env {
    Env::prefixed("HANGAR_").map(|key| {
        let key = key.as_str().to_ascii_lowercase();
        match key.split_once('_') {
            Some((section, field)) if ENV_SECTIONS.contains(&section) => {
                format!("{section}.{field}").into()
            }
            _ => key.into(),
        }
    })
}
