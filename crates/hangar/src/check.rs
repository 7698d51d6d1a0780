// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hangar check` command implementation.

use std::path::Path;

use hangar_config::HangarConfig;
use hangar_core::HangarError;
use hangar_plugin::load_manifest;

pub fn run_check(config: &HangarConfig, dir: &Path) -> Result<(), HangarError> {
    println!("{}", render_manifest(config, dir)?);
    Ok(())
}

/// Normalized manifest of the plugin in `dir`, as pretty JSON.
fn render_manifest(config: &HangarConfig, dir: &Path) -> Result<String, HangarError> {
    let manifest = load_manifest(&dir.join(&config.loader.manifest_file))?;
    serde_json::to_string_pretty(&manifest)
        .map_err(|e| HangarError::Internal(format!("cannot render manifest: {e}")))
}
