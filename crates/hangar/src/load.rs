// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hangar load` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use hangar_config::HangarConfig;
use hangar_core::HangarError;
use hangar_plugin::{LoadReport, PluginLoader, PluginRegistry};
use tracing::info;

/// Load plugins from `paths`, or from the configured roots when empty.
///
/// Prints every registered runner, then what was skipped, failed, or removed.
/// If any candidate failed, the first failure becomes the command's error.
pub async fn run_load(config: &HangarConfig, paths: Vec<PathBuf>) -> Result<(), HangarError> {
    let roots = if paths.is_empty() {
        config.loader.plugin_paths.iter().map(PathBuf::from).collect()
    } else {
        paths
    };

    let store = hangar_storage::open_catalog(&config.storage).await?;
    let registry = Arc::new(PluginRegistry::new());
    let loader = PluginLoader::new(registry.clone(), store)
        .with_manifest_file(config.loader.manifest_file.clone());

    info!(roots = ?roots, backend = ?config.storage.backend, "loading plugins");
    let report = loader.load_plugins_from(&roots).await?;

    print!("{}", render_report(&registry, &report));
    loader.unload_all();

    match report.failed.into_iter().next() {
        Some(first) => Err(first.error),
        None => Ok(()),
    }
}

fn render_report(registry: &PluginRegistry, report: &LoadReport) -> String {
    let mut out = String::new();
    for runner in registry.all() {
        out.push_str(&format!(
            "{}  {}\n",
            runner.unique_name(),
            runner.command_line().join(" ")
        ));
    }
    for path in &report.skipped {
        out.push_str(&format!("skipped  {}\n", path.display()));
    }
    for failed in &report.failed {
        out.push_str(&format!(
            "failed   {}: {}\n",
            failed.path.display(),
            failed.error
        ));
    }
    for unmet in &report.removed {
        let missing: Vec<&str> = unmet.missing.iter().map(String::as_str).collect();
        out.push_str(&format!(
            "removed  {} (missing: {})\n",
            unmet.plugin,
            missing.join(", ")
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use hangar_plugin::{FailedLoad, UnmetRequirement};

    use super::*;

    #[test]
    fn report_lists_each_section() {
        let registry = PluginRegistry::new();
        let report = LoadReport {
            loaded: vec![],
            skipped: vec![PathBuf::from("plugins/empty")],
            failed: vec![FailedLoad {
                path: PathBuf::from("plugins/broken"),
                error: HangarError::Configuration("manifest is missing required key NAME".into()),
            }],
            removed: vec![UnmetRequirement {
                plugin: "bar".into(),
                missing: BTreeSet::from(["NOT_FOUND".to_string()]),
            }],
        };

        let out = render_report(&registry, &report);
        assert!(out.contains("skipped  plugins/empty"));
        assert!(out.contains("failed   plugins/broken"));
        assert!(out.contains("removed  bar (missing: NOT_FOUND)"));
    }

    #[tokio::test]
    async fn load_from_explicit_root_with_memory_store() {
        let root = tempfile::tempdir().unwrap();
        let plugin = root.path().join("foo");
        std::fs::create_dir(&plugin).unwrap();
        std::fs::write(
            plugin.join("plugin.toml"),
            "NAME = \"foo\"\nVERSION = \"1.0\"\nPLUGIN_ENTRY = \"run.sh\"",
        )
        .unwrap();

        let mut config = HangarConfig::default();
        config.storage.backend = hangar_config::StorageBackend::Memory;
        run_load(&config, vec![root.path().to_path_buf()]).await.unwrap();
    }

    #[tokio::test]
    async fn failed_candidate_becomes_the_error() {
        let root = tempfile::tempdir().unwrap();
        let plugin = root.path().join("broken");
        std::fs::create_dir(&plugin).unwrap();
        std::fs::write(plugin.join("plugin.toml"), "VERSION = \"1.0\"").unwrap();

        let mut config = HangarConfig::default();
        config.storage.backend = hangar_config::StorageBackend::Memory;
        let err = run_load(&config, vec![root.path().to_path_buf()])
            .await
            .unwrap_err();
        assert!(matches!(err, HangarError::Configuration(_)));
    }
}
