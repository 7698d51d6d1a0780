// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end loader testing.
//!
//! `TestHarness` assembles a complete loader stack: a temp plugin root, a
//! catalog store (in-memory or temp SQLite) behind a [`FlakyStore`], a
//! [`RecordingEventSink`], and a fresh registry.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hangar_config::model::{StorageBackend, StorageConfig};
use hangar_core::{CatalogStore, HangarError};
use hangar_plugin::{LoadOutcome, LoadReport, PluginLoader, PluginRegistry};
use hangar_storage::open_catalog;

use crate::flaky_store::FlakyStore;
use crate::plugin_dir::PluginDirBuilder;
use crate::recording_sink::RecordingEventSink;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    backend: StorageBackend,
    manifest_file: Option<String>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            backend: StorageBackend::Memory,
            manifest_file: None,
        }
    }

    /// Back the catalog with a temp SQLite database instead of memory.
    pub fn with_sqlite(mut self) -> Self {
        self.backend = StorageBackend::Sqlite;
        self
    }

    pub fn with_manifest_file(mut self, name: &str) -> Self {
        self.manifest_file = Some(name.to_string());
        self
    }

    pub async fn build(self) -> Result<TestHarness, HangarError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| HangarError::Storage { source: e.into() })?;
        let plugins_root = temp_dir.path().join("plugins");
        std::fs::create_dir_all(&plugins_root)
            .map_err(|e| HangarError::Storage { source: e.into() })?;

        let storage_config = StorageConfig {
            backend: self.backend,
            database_path: temp_dir
                .path()
                .join("catalog.db")
                .to_string_lossy()
                .into_owned(),
        };
        let inner = open_catalog(&storage_config).await?;
        let store = Arc::new(FlakyStore::new(inner));
        let events = Arc::new(RecordingEventSink::new());
        let registry = Arc::new(PluginRegistry::new());

        let mut loader = PluginLoader::new(registry.clone(), store.clone());
        if let Some(name) = &self.manifest_file {
            loader = loader.with_manifest_file(name.clone());
        }
        let manifest_file = self
            .manifest_file
            .unwrap_or_else(|| hangar_plugin::MANIFEST_FILE_NAME.to_string());
        let loader = loader.with_events(events.clone());

        Ok(TestHarness {
            registry,
            store,
            events,
            loader,
            plugins_root,
            manifest_file,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete loader environment over a temp plugin root.
pub struct TestHarness {
    pub registry: Arc<PluginRegistry>,
    /// Catalog store with failure injection.
    pub store: Arc<FlakyStore>,
    pub events: Arc<RecordingEventSink>,
    pub loader: PluginLoader,
    plugins_root: PathBuf,
    manifest_file: String,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Default harness: in-memory catalog, default manifest name.
    pub async fn new() -> Result<Self, HangarError> {
        Self::builder().build().await
    }

    pub fn plugins_root(&self) -> &Path {
        &self.plugins_root
    }

    /// Start a plugin directory named `dir` under the plugin root.
    pub fn plugin(&self, dir: &str) -> PluginDirBuilder {
        PluginDirBuilder::new(self.plugins_root(), dir).manifest_file(&self.manifest_file)
    }

    /// Batch-load everything under the plugin root.
    pub async fn load(&self) -> Result<LoadReport, HangarError> {
        self.loader.load_plugins(Some(self.plugins_root())).await
    }

    pub async fn load_one(&self, dir: &str) -> Result<LoadOutcome, HangarError> {
        self.loader.load_plugin(&self.plugins_root().join(dir)).await
    }

    pub fn catalog(&self) -> Arc<dyn CatalogStore> {
        self.store.clone()
    }
}
