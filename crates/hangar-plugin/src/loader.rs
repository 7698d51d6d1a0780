// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Top-level load orchestration.
//!
//! A batch scans one or more roots, loads every candidate in order, and then
//! runs requirement validation exactly once. A failing candidate is logged,
//! published, and recorded in the report; it never stops the batch.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hangar_core::{CatalogStore, EventSink, HangarError, LoaderEvent, StructuralValidator};
use tracing::{debug, info, warn};

use crate::events::TracingEventSink;
use crate::manifest::{MANIFEST_FILE_NAME, load_manifest};
use crate::reconcile::InstanceReconciler;
use crate::registry::PluginRegistry;
use crate::requirements::{UnmetRequirement, validate_plugin_requirements};
use crate::runner::RunnerDescriptor;
use crate::scanner::{scan_plugin_path, scan_plugin_paths};
use crate::validator::ManifestPresenceValidator;

/// Result of loading one candidate directory.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(Vec<RunnerDescriptor>),
    /// The structural validator rejected the directory.
    NotAPlugin,
}

/// A candidate that failed to load.
#[derive(Debug)]
pub struct FailedLoad {
    pub path: PathBuf,
    pub error: HangarError,
}

/// Summary of a batch load.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Unique names of runners still registered after validation.
    pub loaded: Vec<String>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<FailedLoad>,
    pub removed: Vec<UnmetRequirement>,
}

/// Loads plugin directories into a shared registry.
pub struct PluginLoader {
    registry: Arc<PluginRegistry>,
    reconciler: InstanceReconciler,
    validator: Arc<dyn StructuralValidator>,
    events: Arc<dyn EventSink>,
    manifest_file: String,
}

impl PluginLoader {
    /// Loader with the manifest-presence validator and the tracing event sink.
    pub fn new(registry: Arc<PluginRegistry>, store: Arc<dyn CatalogStore>) -> Self {
        Self {
            registry,
            reconciler: InstanceReconciler::new(store),
            validator: Arc::new(ManifestPresenceValidator::default()),
            events: Arc::new(TracingEventSink),
            manifest_file: MANIFEST_FILE_NAME.to_string(),
        }
    }

    /// Use a different manifest file name. Also resets the validator to check
    /// for that name, so call it before `with_validator`.
    pub fn with_manifest_file(mut self, manifest_file: impl Into<String>) -> Self {
        self.manifest_file = manifest_file.into();
        self.validator = Arc::new(ManifestPresenceValidator::new(self.manifest_file.clone()));
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn StructuralValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    /// Load one plugin directory and register its runners.
    ///
    /// Does not check requirements; see [`PluginLoader::hot_load`].
    pub async fn load_plugin(&self, path: &Path) -> Result<LoadOutcome, HangarError> {
        if !self.validator.validate(path) {
            debug!(path = %path.display(), "not a plugin directory");
            return Ok(LoadOutcome::NotAPlugin);
        }

        let manifest = load_manifest(&path.join(&self.manifest_file))?;
        let reconciliation = self.reconciler.reconcile(&manifest, path).await?;

        // The catalog write has committed; the registry must follow it before
        // anything else can fail.
        let runners = reconciliation.runners;
        let names: Vec<String> = runners.iter().map(RunnerDescriptor::unique_name).collect();
        self.registry.register_plugin(runners.clone());
        info!(
            plugin = %manifest.name,
            version = %manifest.version,
            instances = runners.len(),
            "registered plugin"
        );

        if !reconciliation.plan.retire.is_empty() {
            self.notify(LoaderEvent::InstancesRetired {
                plugin: manifest.name.clone(),
                version: manifest.version.clone(),
                instances: reconciliation
                    .plan
                    .retire
                    .iter()
                    .map(|i| i.name.clone())
                    .collect(),
            });
        }
        self.notify(LoaderEvent::PluginLoaded {
            plugin: manifest.name,
            version: manifest.version,
            runners: names,
        });

        Ok(LoadOutcome::Loaded(runners))
    }

    /// Load every plugin directly under `root`, then validate requirements.
    pub async fn load_plugins(&self, root: Option<&Path>) -> Result<LoadReport, HangarError> {
        self.load_candidates(scan_plugin_path(root)).await
    }

    /// Load every plugin under each root in order, validating once at the end.
    pub async fn load_plugins_from<P: AsRef<Path>>(
        &self,
        roots: &[P],
    ) -> Result<LoadReport, HangarError> {
        self.load_candidates(scan_plugin_paths(roots)).await
    }

    async fn load_candidates(&self, candidates: Vec<PathBuf>) -> Result<LoadReport, HangarError> {
        let mut report = LoadReport::default();

        for path in candidates {
            match self.load_plugin(&path).await {
                Ok(LoadOutcome::Loaded(runners)) => {
                    report
                        .loaded
                        .extend(runners.iter().map(RunnerDescriptor::unique_name));
                }
                Ok(LoadOutcome::NotAPlugin) => report.skipped.push(path),
                Err(error) => {
                    warn!(path = %path.display(), error = %error, "failed to load plugin");
                    self.notify(LoaderEvent::PluginLoadFailed {
                        path: path.clone(),
                        error: error.to_string(),
                    });
                    report.failed.push(FailedLoad { path, error });
                }
            }
        }

        report.removed = validate_plugin_requirements(&self.registry, self.events.as_ref())?;
        report.loaded.retain(|name| self.registry.get(name).is_some());

        info!(
            loaded = report.loaded.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            removed = report.removed.len(),
            "plugin batch complete"
        );
        Ok(report)
    }

    /// Load one plugin outside a batch and re-run requirement validation.
    pub async fn hot_load(
        &self,
        path: &Path,
    ) -> Result<(LoadOutcome, Vec<UnmetRequirement>), HangarError> {
        let outcome = self.load_plugin(path).await?;
        let removed = validate_plugin_requirements(&self.registry, self.events.as_ref())?;
        Ok((outcome, removed))
    }

    /// Publish a notification about work that has already happened.
    ///
    /// A sink failure is logged and dropped; the registry and catalog stay as
    /// they are.
    fn notify(&self, event: LoaderEvent) {
        let kind = event.kind();
        if let Err(e) = self.events.publish(event) {
            warn!(event = kind, error = %e, "could not publish loader event");
        }
    }

    /// Drain the registry at shutdown.
    pub fn unload_all(&self) -> Vec<RunnerDescriptor> {
        let drained = self.registry.clear();
        info!(runners = drained.len(), "unloaded all plugins");
        drained
    }
}
