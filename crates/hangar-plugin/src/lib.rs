// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin discovery, manifest parsing, instance reconciliation, and the
//! runner registry.
//!
//! A plugin is a directory holding a `plugin.toml` manifest. Loading one
//! parses the manifest, reconciles its declared instances against the
//! catalog store, and registers one `RunnerDescriptor` per instance. After a
//! batch, plugins whose requirements are not registered are removed until
//! nothing else changes.

pub mod events;
pub mod loader;
pub mod manifest;
pub mod reconcile;
pub mod registry;
pub mod requirements;
pub mod runner;
pub mod scanner;
pub mod validator;

#[cfg(test)]
mod test_support;

pub use events::TracingEventSink;
pub use loader::{FailedLoad, LoadOutcome, LoadReport, PluginLoader};
pub use manifest::{
    ArgsSpec, MANIFEST_FILE_NAME, PluginManifest, load_manifest, parse_manifest,
    resolve_instances,
};
pub use reconcile::{InstancePlan, InstanceReconciler, Reconciliation, plan_instances};
pub use registry::PluginRegistry;
pub use requirements::{UnmetRequirement, validate_plugin_requirements};
pub use runner::RunnerDescriptor;
pub use scanner::{scan_plugin_path, scan_plugin_paths};
pub use validator::ManifestPresenceValidator;
