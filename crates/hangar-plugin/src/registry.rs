// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory registry of loaded runner descriptors.
//!
//! The `PluginRegistry` maps runner unique names (`name[instance]-version`)
//! to their `RunnerDescriptor`. It is shared as `Arc<PluginRegistry>`; each
//! mutation takes the write lock exactly once, so readers never observe a
//! plugin with half of its instances replaced.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::runner::RunnerDescriptor;

/// Registry of runnable plugin instances keyed by unique name.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    entries: RwLock<BTreeMap<String, RunnerDescriptor>>,
}

impl PluginRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, RunnerDescriptor>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, RunnerDescriptor>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a descriptor, replacing any entry with the same unique name.
    pub fn add(&self, descriptor: RunnerDescriptor) {
        let key = descriptor.unique_name();
        debug!(runner = %key, "registering runner");
        self.write().insert(key, descriptor);
    }

    /// Remove one descriptor. Removing an absent name is a no-op.
    pub fn remove(&self, unique_name: &str) -> Option<RunnerDescriptor> {
        self.write().remove(unique_name)
    }

    pub fn get(&self, unique_name: &str) -> Option<RunnerDescriptor> {
        self.read().get(unique_name).cloned()
    }

    /// All descriptors, ordered by unique name.
    pub fn all(&self) -> Vec<RunnerDescriptor> {
        self.read().values().cloned().collect()
    }

    pub fn unique_names(&self) -> BTreeSet<String> {
        self.read().keys().cloned().collect()
    }

    /// Distinct plugin names with at least one registered instance.
    pub fn plugin_names(&self) -> BTreeSet<String> {
        self.read()
            .values()
            .map(|d| d.plugin_name.clone())
            .collect()
    }

    /// Replace every descriptor of one plugin name and version with `descriptors`.
    ///
    /// All descriptors must share the same plugin name and version. Instances
    /// that no longer appear are dropped in the same critical section.
    pub fn register_plugin(&self, descriptors: Vec<RunnerDescriptor>) {
        let Some(first) = descriptors.first() else {
            return;
        };
        let (name, version) = (first.plugin_name.clone(), first.version.clone());

        let mut entries = self.write();
        entries.retain(|_, d| !(d.plugin_name == name && d.version == version));
        for descriptor in descriptors {
            entries.insert(descriptor.unique_name(), descriptor);
        }
        debug!(plugin = %name, version = %version, "registered plugin instances");
    }

    /// Remove every instance of `plugin_name`, across all versions.
    pub fn remove_plugin(&self, plugin_name: &str) -> Vec<RunnerDescriptor> {
        let mut entries = self.write();
        let keys: Vec<String> = entries
            .iter()
            .filter(|(_, d)| d.plugin_name == plugin_name)
            .map(|(k, _)| k.clone())
            .collect();
        keys.iter().filter_map(|k| entries.remove(k)).collect()
    }

    /// Registered instances of one plugin, ordered by unique name.
    pub fn by_plugin(&self, plugin_name: &str) -> Vec<RunnerDescriptor> {
        self.read()
            .values()
            .filter(|d| d.plugin_name == plugin_name)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Drain the registry, returning what was registered.
    pub fn clear(&self) -> Vec<RunnerDescriptor> {
        std::mem::take(&mut *self.write()).into_values().collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use hangar_core::{PersistedInstance, PersistedSystem};

    use super::*;
    use crate::manifest::parse_manifest;

    /// Descriptor for `plugin[instance]-version` with the given requirements.
    pub(crate) fn runner(plugin: &str, instance: &str, version: &str, requires: &[&str]) -> RunnerDescriptor {
        let requires = requires
            .iter()
            .map(|r| format!("\"{r}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let manifest = parse_manifest(&format!(
            "NAME = \"{plugin}\"\nVERSION = \"{version}\"\nPLUGIN_ENTRY = \"run\"\nINSTANCES = [\"{instance}\"]\nREQUIRES = [{requires}]"
        ))
        .unwrap();
        let system = PersistedSystem::new(plugin, version);
        let instance = PersistedInstance::new(instance);
        RunnerDescriptor::new(&manifest, PathBuf::from(plugin), &system, &instance)
    }

    #[test]
    fn add_and_get_roundtrip() {
        let registry = PluginRegistry::new();
        registry.add(runner("foo", "default", "1.0", &[]));

        let got = registry.get("foo[default]-1.0").unwrap();
        assert_eq!(got.plugin_name, "foo");
        assert!(registry.get("foo[other]-1.0").is_none());
    }

    #[test]
    fn add_replaces_same_unique_name() {
        let registry = PluginRegistry::new();
        let first = runner("foo", "default", "1.0", &[]);
        let second = runner("foo", "default", "1.0", &["bar"]);
        registry.add(first);
        registry.add(second.clone());

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("foo[default]-1.0"), Some(second));
    }

    #[test]
    fn remove_absent_is_noop() {
        let registry = PluginRegistry::new();
        registry.add(runner("foo", "default", "1.0", &[]));

        assert!(registry.remove("nope[default]-1.0").is_none());
        assert_eq!(registry.len(), 1);
        assert!(registry.remove("foo[default]-1.0").is_some());
        assert!(registry.is_empty());
    }

    #[test]
    fn all_is_sorted_by_unique_name() {
        let registry = PluginRegistry::new();
        registry.add(runner("zeta", "default", "1.0", &[]));
        registry.add(runner("alpha", "b", "1.0", &[]));
        registry.add(runner("alpha", "a", "1.0", &[]));

        let names: Vec<String> = registry.all().iter().map(|d| d.unique_name()).collect();
        assert_eq!(names, vec!["alpha[a]-1.0", "alpha[b]-1.0", "zeta[default]-1.0"]);
        assert_eq!(
            registry.plugin_names(),
            BTreeSet::from(["alpha".to_string(), "zeta".to_string()])
        );
    }

    #[test]
    fn register_plugin_replaces_instance_set() {
        let registry = PluginRegistry::new();
        registry.register_plugin(vec![
            runner("foo", "instance1", "1.0", &[]),
            runner("foo", "instance2", "1.0", &[]),
        ]);
        registry.add(runner("foo", "default", "2.0", &[]));
        registry.register_plugin(vec![
            runner("foo", "instance2", "1.0", &[]),
            runner("foo", "instance3", "1.0", &[]),
        ]);

        assert_eq!(
            registry.unique_names(),
            BTreeSet::from([
                "foo[default]-2.0".to_string(),
                "foo[instance2]-1.0".to_string(),
                "foo[instance3]-1.0".to_string(),
            ])
        );
    }

    #[test]
    fn remove_plugin_drops_every_version() {
        let registry = PluginRegistry::new();
        registry.add(runner("foo", "a", "1.0", &[]));
        registry.add(runner("foo", "b", "2.0", &[]));
        registry.add(runner("bar", "default", "1.0", &[]));

        let removed = registry.remove_plugin("foo");
        assert_eq!(removed.len(), 2);
        assert_eq!(registry.by_plugin("foo").len(), 0);
        assert_eq!(registry.by_plugin("bar").len(), 1);
    }

    #[test]
    fn clear_drains_everything() {
        let registry = PluginRegistry::new();
        registry.add(runner("foo", "a", "1.0", &[]));
        registry.add(runner("bar", "a", "1.0", &[]));

        assert_eq!(registry.clear().len(), 2);
        assert!(registry.is_empty());
    }

    #[test]
    fn concurrent_readers_see_whole_plugins() {
        let registry = Arc::new(PluginRegistry::new());
        let writer = {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    registry.register_plugin(vec![
                        runner("foo", "a", "1.0", &[]),
                        runner("foo", "b", "1.0", &[]),
                    ]);
                }
            })
        };
        for _ in 0..200 {
            let count = registry.by_plugin("foo").len();
            assert!(count == 0 || count == 2, "saw {count} instances");
        }
        writer.join().unwrap();
    }
}
