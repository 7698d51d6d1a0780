// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconciliation of a manifest's declared instances against the catalog.
//!
//! Identities are minted once and then preserved: an instance that stays
//! declared keeps its `InstanceId` across loads, new names get fresh ids, and
//! persisted instances no longer declared are retired. The updated system is
//! written back in a single store call, so a rejected write leaves the
//! catalog exactly as it was.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use hangar_core::{CatalogStore, HangarError, PersistedInstance, PersistedSystem};
use tracing::debug;

use crate::manifest::PluginManifest;
use crate::runner::RunnerDescriptor;

/// How the persisted instance set changes to match the declared one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstancePlan {
    /// Persisted instances that stay, identities untouched.
    pub keep: Vec<PersistedInstance>,
    /// Declared names with no persisted instance yet.
    pub create: Vec<String>,
    /// Persisted instances no longer declared.
    pub retire: Vec<PersistedInstance>,
}

impl InstancePlan {
    pub fn is_noop(&self) -> bool {
        self.create.is_empty() && self.retire.is_empty()
    }
}

/// Compare declared instance names with the persisted instances.
///
/// `keep` and `create` follow the declared order; `retire` follows the
/// persisted order.
pub fn plan_instances(desired: &[String], existing: &[PersistedInstance]) -> InstancePlan {
    let wanted: BTreeSet<&str> = desired.iter().map(String::as_str).collect();
    let mut plan = InstancePlan::default();

    for name in desired {
        match existing.iter().find(|i| &i.name == name) {
            Some(instance) => plan.keep.push(instance.clone()),
            None => plan.create.push(name.clone()),
        }
    }
    plan.retire = existing
        .iter()
        .filter(|i| !wanted.contains(i.name.as_str()))
        .cloned()
        .collect();
    plan
}

/// Result of reconciling one plugin.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// The system as persisted by the store.
    pub system: PersistedSystem,
    pub plan: InstancePlan,
    /// One runner per declared instance, in manifest order.
    pub runners: Vec<RunnerDescriptor>,
}

/// Brings the catalog in line with a manifest.
pub struct InstanceReconciler {
    store: Arc<dyn CatalogStore>,
}

impl InstanceReconciler {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn reconcile(
        &self,
        manifest: &PluginManifest,
        plugin_dir: &Path,
    ) -> Result<Reconciliation, HangarError> {
        let existing = self
            .store
            .find_system(&manifest.name, &manifest.version)
            .await?;
        let is_new = existing.is_none();
        let mut system = existing
            .unwrap_or_else(|| PersistedSystem::new(&manifest.name, &manifest.version));

        let plan = plan_instances(&manifest.instances, &system.instances);
        debug!(
            plugin = %manifest.name,
            version = %manifest.version,
            keep = plan.keep.len(),
            create = ?plan.create,
            retire = ?plan.retire.iter().map(|i| &i.name).collect::<Vec<_>>(),
            "planned instance reconciliation"
        );

        system.instances = manifest
            .instances
            .iter()
            .map(|name| {
                plan.keep
                    .iter()
                    .find(|i| &i.name == name)
                    .cloned()
                    .unwrap_or_else(|| PersistedInstance::new(name.clone()))
            })
            .collect();
        system.description = manifest.description.clone();
        system.display_name = manifest.display_name.clone();
        system.icon_name = manifest.icon_name.clone();
        system.metadata = manifest.metadata.clone();

        let persisted = if is_new {
            self.store.create_system(&system).await?
        } else {
            self.store.update_system(&system).await?
        };

        let runners = manifest
            .instances
            .iter()
            .map(|name| {
                persisted
                    .instance(name)
                    .map(|instance| {
                        RunnerDescriptor::new(
                            manifest,
                            plugin_dir.to_path_buf(),
                            &persisted,
                            instance,
                        )
                    })
                    .ok_or_else(|| {
                        HangarError::Internal(format!(
                            "store dropped instance `{name}` of `{}`",
                            manifest.name
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Reconciliation {
            system: persisted,
            plan,
            runners,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use hangar_storage::MemoryCatalog;

    use super::*;
    use crate::manifest::parse_manifest;
    use crate::test_support::RejectingStore;

    fn manifest(instances: &[&str]) -> PluginManifest {
        let list = instances
            .iter()
            .map(|i| format!("\"{i}\""))
            .collect::<Vec<_>>()
            .join(", ");
        parse_manifest(&format!(
            "NAME = \"foo\"\nVERSION = \"1.0\"\nPLUGIN_ENTRY = \"run\"\nINSTANCES = [{list}]\nDESCRIPTION = \"d\""
        ))
        .unwrap()
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn plan_splits_keep_create_retire() {
        let existing = vec![
            PersistedInstance::new("instance1"),
            PersistedInstance::new("instance2"),
        ];
        let plan = plan_instances(&names(&["instance2", "instance3"]), &existing);

        assert_eq!(plan.keep, vec![existing[1].clone()]);
        assert_eq!(plan.create, names(&["instance3"]));
        assert_eq!(plan.retire, vec![existing[0].clone()]);
        assert!(!plan.is_noop());
        assert!(plan_instances(&names(&["instance1", "instance2"]), &existing).is_noop());
    }

    #[tokio::test]
    async fn new_system_is_created_with_fresh_ids() {
        let store = Arc::new(MemoryCatalog::new());
        let reconciler = InstanceReconciler::new(store.clone());

        let result = reconciler
            .reconcile(&manifest(&["a", "b"]), Path::new("/plugins/foo"))
            .await
            .unwrap();

        assert_eq!(result.system.instance_names(), vec!["a", "b"]);
        assert_eq!(result.system.description, "d");
        let unique: Vec<String> = result.runners.iter().map(|r| r.unique_name()).collect();
        assert_eq!(unique, vec!["foo[a]-1.0", "foo[b]-1.0"]);
        assert_ne!(result.runners[0].instance_id, result.runners[1].instance_id);
        assert_eq!(result.runners[0].plugin_dir, PathBuf::from("/plugins/foo"));
        assert_eq!(store.list_systems().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn existing_identities_survive_and_stale_instances_retire() {
        let store = Arc::new(MemoryCatalog::new());
        let reconciler = InstanceReconciler::new(store.clone());
        let dir = Path::new("/plugins/foo");

        let first = reconciler
            .reconcile(&manifest(&["instance1", "instance2"]), dir)
            .await
            .unwrap();
        let second = reconciler
            .reconcile(&manifest(&["instance2", "instance3"]), dir)
            .await
            .unwrap();

        let kept_before = first.system.instance("instance2").unwrap();
        let kept_after = second.system.instance("instance2").unwrap();
        assert_eq!(kept_before.id, kept_after.id);
        assert_eq!(second.system.id, first.system.id);
        assert_eq!(second.system.instance_names(), vec!["instance2", "instance3"]);
        assert_eq!(second.plan.retire[0].name, "instance1");

        let retired_id = &first.system.instance("instance1").unwrap().id;
        assert!(store.find_instance(retired_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn repeated_reconciliation_is_stable() {
        let store = Arc::new(MemoryCatalog::new());
        let reconciler = InstanceReconciler::new(store);
        let dir = Path::new("/plugins/foo");

        let first = reconciler.reconcile(&manifest(&["a"]), dir).await.unwrap();
        let second = reconciler.reconcile(&manifest(&["a"]), dir).await.unwrap();
        assert!(second.plan.is_noop());
        assert_eq!(first.runners[0].instance_id, second.runners[0].instance_id);
    }

    #[tokio::test]
    async fn rejected_write_emits_nothing() {
        let store = Arc::new(RejectingStore::default());
        let reconciler = InstanceReconciler::new(store.clone());

        let err = reconciler
            .reconcile(&manifest(&["a"]), Path::new("/plugins/foo"))
            .await
            .unwrap_err();
        assert!(matches!(err, HangarError::PersistenceConflict { .. }));
        assert!(store.list_systems().await.unwrap().is_empty());
    }
}
