// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-local catalog store with the same conflict rules as SQLite.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use hangar_core::{
    CatalogStore, HangarError, InstanceId, PersistedInstance, PersistedSystem, SystemId,
};

type Key = (String, String);

/// In-memory catalog keyed by `(name, version)`.
///
/// Every write happens under one lock, and updates must carry the stored
/// revision.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    systems: Mutex<BTreeMap<Key, PersistedSystem>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<Key, PersistedSystem>> {
        self.systems.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn key(system: &PersistedSystem) -> Key {
    (system.name.clone(), system.version.clone())
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn find_system(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Option<PersistedSystem>, HangarError> {
        Ok(self
            .lock()
            .get(&(name.to_string(), version.to_string()))
            .cloned())
    }

    async fn create_system(&self, system: &PersistedSystem) -> Result<PersistedSystem, HangarError> {
        let mut systems = self.lock();
        if systems.contains_key(&key(system)) {
            return Err(HangarError::system_conflict(&system.name, &system.version));
        }
        let mut stored = system.clone();
        stored.revision = 1;
        systems.insert(key(system), stored.clone());
        Ok(stored)
    }

    async fn update_system(&self, system: &PersistedSystem) -> Result<PersistedSystem, HangarError> {
        let mut systems = self.lock();
        match systems.get_mut(&key(system)) {
            Some(current) if current.id == system.id && current.revision == system.revision => {
                let mut stored = system.clone();
                stored.revision += 1;
                *current = stored.clone();
                Ok(stored)
            }
            _ => Err(HangarError::system_conflict(&system.name, &system.version)),
        }
    }

    async fn delete_system(&self, system: &PersistedSystem) -> Result<(), HangarError> {
        let mut systems = self.lock();
        match systems.get(&key(system)) {
            Some(current) if current.id == system.id => {
                systems.remove(&key(system));
                Ok(())
            }
            _ => Err(HangarError::NotFound {
                kind: "system".to_string(),
                key: format!("{}-{}", system.name, system.version),
            }),
        }
    }

    async fn find_instance(
        &self,
        id: &InstanceId,
    ) -> Result<Option<(SystemId, PersistedInstance)>, HangarError> {
        Ok(self.lock().values().find_map(|system| {
            system
                .instances
                .iter()
                .find(|i| &i.id == id)
                .map(|i| (system.id.clone(), i.clone()))
        }))
    }

    async fn list_systems(&self) -> Result<Vec<PersistedSystem>, HangarError> {
        Ok(self.lock().values().cloned().collect())
    }
}
