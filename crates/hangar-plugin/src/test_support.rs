// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-crate doubles for the store and event collaborators.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use hangar_core::{
    CatalogStore, EventSink, HangarError, InstanceId, LoaderEvent, PersistedInstance,
    PersistedSystem, SystemId,
};
use hangar_storage::MemoryCatalog;

/// A real memory catalog whose writes all fail with a persistence conflict.
#[derive(Default)]
pub(crate) struct RejectingStore {
    inner: MemoryCatalog,
}

#[async_trait]
impl CatalogStore for RejectingStore {
    async fn find_system(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Option<PersistedSystem>, HangarError> {
        self.inner.find_system(name, version).await
    }

    async fn create_system(&self, system: &PersistedSystem) -> Result<PersistedSystem, HangarError> {
        Err(HangarError::system_conflict(&system.name, &system.version))
    }

    async fn update_system(&self, system: &PersistedSystem) -> Result<PersistedSystem, HangarError> {
        Err(HangarError::system_conflict(&system.name, &system.version))
    }

    async fn delete_system(&self, system: &PersistedSystem) -> Result<(), HangarError> {
        self.inner.delete_system(system).await
    }

    async fn find_instance(
        &self,
        id: &InstanceId,
    ) -> Result<Option<(SystemId, PersistedInstance)>, HangarError> {
        self.inner.find_instance(id).await
    }

    async fn list_systems(&self) -> Result<Vec<PersistedSystem>, HangarError> {
        self.inner.list_systems().await
    }
}

/// Event sink that keeps everything it accepts.
///
/// Built with [`CollectSink::rejecting`], it refuses matching events instead.
#[derive(Default)]
pub(crate) struct CollectSink {
    events: Mutex<Vec<LoaderEvent>>,
    reject: Option<fn(&LoaderEvent) -> bool>,
}

impl CollectSink {
    pub(crate) fn rejecting(reject: fn(&LoaderEvent) -> bool) -> Self {
        Self {
            events: Mutex::default(),
            reject: Some(reject),
        }
    }

    pub(crate) fn events(&self) -> Vec<LoaderEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventSink for CollectSink {
    fn publish(&self, event: LoaderEvent) -> Result<(), HangarError> {
        if self.reject.is_some_and(|reject| reject(&event)) {
            return Err(HangarError::Event(format!("sink refused {}", event.kind())));
        }
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Ok(())
    }
}
