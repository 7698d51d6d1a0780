// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog store wrapper with injectable write failures.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use hangar_core::{
    CatalogStore, HangarError, InstanceId, PersistedInstance, PersistedSystem, SystemId,
};
use tracing::debug;

/// Kind of failure injected into writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteFailure {
    /// Fail as if another writer got there first.
    Conflict,
    /// Fail as a backend error.
    Backend,
}

/// Delegates to an inner store, failing writes on demand.
///
/// Reads always pass through. Writes fail while a failure is armed, counting
/// down the configured number of attempts.
pub struct FlakyStore {
    inner: Arc<dyn CatalogStore>,
    failure: Mutex<Option<WriteFailure>>,
    remaining: AtomicUsize,
    writes: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: Arc<dyn CatalogStore>) -> Self {
        Self {
            inner,
            failure: Mutex::new(None),
            remaining: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Fail the next `count` writes with `failure`.
    pub fn fail_writes(&self, failure: WriteFailure, count: usize) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = Some(failure);
        self.remaining.store(count, Ordering::SeqCst);
    }

    /// Number of successful writes that reached the inner store.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self, system: &PersistedSystem) -> Result<(), HangarError> {
        let armed = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if !armed {
            return Ok(());
        }
        let failure = *self.failure.lock().unwrap_or_else(|e| e.into_inner());
        debug!(plugin = %system.name, ?failure, "injecting write failure");
        match failure {
            Some(WriteFailure::Conflict) => {
                Err(HangarError::system_conflict(&system.name, &system.version))
            }
            Some(WriteFailure::Backend) => Err(HangarError::Storage {
                source: "injected backend failure".into(),
            }),
            None => Ok(()),
        }
    }

    fn record<T>(&self, result: Result<T, HangarError>) -> Result<T, HangarError> {
        if result.is_ok() {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        result
    }
}

#[async_trait]
impl CatalogStore for FlakyStore {
    async fn find_system(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Option<PersistedSystem>, HangarError> {
        self.inner.find_system(name, version).await
    }

    async fn create_system(&self, system: &PersistedSystem) -> Result<PersistedSystem, HangarError> {
        self.check(system)?;
        let result = self.inner.create_system(system).await;
        self.record(result)
    }

    async fn update_system(&self, system: &PersistedSystem) -> Result<PersistedSystem, HangarError> {
        self.check(system)?;
        let result = self.inner.update_system(system).await;
        self.record(result)
    }

    async fn delete_system(&self, system: &PersistedSystem) -> Result<(), HangarError> {
        self.check(system)?;
        let result = self.inner.delete_system(system).await;
        self.record(result)
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

#[cfg(test)]
mod tests {
    use hangar_storage::MemoryCatalog;

    use super::*;

    #[tokio::test]
    async fn fails_the_requested_number_of_writes() {
        let store = FlakyStore::new(Arc::new(MemoryCatalog::new()));
        store.fail_writes(WriteFailure::Backend, 1);

        let system = PersistedSystem::new("foo", "1.0");
        assert!(matches!(
            store.create_system(&system).await.unwrap_err(),
            HangarError::Storage { .. }
        ));
        assert!(store.list_systems().await.unwrap().is_empty());

        store.create_system(&system).await.unwrap();
        assert_eq!(store.write_count(), 1);
    }
}
