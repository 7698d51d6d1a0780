// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog store trait for persistence backends (SQLite, in-memory, etc.).

use async_trait::async_trait;

use crate::catalog::{PersistedInstance, PersistedSystem};
use crate::error::HangarError;
use crate::types::{InstanceId, SystemId};

/// Persistence collaborator holding systems and their embedded instances.
///
/// Every write covers a whole system, so a system and its instance set are
/// always committed together. Writes are guarded by
/// [`PersistedSystem::revision`]: a write whose revision does not match the
/// stored one fails with [`HangarError::PersistenceConflict`] and changes
/// nothing.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetch the unique system stored under `(name, version)`, if any.
    async fn find_system(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Option<PersistedSystem>, HangarError>;

    /// Persist a new system together with its instances.
    ///
    /// Fails with a conflict if a system already exists under the same
    /// `(name, version)`. Returns the stored record with its revision set.
    async fn create_system(&self, system: &PersistedSystem)
    -> Result<PersistedSystem, HangarError>;

    /// Replace a stored system, including its full instance set.
    ///
    /// Fails with a conflict if the record is missing or its revision is stale.
    async fn update_system(&self, system: &PersistedSystem)
    -> Result<PersistedSystem, HangarError>;

    /// Delete a system and all of its instances.
    async fn delete_system(&self, system: &PersistedSystem) -> Result<(), HangarError>;

    /// Find an instance by identity, together with the id of its owning system.
    async fn find_instance(
        &self,
        id: &InstanceId,
    ) -> Result<Option<(SystemId, PersistedInstance)>, HangarError>;

    /// List every stored system, ordered by name then version.
    async fn list_systems(&self) -> Result<Vec<PersistedSystem>, HangarError>;
}
