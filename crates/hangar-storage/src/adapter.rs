// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the CatalogStore trait.

use async_trait::async_trait;
use tracing::debug;

use hangar_core::{
    CatalogStore, HangarError, InstanceId, PersistedInstance, PersistedSystem, SystemId,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed catalog store.
///
/// Wraps a [`Database`] handle and delegates every operation to the typed
/// query functions.
pub struct SqliteCatalog {
    db: Database,
}

impl SqliteCatalog {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open the database at `path`, creating it if needed.
    pub async fn open(path: &str) -> Result<Self, HangarError> {
        let db = Database::open(path).await?;
        debug!(path = %path, "SQLite catalog initialized");
        Ok(Self::new(db))
    }

    pub async fn close(self) -> Result<(), HangarError> {
        self.db.close().await
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    async fn find_system(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Option<PersistedSystem>, HangarError> {
        queries::find_system(&self.db, name, version).await
    }

    async fn create_system(&self, system: &PersistedSystem) -> Result<PersistedSystem, HangarError> {
        queries::create_system(&self.db, system).await
    }

    async fn update_system(&self, system: &PersistedSystem) -> Result<PersistedSystem, HangarError> {
        queries::update_system(&self.db, system).await
    }

    async fn delete_system(&self, system: &PersistedSystem) -> Result<(), HangarError> {
        queries::delete_system(&self.db, system).await
    }

    async fn find_instance(
        &self,
        id: &InstanceId,
    ) -> Result<Option<(SystemId, PersistedInstance)>, HangarError> {
        queries::find_instance(&self.db, id).await
    }

    async fn list_systems(&self) -> Result<Vec<PersistedSystem>, HangarError> {
        queries::list_systems(&self.db).await
    }
}
