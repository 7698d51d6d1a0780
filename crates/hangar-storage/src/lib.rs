// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog persistence for the Hangar plugin loader.
//!
//! Provides a WAL-mode SQLite store with a single-writer concurrency model via
//! `tokio-rusqlite`, and an in-memory store with the same conflict rules.
//! Both implement [`hangar_core::CatalogStore`].

pub mod adapter;
pub mod database;
pub mod memory;
pub mod queries;
pub mod schema;

use std::sync::Arc;

use hangar_config::model::{StorageBackend, StorageConfig};
use hangar_core::{CatalogStore, HangarError};

pub use adapter::SqliteCatalog;
pub use database::Database;
pub use memory::MemoryCatalog;

/// Open the catalog store selected by configuration.
pub async fn open_catalog(config: &StorageConfig) -> Result<Arc<dyn CatalogStore>, HangarError> {
    match config.backend {
        StorageBackend::Sqlite => Ok(Arc::new(SqliteCatalog::open(&config.database_path).await?)),
        StorageBackend::Memory => Ok(Arc::new(MemoryCatalog::new())),
    }
}
