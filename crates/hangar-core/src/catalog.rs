// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted catalog records.
//!
//! A [`PersistedSystem`] is keyed by `(name, version)` and embeds its
//! [`PersistedInstance`] records. Stores read and write the whole system as
//! one unit; instances are never persisted on their own.

use serde::{Deserialize, Serialize};

use crate::types::{InstanceId, InstanceStatus, SystemId};

/// One addressable runtime copy of a plugin, as remembered by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedInstance {
    pub id: InstanceId,
    /// Unique within the owning system.
    pub name: String,
    #[serde(default)]
    pub status: InstanceStatus,
}

impl PersistedInstance {
    /// A brand new instance with a freshly minted identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: InstanceId::generate(),
            name: name.into(),
            status: InstanceStatus::Initializing,
        }
    }
}

/// A plugin as remembered by the catalog, keyed by `(name, version)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSystem {
    pub id: SystemId,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub icon_name: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub instances: Vec<PersistedInstance>,
    /// Optimistic concurrency token. Stores bump it on every successful write
    /// and refuse writes whose revision does not match the stored one.
    #[serde(default)]
    pub revision: u64,
}

impl PersistedSystem {
    /// A new, not yet persisted system with no instances.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: SystemId::generate(),
            name: name.into(),
            version: version.into(),
            description: String::new(),
            display_name: None,
            icon_name: None,
            metadata: serde_json::Map::new(),
            instances: Vec::new(),
            revision: 0,
        }
    }

    /// Look up an instance by name.
    pub fn instance(&self, name: &str) -> Option<&PersistedInstance> {
        self.instances.iter().find(|i| i.name == name)
    }

    /// Names of all embedded instances, in stored order.
    pub fn instance_names(&self) -> Vec<&str> {
        self.instances.iter().map(|i| i.name.as_str()).collect()
    }
}
