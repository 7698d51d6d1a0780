// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loader events and the sink they are published to.

use std::path::PathBuf;

use serde::Serialize;
use strum::IntoStaticStr;

use crate::error::HangarError;

/// Observable outcomes of a load batch.
///
/// Requirement removals are reported here rather than raised as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, IntoStaticStr)]
#[serde(tag = "event", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LoaderEvent {
    /// A plugin was reconciled and its runners registered.
    PluginLoaded {
        plugin: String,
        version: String,
        runners: Vec<String>,
    },
    /// A candidate failed to load. The batch continued.
    PluginLoadFailed { path: PathBuf, error: String },
    /// Stale instances were deleted from the catalog during reconciliation.
    InstancesRetired {
        plugin: String,
        version: String,
        instances: Vec<String>,
    },
    /// A plugin was removed from the registry because requirements were unmet.
    RequirementUnmet {
        plugin: String,
        missing: Vec<String>,
        removed: Vec<String>,
    },
}

impl LoaderEvent {
    /// Short name of the event, matching its serialized tag.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

/// Destination for [`LoaderEvent`]s (audit stream, log, test recorder).
pub trait EventSink: Send + Sync {
    /// Publish one event.
    ///
    /// The loader treats a failure as fatal only during requirement
    /// validation. Notifications about committed loads are best-effort.
    fn publish(&self, event: LoaderEvent) -> Result<(), HangarError>;
}
