// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Default event sink that forwards loader events to `tracing`.

use hangar_core::{EventSink, HangarError, LoaderEvent};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn publish(&self, event: LoaderEvent) -> Result<(), HangarError> {
        match event {
            LoaderEvent::PluginLoaded {
                plugin,
                version,
                runners,
            } => info!(plugin = %plugin, version = %version, runners = ?runners, "plugin loaded"),
            LoaderEvent::PluginLoadFailed { path, error } => {
                warn!(path = %path.display(), error = %error, "plugin load failed")
            }
            LoaderEvent::InstancesRetired {
                plugin,
                version,
                instances,
            } => info!(plugin = %plugin, version = %version, instances = ?instances, "instances retired"),
            LoaderEvent::RequirementUnmet {
                plugin,
                missing,
                removed,
            } => warn!(plugin = %plugin, missing = ?missing, removed = ?removed, "requirement unmet"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    #[test]
    #[traced_test]
    fn events_are_logged() {
        TracingEventSink
            .publish(LoaderEvent::PluginLoaded {
                plugin: "foo".into(),
                version: "1.0".into(),
                runners: vec!["foo[default]-1.0".into()],
            })
            .unwrap();
        assert!(logs_contain("plugin loaded"));
        assert!(logs_contain("foo[default]-1.0"));
    }
}
