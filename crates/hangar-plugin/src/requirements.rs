// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cross-plugin requirement checking.
//!
//! A plugin whose `REQUIRES` names a plugin that is not registered is removed
//! from the registry. Removal can strand other plugins that required it, so
//! the check repeats until a full pass removes nothing.

use std::collections::BTreeSet;

use hangar_core::{EventSink, HangarError, LoaderEvent};
use serde::Serialize;
use tracing::warn;

use crate::registry::PluginRegistry;

/// A plugin removed because one or more of its requirements were missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmetRequirement {
    pub plugin: String,
    pub missing: BTreeSet<String>,
}

/// Remove plugins with unmet requirements until a fixed point is reached.
///
/// Returns every removal in the order it happened. A plugin requiring itself
/// is satisfied by its own presence. The only error is a failure to publish
/// a removal event.
pub fn validate_plugin_requirements(
    registry: &PluginRegistry,
    events: &dyn EventSink,
) -> Result<Vec<UnmetRequirement>, HangarError> {
    let mut unmet = Vec::new();

    loop {
        let present = registry.plugin_names();
        let mut removed_this_pass = false;

        for plugin in &present {
            let missing: BTreeSet<String> = registry
                .by_plugin(plugin)
                .iter()
                .flat_map(|d| d.requires.iter())
                .filter(|req| !present.contains(*req))
                .cloned()
                .collect();
            if missing.is_empty() {
                continue;
            }

            let removed: Vec<String> = registry
                .remove_plugin(plugin)
                .iter()
                .map(|d| d.unique_name())
                .collect();
            warn!(
                plugin = %plugin,
                missing = ?missing,
                removed = ?removed,
                "removing plugin with unmet requirements"
            );
            events.publish(LoaderEvent::RequirementUnmet {
                plugin: plugin.clone(),
                missing: missing.iter().cloned().collect(),
                removed,
            })?;

            unmet.push(UnmetRequirement {
                plugin: plugin.clone(),
                missing,
            });
            removed_this_pass = true;
        }

        if !removed_this_pass {
            return Ok(unmet);
        }
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;
    use crate::registry::tests::runner;
    use crate::test_support::CollectSink;

    #[test]
    fn satisfied_requirements_keep_everything() {
        let registry = PluginRegistry::new();
        registry.add(runner("foo", "default", "1.0", &[]));
        registry.add(runner("bar", "default", "1.0", &["foo"]));
        let sink = CollectSink::default();

        let unmet = validate_plugin_requirements(&registry, &sink).unwrap();
        assert!(unmet.is_empty());
        assert_eq!(registry.len(), 2);
        assert!(sink.events().is_empty());
    }

    #[test]
    #[traced_test]
    fn missing_requirement_removes_plugin_and_is_logged() {
        let registry = PluginRegistry::new();
        registry.add(runner("foo", "default", "1.0", &[]));
        registry.add(runner("bar", "default", "1.0", &["NOT_FOUND"]));
        let sink = CollectSink::default();

        let unmet = validate_plugin_requirements(&registry, &sink).unwrap();
        assert_eq!(unmet.len(), 1);
        assert_eq!(unmet[0].plugin, "bar");
        assert!(unmet[0].missing.contains("NOT_FOUND"));
        assert_eq!(
            registry.unique_names(),
            BTreeSet::from(["foo[default]-1.0".to_string()])
        );
        assert!(logs_contain("removing plugin with unmet requirements"));

        let events = sink.events();
        assert!(matches!(
            &events[0],
            LoaderEvent::RequirementUnmet { plugin, .. } if plugin == "bar"
        ));
    }

    #[test]
    fn removal_cascades_to_a_fixed_point() {
        let registry = PluginRegistry::new();
        registry.add(runner("c", "default", "1.0", &["b"]));
        registry.add(runner("b", "default", "1.0", &["a"]));
        registry.add(runner("a", "default", "1.0", &["missing"]));
        registry.add(runner("standalone", "default", "1.0", &[]));

        let unmet = validate_plugin_requirements(&registry, &CollectSink::default()).unwrap();
        let removed: BTreeSet<&str> = unmet.iter().map(|u| u.plugin.as_str()).collect();
        assert_eq!(removed, BTreeSet::from(["a", "b", "c"]));
        assert_eq!(
            registry.plugin_names(),
            BTreeSet::from(["standalone".to_string()])
        );
    }

    #[test]
    fn self_requirement_is_satisfied() {
        let registry = PluginRegistry::new();
        registry.add(runner("loop", "default", "1.0", &["loop"]));

        let unmet = validate_plugin_requirements(&registry, &CollectSink::default()).unwrap();
        assert!(unmet.is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn every_instance_of_a_failed_plugin_goes() {
        let registry = PluginRegistry::new();
        registry.add(runner("foo", "a", "1.0", &["ghost"]));
        registry.add(runner("foo", "b", "1.0", &[]));

        validate_plugin_requirements(&registry, &CollectSink::default()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn sink_failure_is_fatal() {
        let registry = PluginRegistry::new();
        registry.add(runner("bar", "default", "1.0", &["NOT_FOUND"]));

        let sink = CollectSink::rejecting(|_| true);
        let err = validate_plugin_requirements(&registry, &sink).unwrap_err();
        assert!(matches!(err, HangarError::Event(_)));
    }
}
