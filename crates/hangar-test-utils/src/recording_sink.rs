// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event sink that captures published events for assertion in tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use hangar_core::{EventSink, HangarError, LoaderEvent};

/// Captures every published [`LoaderEvent`].
///
/// Can be switched into a failing mode where `publish` returns
/// `HangarError::Event` without recording anything.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<LoaderEvent>>,
    failing: AtomicBool,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent publishes fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All events captured so far, in publish order.
    pub fn events(&self) -> Vec<LoaderEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Plugin names from `RequirementUnmet` events.
    pub fn unmet_plugins(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                LoaderEvent::RequirementUnmet { plugin, .. } => Some(plugin),
                _ => None,
            })
            .collect()
    }

    /// Number of `PluginLoadFailed` events.
    pub fn failure_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, LoaderEvent::PluginLoadFailed { .. }))
            .count()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl EventSink for RecordingEventSink {
    fn publish(&self, event: LoaderEvent) -> Result<(), HangarError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HangarError::Event("recording sink set to fail".to_string()));
        }
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_until_failing() {
        let sink = RecordingEventSink::new();
        sink.publish(LoaderEvent::RequirementUnmet {
            plugin: "bar".into(),
            missing: vec!["NOT_FOUND".into()],
            removed: vec![],
        })
        .unwrap();
        assert_eq!(sink.unmet_plugins(), vec!["bar"]);

        sink.set_failing(true);
        assert!(
            sink.publish(LoaderEvent::PluginLoadFailed {
                path: "x".into(),
                error: "boom".into(),
            })
            .is_err()
        );
        assert_eq!(sink.failure_count(), 0);

        sink.clear();
        assert!(sink.events().is_empty());
    }
}
