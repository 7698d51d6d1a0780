// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Hangar plugin loader.

use thiserror::Error;

/// The primary error type used across the loader, the catalog stores, and the CLI.
#[derive(Debug, Error)]
pub enum HangarError {
    /// A required manifest field is missing, or the manifest source is unreadable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A manifest field has the wrong structural type.
    #[error("validation error: {0}")]
    Validation(String),

    /// A catalog write collided with a concurrent writer or an existing record.
    #[error("persistence conflict on {kind} `{key}`")]
    PersistenceConflict { kind: String, key: String },

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A record that must exist was not found.
    #[error("{kind} not found: {key}")]
    NotFound { kind: String, key: String },

    /// The event sink refused an event.
    #[error("event sink error: {0}")]
    Event(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HangarError {
    /// Convenience constructor for conflicts on a `(name, version)` system key.
    pub fn system_conflict(name: &str, version: &str) -> Self {
        HangarError::PersistenceConflict {
            kind: "system".to_string(),
            key: format!("{name}-{version}"),
        }
    }
}

/// Coarse outcome class for an error, used for exit codes and short labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorClass {
    /// Short machine-friendly label.
    pub label: &'static str,
    /// Process exit code the CLI reports for this class.
    pub exit_code: i32,
}

type Rule = (fn(&HangarError) -> bool, ErrorClass);

fn is_conflict(e: &HangarError) -> bool {
    matches!(e, HangarError::PersistenceConflict { .. })
}

fn is_not_found(e: &HangarError) -> bool {
    matches!(e, HangarError::NotFound { .. })
}

fn is_validation(e: &HangarError) -> bool {
    matches!(e, HangarError::Validation(_))
}

fn is_configuration(e: &HangarError) -> bool {
    matches!(e, HangarError::Configuration(_))
}

fn is_backend(e: &HangarError) -> bool {
    matches!(e, HangarError::Storage { .. } | HangarError::Event(_))
}

/// Classification rules, most specific first. The first matching rule wins.
const RULES: &[Rule] = &[
    (is_conflict, ErrorClass { label: "conflict", exit_code: 75 }),
    (is_not_found, ErrorClass { label: "not-found", exit_code: 66 }),
    (is_validation, ErrorClass { label: "invalid", exit_code: 65 }),
    (is_configuration, ErrorClass { label: "config", exit_code: 78 }),
    (is_backend, ErrorClass { label: "unavailable", exit_code: 69 }),
];

const FALLBACK: ErrorClass = ErrorClass { label: "internal", exit_code: 70 };

/// Classify an error by walking the ordered rule list.
pub fn classify(err: &HangarError) -> ErrorClass {
    RULES
        .iter()
        .find(|(matches, _)| matches(err))
        .map(|(_, class)| *class)
        .unwrap_or(FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_follows_rule_order() {
        let conflict = HangarError::system_conflict("foo", "1.0");
        assert_eq!(classify(&conflict).label, "conflict");

        let invalid = HangarError::Validation("INSTANCES must be a list".into());
        assert_eq!(classify(&invalid).exit_code, 65);

        let storage = HangarError::Storage {
            source: Box::new(std::io::Error::other("disk gone")),
        };
        assert_eq!(classify(&storage).label, "unavailable");
    }

    #[test]
    fn classify_falls_back_to_internal() {
        let err = HangarError::Internal("boom".into());
        assert_eq!(classify(&err), FALLBACK);
    }

    #[test]
    fn conflict_message_names_the_key() {
        let err = HangarError::system_conflict("foo", "1.0");
        assert_eq!(err.to_string(), "persistence conflict on system `foo-1.0`");
    }
}
