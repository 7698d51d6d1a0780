// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the loader, the catalog stores, and the CLI.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Opaque identity of a persisted system, minted once at first creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SystemId(pub String);

impl SystemId {
    /// Mint a fresh, globally unique identity.
    pub fn generate() -> Self {
        SystemId(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identity of a persisted instance. Stable across reconciliations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub String);

impl InstanceId {
    /// Mint a fresh, globally unique identity.
    pub fn generate() -> Self {
        InstanceId(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status recorded for a persisted instance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceStatus {
    #[default]
    Initializing,
    Running,
    Stopped,
    Dead,
    Unknown,
}

/// Severity a plugin process is asked to log at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Display, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Resolve a standard severity name. Unknown names fall back to `Info`.
    ///
    /// Matching is case-sensitive. `WARN` and `FATAL` are accepted as aliases
    /// of `WARNING` and `CRITICAL`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "DEBUG" => LogLevel::Debug,
            "INFO" => LogLevel::Info,
            "WARNING" | "WARN" => LogLevel::Warning,
            "ERROR" => LogLevel::Error,
            "CRITICAL" | "FATAL" => LogLevel::Critical,
            _ => LogLevel::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_known_names() {
        assert_eq!(LogLevel::from_name("DEBUG"), LogLevel::Debug);
        assert_eq!(LogLevel::from_name("WARNING"), LogLevel::Warning);
        assert_eq!(LogLevel::from_name("WARN"), LogLevel::Warning);
        assert_eq!(LogLevel::from_name("FATAL"), LogLevel::Critical);
    }

    #[test]
    fn log_level_unknown_is_info() {
        assert_eq!(LogLevel::from_name("INVALID"), LogLevel::Info);
        assert_eq!(LogLevel::from_name("debug"), LogLevel::Info);
        assert_eq!(LogLevel::from_name(""), LogLevel::Info);
    }

    #[test]
    fn log_level_displays_standard_name() {
        assert_eq!(LogLevel::Warning.to_string(), "WARNING");
        assert_eq!(LogLevel::default().to_string(), "INFO");
    }

    #[test]
    fn instance_status_round_trips_through_strings() {
        use std::str::FromStr;

        assert_eq!(InstanceStatus::Initializing.to_string(), "INITIALIZING");
        assert_eq!(
            InstanceStatus::from_str("RUNNING").unwrap(),
            InstanceStatus::Running
        );
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(SystemId::generate(), SystemId::generate());
        assert_ne!(InstanceId::generate(), InstanceId::generate());
    }
}
