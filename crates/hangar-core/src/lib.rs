// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Hangar plugin loader.
//!
//! This crate provides the error type, the identity and catalog record types,
//! and the collaborator traits (persistence, structural validation, events)
//! shared by every other crate in the workspace.

pub mod catalog;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use catalog::{PersistedInstance, PersistedSystem};
pub use error::{ErrorClass, HangarError, classify};
pub use types::{InstanceId, InstanceStatus, LogLevel, SystemId};

pub use traits::{CatalogStore, EventSink, LoaderEvent, StructuralValidator};
