// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Hangar integration tests.
//!
//! Provides collaborator doubles and a harness for fast, deterministic loader
//! tests over temporary plugin directories.
//!
//! # Components
//!
//! - [`RecordingEventSink`] - Captures published loader events
//! - [`FlakyStore`] - Catalog store wrapper with injectable write failures
//! - [`PluginDirBuilder`] - Writes plugin directories and manifests
//! - [`TestHarness`] - Loader, registry, store, and sink wired together

pub mod flaky_store;
pub mod harness;
pub mod plugin_dir;
pub mod recording_sink;

pub use flaky_store::{FlakyStore, WriteFailure};
pub use harness::{TestHarness, TestHarnessBuilder};
pub use plugin_dir::PluginDirBuilder;
pub use recording_sink::RecordingEventSink;
