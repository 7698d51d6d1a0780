// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits at the loader's outer edges.
//!
//! The loader only talks to persistence, structural validation, and the
//! event stream through these traits, so each can be swapped in tests.

pub mod events;
pub mod storage;
pub mod validator;

pub use events::{EventSink, LoaderEvent};
pub use storage::CatalogStore;
pub use validator::StructuralValidator;
