//! # nw-projection
//!
//! Document projection bridge between Notewell goals and document content.
//!
//! A goal can be *projected* into free-form document content as either a
//! table row (fixed-index columns) or a heading section (recognized
//! subsection headings). This crate reads field values out of such a
//! projection and writes canonical values back into it.
//!
//! The document engine itself is excluded: everything here is a pure
//! function over the abstract tree interface in [`tree`], so the bridge is
//! testable against in-memory fixtures rather than a live editor.
//!
//! ## Key components
//!
//! - [`ContentNode`] / [`DocumentHandle`] — the host document contract
//! - [`read`] — scan a document for a goal's projection by title
//! - [`write`] — replace projected cell/section text with canonical values
//! - [`MemoryDocument`] — in-memory tree for tests and fixtures

pub mod error;
pub mod memory;
pub mod read;
pub mod tree;
pub mod write;

pub use error::ProjectionError;
pub use memory::{MemoryDocument, MemoryNode};
pub use read::{read, GoalProjection};
pub use tree::{ContentNode, DocumentHandle, NodeKind, NodeLocator};
pub use write::{write, WriteOutcome};
