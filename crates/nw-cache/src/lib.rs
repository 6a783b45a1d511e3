//! # nw-cache
//!
//! Durable local snapshot cache for Notewell goals.
//!
//! The cache is the always-available side of goal sync: reads resolve
//! synchronously with no network involved, and every save replaces the
//! whole snapshot so the cache can never drift from in-memory truth.
//!
//! ## Key components
//!
//! - [`SnapshotStore`] — the persistence seam (load never fails, save is a
//!   full replace)
//! - [`JsonSnapshotStore`] — one well-known `goals.json` file on disk
//! - [`MemorySnapshotStore`] — in-memory sessions and tests

pub mod error;
pub mod store;

pub use error::CacheError;
pub use store::{JsonSnapshotStore, MemorySnapshotStore, SnapshotStore};
