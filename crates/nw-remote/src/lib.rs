//! # nw-remote
//!
//! Remote goal store client boundary for Notewell.
//!
//! The remote store is a collaborator, not an authority: the sync engine
//! treats every failure here — transport, auth, server, decode — as one
//! uniform "remote unavailable" signal and keeps working from the local
//! cache. This crate is deliberately thin.
//!
//! ## Key components
//!
//! - [`RemoteStore`] — the page-scoped CRUD contract
//! - [`HttpRemoteStore`] — blocking HTTP adapter with bearer auth
//! - [`MemoryRemoteStore`] — in-memory server double with a failure switch
//! - [`DisabledRemote`] — always unavailable (no endpoint configured)

pub mod client;
pub mod error;
pub mod http;
pub mod memory;

pub use client::RemoteStore;
pub use error::RemoteError;
pub use http::HttpRemoteStore;
pub use memory::{DisabledRemote, MemoryRemoteStore};
