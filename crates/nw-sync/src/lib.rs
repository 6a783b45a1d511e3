//! # nw-sync
//!
//! The goal synchronization engine for Notewell.
//!
//! The engine keeps one canonical Goal list consistent across three
//! places: the durable local snapshot cache (always written first,
//! synchronously), the remote page-scoped store (best-effort mirror), and
//! document projections (written back on request). The local cache is
//! authoritative; the remote is a mirror that can fall behind and catch
//! up, never the other way around.
//!
//! ## Key components
//!
//! - [`SyncEngine`] — the orchestrator: create/update/delete/list/synchronize
//! - [`CircuitBreaker`] — explicit Closed/Open/HalfOpen degrade-and-retry
//! - [`NotificationHub`] / [`GoalObserver`] — ordered fan-out of goal changes
//! - [`Clock`] — injectable time source, so retry timing is testable
//!
//! ## Guarantees
//!
//! - Every edit is durable locally before any network risk is taken.
//! - A remote failure degrades the session to local-only mode; a fixed
//!   cooldown later, the next remote attempt probes for recovery.
//! - Create, update, and synchronize never return errors to the caller.

pub mod breaker;
pub mod clock;
pub mod engine;
pub mod error;
pub mod hub;

pub use breaker::{AvailabilityMode, CircuitBreaker};
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{EngineConfig, GoalFilter, SyncEngine};
pub use error::SyncError;
pub use hub::{GoalObserver, NotificationHub, ObserverId};
