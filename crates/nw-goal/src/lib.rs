//! # nw-goal
//!
//! Canonical Goal entity model for Notewell.
//!
//! A [`Goal`] is a trackable objective owned by a page: title, detail,
//! priority, status, due date, ordered action items, and an optional
//! projection location inside document content. The sync engine owns the
//! authoritative in-memory representation; this crate only defines the
//! shape and the field rules.
//!
//! ## Key components
//!
//! - [`Goal`] — the canonical record, with derived `percent_complete`
//! - [`GoalDraft`] / [`GoalPatch`] — construction input and partial update
//! - [`Priority`] / [`Status`] — tolerant enums that keep unrecognized raw
//!   values verbatim instead of rejecting them
//! - [`ActionItem`], [`RelatedFile`], [`GoalSource`] — embedded field types
//!
//! Nothing in this crate returns an error: unmatched enum values pass
//! through unchanged and unknown JSON keys are ignored at the boundary.

pub mod fields;
pub mod goal;

pub use fields::{ActionItem, GoalSource, Priority, RelatedFile, SourceKind, Status};
pub use goal::{percent_complete, Goal, GoalDraft, GoalPatch};
