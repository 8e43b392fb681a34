//! Planner domain model.
//!
//! # Responsibility
//! - Define the persisted shapes for accounts and per-account profiles.
//! - Define the fixed study-subject rotation and interest catalogue.
//!
//! # Invariants
//! - Stored instants are UTC; calendar-day semantics are applied by callers
//!   in the caller's own time zone.
//! - Every schedule and notification entry has a stable UUID.

pub mod account;
pub mod interest;
pub mod profile;
pub mod subject;
