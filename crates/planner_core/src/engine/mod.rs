//! Study-suggestion and reminder engine.
//!
//! # Responsibility
//! - Derive suggestions, free slots and tips from a profile snapshot.
//! - Apply accepted suggestions and daily prompts to an in-memory profile.
//!
//! # Invariants
//! - Engine functions are total and never touch storage; callers load the
//!   profile before and persist it after.
//! - "Today" is the calendar day of the caller-supplied `now` in its own
//!   time zone.

pub mod clock;
pub mod prompts;
pub mod scheduling;
