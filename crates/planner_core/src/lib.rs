//! Core domain logic for the student planner.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use engine::scheduling::{
    accept_suggestion, build_tip, conflict_at, find_slot, next_study_suggestion, next_subject,
    Suggestion,
};
pub use engine::prompts::ensure_daily_prompts;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::account::{Account, AccountId, Session};
pub use model::interest::DEFAULT_INTERESTS;
pub use model::profile::{
    ClassSlot, NotificationDraft, NotificationEntry, NotificationId, NotificationKind, Profile,
    ScheduleDraft, ScheduleEntry, ScheduleId, ScheduleType, WeeklyTimetable,
};
pub use model::subject::{Subject, ROTATION};
pub use repo::kv_store::{KeyValueStore, RepoError, RepoResult, SqliteKeyValueStore};
pub use service::auth_service::{AuthError, AuthService, SignUpRequest};
pub use service::planner_service::{PlannerError, PlannerService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
