//! Profile-scoped planner use-cases.
//!
//! # Responsibility
//! - Wrap engine functions with load/persist of the session's profile.
//! - Provide schedule, notification, interest and timetable CRUD.
//!
//! # Invariants
//! - Every mutation is one `ProfileStore::update` critical section.
//! - Engine reads use a snapshot loaded immediately before the call.

use crate::engine::clock::parse_class_time;
use crate::engine::prompts;
use crate::engine::scheduling::{self, Suggestion, DEFAULT_UPCOMING_LIMIT};
use crate::model::account::{AccountId, Session};
use crate::model::profile::{
    ClassSlot, NotificationDraft, NotificationEntry, NotificationId, Profile, ScheduleDraft,
    ScheduleEntry, ScheduleId,
};
use crate::repo::kv_store::{KeyValueStore, RepoError};
use crate::repo::profile_repo::ProfileStore;
use chrono::{DateTime, TimeZone, Weekday};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for planner use-cases.
#[derive(Debug)]
pub enum PlannerError {
    /// Schedule title is blank after trim.
    InvalidTitle,
    /// Timetable slot time is not `HH:MM`.
    InvalidClassTime(String),
    /// Target schedule entry does not exist.
    ScheduleNotFound(ScheduleId),
    /// Target notification does not exist.
    NotificationNotFound(NotificationId),
    /// Session account has no stored profile.
    ProfileNotFound(AccountId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for PlannerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle => write!(f, "schedule title must not be blank"),
            Self::InvalidClassTime(value) => {
                write!(f, "invalid class time `{value}`; expected HH:MM")
            }
            Self::ScheduleNotFound(id) => write!(f, "schedule not found: {id}"),
            Self::NotificationNotFound(id) => write!(f, "notification not found: {id}"),
            Self::ProfileNotFound(account_id) => write!(f, "profile not found: {account_id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PlannerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PlannerError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ProfileNotFound(account_id) => Self::ProfileNotFound(account_id),
            other => Self::Repo(other),
        }
    }
}

/// Planner facade over the profile store and the scheduling engine.
pub struct PlannerService<S: KeyValueStore> {
    profiles: ProfileStore<S>,
}

impl<S: KeyValueStore> PlannerService<S> {
    pub fn new(store: S) -> Self {
        Self {
            profiles: ProfileStore::new(store),
        }
    }

    /// Current snapshot of the session's profile.
    pub fn profile(&self, session: &Session) -> Result<Profile, PlannerError> {
        self.profiles
            .load(session.account_id())?
            .ok_or_else(|| PlannerError::ProfileNotFound(session.account_id().to_string()))
    }

    /// Adds a user-created schedule entry and announces it.
    pub fn add_schedule<Tz>(
        &self,
        session: &Session,
        mut draft: ScheduleDraft,
        now: &DateTime<Tz>,
    ) -> Result<ScheduleEntry, PlannerError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        draft.title = draft.title.trim().to_string();
        if draft.title.is_empty() {
            return Err(PlannerError::InvalidTitle);
        }

        let entry = self.profiles.update(session.account_id(), |profile| {
            scheduling::add_schedule(profile, draft, now)
        })?;
        info!(
            "event=schedule_add module=service status=ok schedule_id={} kind={:?}",
            entry.id, entry.kind
        );
        Ok(entry)
    }

    /// Deletes a schedule entry by id and returns it.
    pub fn delete_schedule(
        &self,
        session: &Session,
        id: ScheduleId,
    ) -> Result<ScheduleEntry, PlannerError> {
        let removed = self
            .profiles
            .update(session.account_id(), |profile| profile.remove_schedule(id))?;
        let removed = removed.ok_or(PlannerError::ScheduleNotFound(id))?;
        info!("event=schedule_delete module=service status=ok schedule_id={id}");
        Ok(removed)
    }

    /// Upcoming entries, soonest first; `limit` defaults to 5.
    pub fn upcoming_schedules<Tz: TimeZone>(
        &self,
        session: &Session,
        now: &DateTime<Tz>,
        limit: Option<usize>,
    ) -> Result<Vec<ScheduleEntry>, PlannerError> {
        let profile = self.profile(session)?;
        Ok(scheduling::upcoming_schedules(
            &profile,
            now,
            limit.unwrap_or(DEFAULT_UPCOMING_LIMIT),
        ))
    }

    /// Inserts an unread notification at the front of the feed.
    pub fn add_notification(
        &self,
        session: &Session,
        draft: NotificationDraft,
    ) -> Result<NotificationEntry, PlannerError> {
        Ok(self
            .profiles
            .update(session.account_id(), |profile| profile.push_notification(draft))?)
    }

    pub fn notifications(&self, session: &Session) -> Result<Vec<NotificationEntry>, PlannerError> {
        Ok(self.profile(session)?.notifications)
    }

    pub fn unread_count(&self, session: &Session) -> Result<usize, PlannerError> {
        Ok(self.profile(session)?.unread_count())
    }

    /// Marks every notification read; returns how many changed.
    pub fn mark_all_read(&self, session: &Session) -> Result<usize, PlannerError> {
        let flipped = self
            .profiles
            .update(session.account_id(), Profile::mark_all_read)?;
        info!("event=notifications_read_all module=service status=ok count={flipped}");
        Ok(flipped)
    }

    pub fn mark_read(&self, session: &Session, id: NotificationId) -> Result<(), PlannerError> {
        let found = self
            .profiles
            .update(session.account_id(), |profile| profile.mark_read(id))?;
        if !found {
            return Err(PlannerError::NotificationNotFound(id));
        }
        Ok(())
    }

    /// Replaces interests; returns the normalized list that was stored.
    pub fn set_interests(
        &self,
        session: &Session,
        tags: &[String],
    ) -> Result<Vec<String>, PlannerError> {
        let stored = self.profiles.update(session.account_id(), |profile| {
            profile.set_interests(tags);
            profile.interests.clone()
        })?;
        info!(
            "event=interests_set module=service status=ok count={}",
            stored.len()
        );
        Ok(stored)
    }

    /// Replaces one weekday of the timetable. Slots are stored by time.
    pub fn set_class_day(
        &self,
        session: &Session,
        weekday: Weekday,
        mut slots: Vec<ClassSlot>,
    ) -> Result<Vec<ClassSlot>, PlannerError> {
        for slot in &mut slots {
            let parsed = parse_class_time(&slot.time)
                .ok_or_else(|| PlannerError::InvalidClassTime(slot.time.clone()))?;
            slot.time = parsed.format("%H:%M").to_string();
        }
        slots.sort_by(|left, right| left.time.cmp(&right.time));

        let stored = slots.clone();
        self.profiles.update(session.account_id(), |profile| {
            profile.class_schedule.set_day(weekday, slots);
        })?;
        info!(
            "event=timetable_set module=service status=ok weekday={weekday} slots={}",
            stored.len()
        );
        Ok(stored)
    }

    /// Proposes the next study session without storing anything.
    pub fn next_study_suggestion<Tz: TimeZone>(
        &self,
        session: &Session,
        now: &DateTime<Tz>,
    ) -> Result<Suggestion, PlannerError> {
        let profile = self.profile(session)?;
        Ok(scheduling::next_study_suggestion(&profile, now))
    }

    /// Stores an accepted suggestion and advances the subject rotation.
    pub fn accept_suggestion<Tz>(
        &self,
        session: &Session,
        suggestion: &Suggestion,
        now: &DateTime<Tz>,
    ) -> Result<ScheduleEntry, PlannerError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let entry = self.profiles.update(session.account_id(), |profile| {
            scheduling::accept_suggestion(profile, suggestion, now)
        })?;
        info!(
            "event=suggestion_accept module=service status=ok schedule_id={} subject_index={}",
            entry.id,
            suggestion.subject.rotation_index()
        );
        Ok(entry)
    }

    /// Emits today's missing reminder notifications.
    pub fn ensure_daily_prompts<Tz: TimeZone>(
        &self,
        session: &Session,
        now: &DateTime<Tz>,
    ) -> Result<Vec<NotificationEntry>, PlannerError> {
        let emitted = self.profiles.update(session.account_id(), |profile| {
            prompts::ensure_daily_prompts(profile, now)
        })?;
        if !emitted.is_empty() {
            info!(
                "event=daily_prompts module=service status=ok emitted={}",
                emitted.len()
            );
        }
        Ok(emitted)
    }
}
