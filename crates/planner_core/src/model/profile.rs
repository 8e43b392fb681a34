//! Per-account planner profile.
//!
//! # Responsibility
//! - Define schedule, notification and timetable records.
//! - Provide in-memory mutations that keep profile invariants.
//!
//! # Invariants
//! - Schedule entries are appended and never edited in place.
//! - Notifications are kept newest-first; only `read` ever changes.
//! - The weekly timetable always carries all seven weekdays.
//! - Missing fields in stored documents decode to empty defaults.

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::interest::normalize_interests;

pub type ScheduleId = Uuid;
pub type NotificationId = Uuid;

/// Schedule entry category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    /// Study session, usually created from an accepted suggestion.
    Study,
    /// Any user-created commitment. Unknown stored labels decode here.
    #[default]
    #[serde(other)]
    Generic,
}

/// One commitment in the profile's schedule list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: ScheduleId,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: ScheduleType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(rename = "whenISO")]
    pub when: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Input for a new schedule entry; the id is assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDraft {
    pub title: String,
    pub kind: ScheduleType,
    pub subject: Option<String>,
    pub when: DateTime<Utc>,
    pub notes: Option<String>,
}

impl ScheduleDraft {
    /// Generic entry with only title and time.
    pub fn generic(title: impl Into<String>, when: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            kind: ScheduleType::Generic,
            subject: None,
            when,
            notes: None,
        }
    }
}

/// Origin tag for notifications, decoupled from the displayed title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ScheduleAdded,
    TimetablePrompt,
    StudyReminder,
    #[default]
    #[serde(other)]
    General,
}

/// One entry in the notification feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEntry {
    pub id: NotificationId,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(rename = "timeISO")]
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub kind: NotificationKind,
}

/// Input for a new notification; created unread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub time: DateTime<Utc>,
}

/// One class period in the weekly timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSlot {
    /// Start time as `HH:MM`.
    pub time: String,
    pub subject: String,
    #[serde(default)]
    pub room: String,
}

/// Weekly class timetable with one slot list per weekday.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyTimetable {
    #[serde(rename = "Mon")]
    mon: Vec<ClassSlot>,
    #[serde(rename = "Tue")]
    tue: Vec<ClassSlot>,
    #[serde(rename = "Wed")]
    wed: Vec<ClassSlot>,
    #[serde(rename = "Thu")]
    thu: Vec<ClassSlot>,
    #[serde(rename = "Fri")]
    fri: Vec<ClassSlot>,
    #[serde(rename = "Sat")]
    sat: Vec<ClassSlot>,
    #[serde(rename = "Sun")]
    sun: Vec<ClassSlot>,
}

impl WeeklyTimetable {
    pub fn day(&self, weekday: Weekday) -> &[ClassSlot] {
        match weekday {
            Weekday::Mon => &self.mon,
            Weekday::Tue => &self.tue,
            Weekday::Wed => &self.wed,
            Weekday::Thu => &self.thu,
            Weekday::Fri => &self.fri,
            Weekday::Sat => &self.sat,
            Weekday::Sun => &self.sun,
        }
    }

    /// Replaces the full slot list of one weekday.
    pub fn set_day(&mut self, weekday: Weekday, slots: Vec<ClassSlot>) {
        let day = match weekday {
            Weekday::Mon => &mut self.mon,
            Weekday::Tue => &mut self.tue,
            Weekday::Wed => &mut self.wed,
            Weekday::Thu => &mut self.thu,
            Weekday::Fri => &mut self.fri,
            Weekday::Sat => &mut self.sat,
            Weekday::Sun => &mut self.sun,
        };
        *day = slots;
    }
}

/// All mutable planner state owned by one account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub interests: Vec<String>,
    pub schedules: Vec<ScheduleEntry>,
    /// Newest first.
    pub notifications: Vec<NotificationEntry>,
    pub class_schedule: WeeklyTimetable,
    pub last_study_subject: Option<String>,
}

impl Profile {
    /// Replaces interests with the normalized form of `tags`.
    pub fn set_interests<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.interests = normalize_interests(tags);
    }

    /// Appends a schedule entry with a fresh id and returns a copy.
    pub fn push_schedule(&mut self, draft: ScheduleDraft) -> ScheduleEntry {
        let entry = ScheduleEntry {
            id: Uuid::new_v4(),
            title: draft.title,
            kind: draft.kind,
            subject: draft.subject,
            when: draft.when,
            notes: draft.notes,
        };
        self.schedules.push(entry.clone());
        entry
    }

    /// Removes a schedule entry by id.
    pub fn remove_schedule(&mut self, id: ScheduleId) -> Option<ScheduleEntry> {
        let position = self.schedules.iter().position(|entry| entry.id == id)?;
        Some(self.schedules.remove(position))
    }

    /// Inserts an unread notification at the front of the feed.
    pub fn push_notification(&mut self, draft: NotificationDraft) -> NotificationEntry {
        let entry = NotificationEntry {
            id: Uuid::new_v4(),
            title: draft.title,
            body: draft.body,
            time: draft.time,
            read: false,
            kind: draft.kind,
        };
        self.notifications.insert(0, entry.clone());
        entry
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|entry| !entry.read).count()
    }

    /// Marks every notification read and returns how many flipped.
    pub fn mark_all_read(&mut self) -> usize {
        let mut flipped = 0;
        for entry in self.notifications.iter_mut().filter(|entry| !entry.read) {
            entry.read = true;
            flipped += 1;
        }
        flipped
    }

    /// Marks one notification read. Returns `false` for an unknown id.
    pub fn mark_read(&mut self, id: NotificationId) -> bool {
        match self.notifications.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.read = true;
                true
            }
            None => false,
        }
    }
}
