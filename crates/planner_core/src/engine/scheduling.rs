//! Study suggestions, conflict checks and schedule insertion.
//!
//! # Responsibility
//! - Pick the next subject in the fixed rotation.
//! - Find the first free evening slot against existing commitments.
//! - Compose study tips from subject and interests.
//! - Turn accepted suggestions into schedule entries.
//!
//! # Invariants
//! - Two instants conflict when they are strictly less than 60 minutes apart.
//! - Slot search is deterministic: earliest free candidate hour wins.
//! - Every inserted schedule entry emits one "schedule added" notification.

use crate::engine::clock::{format_datetime, local_hour, weekday_index};
use crate::model::interest::{
    has_interest, INTEREST_CODING, INTEREST_MINDFULNESS, INTEREST_MUSIC,
};
use crate::model::profile::{
    NotificationDraft, NotificationKind, Profile, ScheduleDraft, ScheduleEntry, ScheduleType,
};
use crate::model::subject::{Subject, ROTATION};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Candidate start hours for study sessions, searched in order.
pub const STUDY_SLOT_HOURS: [u32; 5] = [17, 18, 19, 20, 21];
/// Next-day start hour used when every candidate today is taken.
pub const FALLBACK_SLOT_HOUR: u32 = 19;
pub const CONFLICT_WINDOW_MINUTES: i64 = 60;
pub const STUDY_DURATION_MINUTES: u32 = 60;
/// Entries that started at most this long ago still count as upcoming.
pub const UPCOMING_LOOKBACK_MINUTES: i64 = 5;
pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

pub const SCHEDULE_ADDED_TITLE: &str = "เพิ่มกำหนดการใหม่";
const STUDY_TITLE_PREFIX: &str = "อ่านหนังสือ";
const TIP_MUSIC: &str = "เปิดเพลงบรรเลงเบาๆ (ไม่มีเนื้อร้อง) ช่วยโฟกัส";
const TIP_MINDFULNESS: &str = "ก่อนเริ่ม ตั้งลมหายใจ 1 นาที";
const TIP_CODING: &str = "ลองทำโจทย์สั้นๆ 1 ข้อ";
const TIP_SEPARATOR: &str = " • ";

/// A proposed study session. Nothing is stored until it is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub subject: Subject,
    #[serde(rename = "whenISO")]
    pub when: DateTime<Utc>,
    pub duration_min: u32,
    pub tip: String,
}

/// Returns whether any scheduled entry lies within the conflict window of
/// `candidate`, in either direction.
pub fn conflict_at(profile: &Profile, candidate: DateTime<Utc>) -> bool {
    let window_ms = Duration::minutes(CONFLICT_WINDOW_MINUTES).num_milliseconds();
    profile
        .schedules
        .iter()
        .any(|entry| (entry.when - candidate).num_milliseconds().abs() < window_ms)
}

/// Picks the subject after `last_study_subject` in the rotation.
///
/// Without a previous subject the pick depends only on the weekday of `now`
/// (Sunday = 0). A previous label outside the rotation restarts it.
pub fn next_subject<Tz: TimeZone>(last_study_subject: Option<&str>, now: &DateTime<Tz>) -> Subject {
    match last_study_subject.filter(|label| !label.trim().is_empty()) {
        Some(label) => Subject::from_label(label).map_or(ROTATION[0], Subject::next),
        None => ROTATION[weekday_index(now) % ROTATION.len()],
    }
}

/// Finds the first free candidate hour on the calendar day of `now`.
///
/// Candidates earlier than `now` are still considered. When all of them
/// conflict, the result is 19:00 on the next day without a conflict check
/// of its own; callers may receive a slot that overlaps an existing entry.
pub fn find_slot<Tz: TimeZone>(profile: &Profile, now: &DateTime<Tz>) -> DateTime<Utc> {
    let tz = now.timezone();
    let today = now.date_naive();

    let free_today = STUDY_SLOT_HOURS
        .iter()
        .filter_map(|hour| local_hour(&tz, today, *hour))
        .find(|candidate| !conflict_at(profile, *candidate));
    if let Some(slot) = free_today {
        return slot;
    }

    today
        .succ_opt()
        .and_then(|tomorrow| {
            local_hour(&tz, tomorrow, FALLBACK_SLOT_HOUR)
                .or_else(|| local_hour(&tz, tomorrow, FALLBACK_SLOT_HOUR + 1))
        })
        .unwrap_or_else(|| now.with_timezone(&Utc) + Duration::days(1))
}

/// Builds a Pomodoro study tip, adding one clause per matching interest.
///
/// Clause order is fixed: music, mindfulness, then coding (computer only).
pub fn build_tip(subject: Subject, interests: &[String]) -> String {
    let has = |tag: &str| has_interest(interests, tag);

    let mut tip = format!("โฟกัส {subject} 25 นาที พัก 5 นาที ทำ 2 รอบ (Pomodoro x2)");
    if has(INTEREST_MUSIC) {
        tip.push_str(TIP_SEPARATOR);
        tip.push_str(TIP_MUSIC);
    }
    if has(INTEREST_MINDFULNESS) {
        tip.push_str(TIP_SEPARATOR);
        tip.push_str(TIP_MINDFULNESS);
    }
    if has(INTEREST_CODING) && subject == Subject::Computer {
        tip.push_str(TIP_SEPARATOR);
        tip.push_str(TIP_CODING);
    }
    tip
}

/// Proposes the next study session for `profile` as of `now`.
pub fn next_study_suggestion<Tz: TimeZone>(profile: &Profile, now: &DateTime<Tz>) -> Suggestion {
    let subject = next_subject(profile.last_study_subject.as_deref(), now);
    Suggestion {
        subject,
        when: find_slot(profile, now),
        duration_min: STUDY_DURATION_MINUTES,
        tip: build_tip(subject, &profile.interests),
    }
}

/// Appends a schedule entry and announces it in the notification feed.
///
/// The notification body shows the entry time in the zone of `now`.
pub fn add_schedule<Tz>(profile: &mut Profile, draft: ScheduleDraft, now: &DateTime<Tz>) -> ScheduleEntry
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let entry = profile.push_schedule(draft);
    profile.push_notification(NotificationDraft {
        kind: NotificationKind::ScheduleAdded,
        title: SCHEDULE_ADDED_TITLE.to_string(),
        body: format!(
            "{}{TIP_SEPARATOR}{}",
            entry.title,
            format_datetime(&entry.when, &now.timezone())
        ),
        time: now.with_timezone(&Utc),
    });
    entry
}

/// Stores `suggestion` as a study entry and advances the rotation.
///
/// Not idempotent: every call appends a new entry with a fresh id.
pub fn accept_suggestion<Tz>(
    profile: &mut Profile,
    suggestion: &Suggestion,
    now: &DateTime<Tz>,
) -> ScheduleEntry
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let draft = ScheduleDraft {
        title: format!("{STUDY_TITLE_PREFIX}: {}", suggestion.subject),
        kind: ScheduleType::Study,
        subject: Some(suggestion.subject.label().to_string()),
        when: suggestion.when,
        notes: Some(suggestion.tip.clone()),
    };
    let entry = add_schedule(profile, draft, now);
    profile.last_study_subject = Some(suggestion.subject.label().to_string());
    entry
}

/// Entries starting no earlier than the look-back window before `now`,
/// soonest first, at most `limit` of them.
pub fn upcoming_schedules<Tz: TimeZone>(
    profile: &Profile,
    now: &DateTime<Tz>,
    limit: usize,
) -> Vec<ScheduleEntry> {
    let cutoff = now.with_timezone(&Utc) - Duration::minutes(UPCOMING_LOOKBACK_MINUTES);
    let mut upcoming: Vec<ScheduleEntry> = profile
        .schedules
        .iter()
        .filter(|entry| entry.when >= cutoff)
        .cloned()
        .collect();
    upcoming.sort_by_key(|entry| entry.when);
    upcoming.truncate(limit);
    upcoming
}
