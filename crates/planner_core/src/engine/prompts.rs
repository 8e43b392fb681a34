//! Daily reminder notifications derived from profile state.
//!
//! # Invariants
//! - At most one timetable prompt and one study reminder per calendar day.
//! - Once a prompt exists for today it is not re-evaluated, even if the
//!   timetable changes later that day.

use crate::engine::clock::same_local_day;
use crate::model::profile::{NotificationDraft, NotificationEntry, NotificationKind, Profile};
use chrono::{DateTime, Datelike, TimeZone, Utc};

pub const TIMETABLE_PROMPT_TITLE: &str = "ตั้งตารางสอนวันนี้หรือยัง?";
pub const TIMETABLE_PROMPT_BODY: &str =
    "เปิดหน้า “ตารางสอน” เพื่อตั้งคาบเรียนของวันนี้ จะช่วยให้ระบบแนะนำเวลาการอ่านแม่นขึ้น";
pub const STUDY_REMINDER_TITLE: &str = "เตือนการอ่านหนังสือประจำวัน";
pub const STUDY_REMINDER_BODY: &str =
    "วางแผนอ่านหนังสือวันนี้ในหน้า “แนะนำการอ่าน” แล้วกดบันทึกลงตาราง";

/// Emits today's missing prompts and returns the notifications it added.
///
/// - Timetable prompt: today's weekday has no classes and no timetable
///   prompt was created today.
/// - Study reminder: no study reminder was created today.
pub fn ensure_daily_prompts<Tz: TimeZone>(
    profile: &mut Profile,
    now: &DateTime<Tz>,
) -> Vec<NotificationEntry> {
    let today_has_classes = !profile.class_schedule.day(now.weekday()).is_empty();
    let needs_timetable_prompt = !today_has_classes
        && !created_today(profile, NotificationKind::TimetablePrompt, TIMETABLE_PROMPT_TITLE, now);
    let needs_study_reminder =
        !created_today(profile, NotificationKind::StudyReminder, STUDY_REMINDER_TITLE, now);

    let time = now.with_timezone(&Utc);
    let mut emitted = Vec::new();
    if needs_timetable_prompt {
        emitted.push(profile.push_notification(NotificationDraft {
            kind: NotificationKind::TimetablePrompt,
            title: TIMETABLE_PROMPT_TITLE.to_string(),
            body: TIMETABLE_PROMPT_BODY.to_string(),
            time,
        }));
    }
    if needs_study_reminder {
        emitted.push(profile.push_notification(NotificationDraft {
            kind: NotificationKind::StudyReminder,
            title: STUDY_REMINDER_TITLE.to_string(),
            body: STUDY_REMINDER_BODY.to_string(),
            time,
        }));
    }
    emitted
}

fn created_today<Tz: TimeZone>(
    profile: &Profile,
    kind: NotificationKind,
    title: &str,
    now: &DateTime<Tz>,
) -> bool {
    profile
        .notifications
        .iter()
        .filter(|entry| is_prompt(entry, kind, title))
        .any(|entry| same_local_day(&entry.time, now))
}

// Entries written before kind tags existed are matched by title.
fn is_prompt(entry: &NotificationEntry, kind: NotificationKind, title: &str) -> bool {
    entry.kind == kind || (entry.kind == NotificationKind::General && entry.title == title)
}
