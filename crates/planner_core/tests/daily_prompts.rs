use chrono::{DateTime, FixedOffset, TimeZone, Weekday};
use planner_core::engine::prompts::{STUDY_REMINDER_TITLE, TIMETABLE_PROMPT_TITLE};
use planner_core::{ensure_daily_prompts, ClassSlot, NotificationKind, Profile};

fn bangkok_at(day: u32, hour: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(7 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 5, day, hour, 0, 0)
        .unwrap()
}

fn math_class() -> ClassSlot {
    ClassSlot {
        time: "08:30".to_string(),
        subject: "คณิตศาสตร์".to_string(),
        room: "301".to_string(),
    }
}

#[test]
fn second_call_on_the_same_day_adds_nothing() {
    let mut profile = Profile::default();

    let first = ensure_daily_prompts(&mut profile, &bangkok_at(14, 7));
    assert_eq!(first.len(), 2);
    assert_eq!(profile.notifications.len(), 2);
    assert_eq!(profile.notifications[0].title, STUDY_REMINDER_TITLE);
    assert_eq!(profile.notifications[1].title, TIMETABLE_PROMPT_TITLE);
    assert_eq!(profile.unread_count(), 2);

    let second = ensure_daily_prompts(&mut profile, &bangkok_at(14, 21));
    assert!(second.is_empty());
    assert_eq!(profile.notifications.len(), 2);
}

#[test]
fn classes_today_suppress_only_the_timetable_prompt() {
    let mut profile = Profile::default();
    profile
        .class_schedule
        .set_day(Weekday::Tue, vec![math_class()]);

    let emitted = ensure_daily_prompts(&mut profile, &bangkok_at(14, 7));
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].kind, NotificationKind::StudyReminder);
}

#[test]
fn prompts_return_on_the_next_calendar_day() {
    let mut profile = Profile::default();
    profile
        .class_schedule
        .set_day(Weekday::Wed, vec![math_class()]);

    assert_eq!(ensure_daily_prompts(&mut profile, &bangkok_at(14, 23)).len(), 2);
    let wednesday = ensure_daily_prompts(&mut profile, &bangkok_at(15, 6));
    assert_eq!(wednesday.len(), 1);
    assert_eq!(wednesday[0].kind, NotificationKind::StudyReminder);
    assert_eq!(profile.notifications.len(), 3);
}

#[test]
fn editing_the_timetable_later_the_same_day_changes_nothing() {
    let mut profile = Profile::default();
    ensure_daily_prompts(&mut profile, &bangkok_at(14, 7));

    profile
        .class_schedule
        .set_day(Weekday::Tue, vec![math_class()]);
    assert!(ensure_daily_prompts(&mut profile, &bangkok_at(14, 12)).is_empty());

    profile.class_schedule.set_day(Weekday::Tue, Vec::new());
    assert!(ensure_daily_prompts(&mut profile, &bangkok_at(14, 13)).is_empty());
    assert_eq!(profile.notifications.len(), 2);
}
