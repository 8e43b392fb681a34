use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc, Weekday};
use planner_core::db::{open_db, open_db_in_memory};
use planner_core::{
    AuthService, ClassSlot, NotificationDraft, NotificationKind, PlannerError, PlannerService,
    ScheduleDraft, Session, SignUpRequest, SqliteKeyValueStore, Subject,
};
use rusqlite::Connection;

fn now() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(7 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 5, 14, 15, 30, 0)
        .unwrap()
}

fn signed_up(conn: &Connection) -> Session {
    let auth = AuthService::new(SqliteKeyValueStore::try_new(conn).unwrap());
    auth.sign_up(SignUpRequest {
        email: "ploy@school.th".to_string(),
        password: "secret".to_string(),
        name: Some("Ploy".to_string()),
    })
    .unwrap()
}

fn slot(time: &str, subject: &str) -> ClassSlot {
    ClassSlot {
        time: time.to_string(),
        subject: subject.to_string(),
        room: String::new(),
    }
}

#[test]
fn add_and_delete_schedule_round_trip_through_storage() {
    let conn = open_db_in_memory().unwrap();
    let session = signed_up(&conn);
    let planner = PlannerService::new(SqliteKeyValueStore::try_new(&conn).unwrap());

    let when = now().with_timezone(&Utc) + Duration::hours(2);
    let entry = planner
        .add_schedule(&session, ScheduleDraft::generic("  ส่งรายงาน  ", when), &now())
        .unwrap();
    assert_eq!(entry.title, "ส่งรายงาน");

    let profile = planner.profile(&session).unwrap();
    assert_eq!(profile.schedules, vec![entry.clone()]);
    assert_eq!(profile.notifications[0].kind, NotificationKind::ScheduleAdded);
    assert_eq!(profile.notifications[0].body, "ส่งรายงาน • 14 May 2024 17:30");

    let removed = planner.delete_schedule(&session, entry.id).unwrap();
    assert_eq!(removed.id, entry.id);
    assert!(planner.profile(&session).unwrap().schedules.is_empty());

    let err = planner.delete_schedule(&session, entry.id).unwrap_err();
    assert!(matches!(err, PlannerError::ScheduleNotFound(id) if id == entry.id));
}

#[test]
fn blank_schedule_title_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let session = signed_up(&conn);
    let planner = PlannerService::new(SqliteKeyValueStore::try_new(&conn).unwrap());

    let err = planner
        .add_schedule(
            &session,
            ScheduleDraft::generic("   ", now().with_timezone(&Utc)),
            &now(),
        )
        .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidTitle));
    assert!(planner.profile(&session).unwrap().notifications.is_empty());
}

#[test]
fn upcoming_uses_default_limit_of_five() {
    let conn = open_db_in_memory().unwrap();
    let session = signed_up(&conn);
    let planner = PlannerService::new(SqliteKeyValueStore::try_new(&conn).unwrap());

    for offset in (1..=7).rev() {
        let when = now().with_timezone(&Utc) + Duration::days(offset);
        planner
            .add_schedule(&session, ScheduleDraft::generic(format!("day {offset}"), when), &now())
            .unwrap();
    }

    let upcoming = planner.upcoming_schedules(&session, &now(), None).unwrap();
    assert_eq!(upcoming.len(), 5);
    assert_eq!(upcoming[0].title, "day 1");
    assert_eq!(upcoming[4].title, "day 5");
    assert_eq!(
        planner
            .upcoming_schedules(&session, &now(), Some(2))
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn notifications_can_be_marked_read_individually_and_in_bulk() {
    let conn = open_db_in_memory().unwrap();
    let session = signed_up(&conn);
    let planner = PlannerService::new(SqliteKeyValueStore::try_new(&conn).unwrap());

    let created = planner
        .add_notification(
            &session,
            NotificationDraft {
                kind: NotificationKind::General,
                title: "ประกาศ".to_string(),
                body: "สอบกลางภาค".to_string(),
                time: now().with_timezone(&Utc),
            },
        )
        .unwrap();
    planner.ensure_daily_prompts(&session, &now()).unwrap();
    assert_eq!(planner.unread_count(&session).unwrap(), 3);

    planner.mark_read(&session, created.id).unwrap();
    assert_eq!(planner.unread_count(&session).unwrap(), 2);
    assert_eq!(planner.mark_all_read(&session).unwrap(), 2);
    assert_eq!(planner.unread_count(&session).unwrap(), 0);
    assert_eq!(planner.notifications(&session).unwrap().len(), 3);

    let missing = uuid::Uuid::new_v4();
    assert!(matches!(
        planner.mark_read(&session, missing),
        Err(PlannerError::NotificationNotFound(id)) if id == missing
    ));
}

#[test]
fn interests_and_timetable_are_normalized_before_storage() {
    let conn = open_db_in_memory().unwrap();
    let session = signed_up(&conn);
    let planner = PlannerService::new(SqliteKeyValueStore::try_new(&conn).unwrap());

    let stored = planner
        .set_interests(
            &session,
            &[
                "ฟังเพลง".to_string(),
                " ฟังเพลง ".to_string(),
                String::new(),
                "เต้น".to_string(),
            ],
        )
        .unwrap();
    assert_eq!(stored, vec!["ฟังเพลง".to_string(), "เต้น".to_string()]);

    let day = planner
        .set_class_day(
            &session,
            Weekday::Tue,
            vec![slot("13:00", "ศิลปะ"), slot("8:30", "คณิตศาสตร์")],
        )
        .unwrap();
    assert_eq!(day[0].time, "08:30");
    assert_eq!(day[1].subject, "ศิลปะ");

    let profile = planner.profile(&session).unwrap();
    assert_eq!(profile.class_schedule.day(Weekday::Tue), day.as_slice());
    assert!(profile.class_schedule.day(Weekday::Wed).is_empty());

    let err = planner
        .set_class_day(&session, Weekday::Wed, vec![slot("late", "ศิลปะ")])
        .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidClassTime(ref value) if value == "late"));
}

#[test]
fn suggestion_flow_persists_rotation_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planner.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let session = signed_up(&conn);
        let planner = PlannerService::new(SqliteKeyValueStore::try_new(&conn).unwrap());
        let suggestion = planner.next_study_suggestion(&session, &now()).unwrap();
        assert_eq!(suggestion.subject, Subject::Science);
        planner
            .accept_suggestion(&session, &suggestion, &now())
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    let session = AuthService::new(store)
        .active_session()
        .unwrap()
        .expect("session pointer persisted");
    let planner = PlannerService::new(store);

    let profile = planner.profile(&session).unwrap();
    assert_eq!(profile.last_study_subject.as_deref(), Some("วิทยาศาสตร์"));
    assert_eq!(profile.schedules.len(), 1);

    let next = planner.next_study_suggestion(&session, &now()).unwrap();
    assert_eq!(next.subject, Subject::English);
    assert_eq!(
        next.when,
        profile.schedules[0].when + Duration::hours(1)
    );
}

#[test]
fn stored_profile_document_keeps_original_field_names() {
    let conn = open_db_in_memory().unwrap();
    let session = signed_up(&conn);
    let planner = PlannerService::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    let suggestion = planner.next_study_suggestion(&session, &now()).unwrap();
    planner
        .accept_suggestion(&session, &suggestion, &now())
        .unwrap();

    let raw: String = conn
        .query_row(
            "SELECT value FROM kv_entries WHERE key = 'sp_profiles';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let profile = &doc["ploy@school.th"];
    assert_eq!(profile["lastStudySubject"], "วิทยาศาสตร์");
    assert_eq!(profile["schedules"][0]["type"], "study");
    assert!(profile["schedules"][0]["whenISO"].is_string());
    assert!(profile["notifications"][0]["timeISO"].is_string());
    assert!(profile["classSchedule"]["Mon"].is_array());
}
