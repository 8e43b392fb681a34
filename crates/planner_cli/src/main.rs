//! Terminal front end for the student planner.
//!
//! # Responsibility
//! - Parse commands and configuration (flags or `PLANNER_*` env vars).
//! - Drive `planner_core` services against a local SQLite database.
//! - Keep all wall-clock reads here; core receives explicit `now` values.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc, Weekday};
use clap::{Parser, Subcommand};
use log::info;
use planner_core::db::open_db;
use planner_core::engine::clock::{format_class_time, format_datetime};
use planner_core::{
    core_version, default_log_level, init_logging, AuthService, ClassSlot, KeyValueStore,
    NotificationId, PlannerService, ScheduleDraft, ScheduleId, Session, SignUpRequest,
    SqliteKeyValueStore, DEFAULT_INTERESTS,
};
use std::path::PathBuf;

const DB_FILE_NAME: &str = "student_planner.sqlite3";
const AT_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Parser, Debug)]
#[command(name = "planner", version, about = "Local student planner")]
struct Args {
    /// SQLite database path.
    #[arg(long, env = "PLANNER_DB_PATH")]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "PLANNER_LOG_DIR")]
    log_dir: Option<String>,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long, env = "PLANNER_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register an account and sign in.
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Sign in to an existing account.
    Signin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Clear the active session.
    Signout,
    /// Show the signed-in account.
    Whoami,
    /// Show or replace interests.
    Interests {
        /// Comma-separated interest tags to store.
        #[arg(long, value_delimiter = ',')]
        set: Option<Vec<String>>,
    },
    /// Show or edit the weekly class timetable.
    Timetable {
        #[command(subcommand)]
        action: TimetableAction,
    },
    /// Add a schedule entry.
    Add {
        #[arg(long)]
        title: String,
        /// Local start time, `YYYY-MM-DD HH:MM`.
        #[arg(long)]
        at: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a schedule entry by id.
    Delete {
        #[arg(long)]
        id: ScheduleId,
    },
    /// List upcoming schedule entries.
    Upcoming {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Suggest the next study session.
    Suggest {
        /// Store the suggestion as a schedule entry.
        #[arg(long)]
        accept: bool,
    },
    /// Emit today's reminder notifications if still missing.
    Prompts,
    /// List notifications.
    Notifications {
        #[arg(long)]
        mark_all_read: bool,
        #[arg(long)]
        mark_read: Option<NotificationId>,
    },
}

#[derive(Subcommand, Debug)]
enum TimetableAction {
    /// Print all seven days.
    Show,
    /// Replace one day's classes.
    Set {
        /// Weekday, e.g. `mon` or `Tuesday`.
        #[arg(long, value_parser = parse_weekday)]
        day: Weekday,
        /// Class as `HH:MM|subject|room`; repeat for each class.
        #[arg(long = "slot", value_parser = parse_slot)]
        slots: Vec<ClassSlot>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(log_dir) = args.log_dir.as_deref() {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(anyhow::Error::msg)?;
    }

    let db_path = args
        .db
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join(DB_FILE_NAME));
    let conn = open_db(&db_path)
        .with_context(|| format!("failed to open planner database `{}`", db_path.display()))?;
    let store = SqliteKeyValueStore::try_new(&conn)?;
    let auth = AuthService::new(store);
    let planner = PlannerService::new(store);
    let now = Local::now();
    info!(
        "event=cli_start module=cli status=ok core_version={}",
        core_version()
    );

    match args.command {
        Command::Signup {
            email,
            password,
            name,
        } => {
            let session = auth.sign_up(SignUpRequest {
                email,
                password,
                name,
            })?;
            println!("signed up as {}", auth.display_name(&session)?);
            println!("pick interests with `planner interests --set ...`:");
            println!("  {}", DEFAULT_INTERESTS.join(", "));
        }
        Command::Signin { email, password } => {
            let session = auth.sign_in(&email, &password)?;
            println!("ยินดีต้อนรับ {} 👋", auth.display_name(&session)?);
        }
        Command::Signout => {
            auth.sign_out()?;
            println!("signed out");
        }
        Command::Whoami => {
            let session = require_session(&auth)?;
            let unread = planner.unread_count(&session)?;
            println!(
                "{} <{}> unread={}",
                auth.display_name(&session)?,
                session.account_id(),
                unread
            );
        }
        Command::Interests { set } => {
            let session = require_session(&auth)?;
            let interests = match set {
                Some(tags) => planner.set_interests(&session, &tags)?,
                None => planner.profile(&session)?.interests,
            };
            if interests.is_empty() {
                println!("no interests yet; choose from: {}", DEFAULT_INTERESTS.join(", "));
            } else {
                println!("{}", interests.join(", "));
            }
        }
        Command::Timetable { action } => {
            let session = require_session(&auth)?;
            match action {
                TimetableAction::Show => {
                    let profile = planner.profile(&session)?;
                    for day in WEEK {
                        print_day(day, profile.class_schedule.day(day));
                    }
                }
                TimetableAction::Set { day, slots } => {
                    let stored = planner.set_class_day(&session, day, slots)?;
                    print_day(day, &stored);
                }
            }
        }
        Command::Add { title, at, notes } => {
            let session = require_session(&auth)?;
            let mut draft = ScheduleDraft::generic(title, parse_local(&at)?);
            draft.notes = notes;
            let entry = planner.add_schedule(&session, draft, &now)?;
            println!("added {} {}", entry.id, entry.title);
        }
        Command::Delete { id } => {
            let session = require_session(&auth)?;
            let removed = planner.delete_schedule(&session, id)?;
            println!("deleted {}", removed.title);
        }
        Command::Upcoming { limit } => {
            let session = require_session(&auth)?;
            let entries = planner.upcoming_schedules(&session, &now, limit)?;
            if entries.is_empty() {
                println!("nothing scheduled");
            }
            for entry in entries {
                println!(
                    "{}  {}  {}",
                    format_datetime(&entry.when, &Local),
                    entry.title,
                    entry.id
                );
            }
        }
        Command::Suggest { accept } => {
            let session = require_session(&auth)?;
            let suggestion = planner.next_study_suggestion(&session, &now)?;
            println!(
                "{} at {} ({} min)",
                suggestion.subject,
                format_datetime(&suggestion.when, &Local),
                suggestion.duration_min
            );
            println!("{}", suggestion.tip);
            if accept {
                let entry = planner.accept_suggestion(&session, &suggestion, &now)?;
                println!("saved {} {}", entry.id, entry.title);
            }
        }
        Command::Prompts => {
            let session = require_session(&auth)?;
            let emitted = planner.ensure_daily_prompts(&session, &now)?;
            for entry in &emitted {
                println!("{}: {}", entry.title, entry.body);
            }
            println!("{} new reminder(s)", emitted.len());
        }
        Command::Notifications {
            mark_all_read,
            mark_read,
        } => {
            let session = require_session(&auth)?;
            if let Some(id) = mark_read {
                planner.mark_read(&session, id)?;
            }
            if mark_all_read {
                planner.mark_all_read(&session)?;
            }
            for entry in planner.notifications(&session)? {
                let marker = if entry.read { ' ' } else { '*' };
                println!(
                    "{marker} {}  {}  {}",
                    format_datetime(&entry.time, &Local),
                    entry.title,
                    entry.body
                );
            }
        }
    }

    Ok(())
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn require_session<S: KeyValueStore>(auth: &AuthService<S>) -> Result<Session> {
    auth.active_session()?
        .context("not signed in; run `planner signin` first")
}

fn print_day(day: Weekday, slots: &[ClassSlot]) {
    if slots.is_empty() {
        println!("{day}: -");
        return;
    }
    let rendered: Vec<String> = slots
        .iter()
        .map(|slot| {
            if slot.room.is_empty() {
                format!("{} {}", format_class_time(&slot.time), slot.subject)
            } else {
                format!(
                    "{} {} ({})",
                    format_class_time(&slot.time),
                    slot.subject,
                    slot.room
                )
            }
        })
        .collect();
    println!("{day}: {}", rendered.join(", "));
}

fn parse_local(value: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), AT_FORMAT)
        .with_context(|| format!("expected `{AT_FORMAT}`, got `{value}`"))?;
    let Some(local) = Local.from_local_datetime(&naive).earliest() else {
        bail!("`{value}` does not exist in the local time zone");
    };
    Ok(local.with_timezone(&Utc))
}

fn parse_weekday(value: &str) -> Result<Weekday, String> {
    value
        .trim()
        .parse::<Weekday>()
        .map_err(|_| format!("unknown weekday `{value}`"))
}

fn parse_slot(value: &str) -> Result<ClassSlot, String> {
    let mut parts = value.split('|').map(str::trim);
    let time = parts.next().unwrap_or_default();
    let Some(subject) = parts.next().filter(|subject| !subject.is_empty()) else {
        return Err(format!("expected `HH:MM|subject|room`, got `{value}`"));
    };
    Ok(ClassSlot {
        time: time.to_string(),
        subject: subject.to_string(),
        room: parts.next().unwrap_or_default().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_slot, parse_weekday, Args, Command, NotificationId};
    use chrono::Weekday;
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn notifications_accepts_a_notification_id_to_mark_read() {
        let id = "0c8c9a3e-2d7b-4b4a-8d8b-6a0d8f3e2c11";
        let args = Args::try_parse_from(["planner", "notifications", "--mark-read", id])
            .expect("valid notification id");
        let expected: NotificationId = id.parse().expect("uuid");
        assert!(matches!(
            args.command,
            Command::Notifications {
                mark_all_read: false,
                mark_read: Some(parsed),
            } if parsed == expected
        ));

        let bad = Args::try_parse_from(["planner", "notifications", "--mark-read", "not-an-id"]);
        assert!(bad.is_err());
    }

    #[test]
    fn parse_slot_accepts_optional_room() {
        let slot = parse_slot("08:30 | คณิตศาสตร์ | 301").expect("valid slot");
        assert_eq!(slot.time, "08:30");
        assert_eq!(slot.subject, "คณิตศาสตร์");
        assert_eq!(slot.room, "301");

        let no_room = parse_slot("13:00|ศิลปะ").expect("room is optional");
        assert!(no_room.room.is_empty());
        assert!(parse_slot("13:00").is_err());
    }

    #[test]
    fn parse_weekday_accepts_short_and_long_names() {
        assert_eq!(parse_weekday("mon"), Ok(Weekday::Mon));
        assert_eq!(parse_weekday("Tuesday"), Ok(Weekday::Tue));
        assert!(parse_weekday("someday").is_err());
    }
}
