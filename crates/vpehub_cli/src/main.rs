//! Operator CLI over the club store.
//!
//! # Responsibility
//! - Translate commands into store calls and print `message` results.
//! - Append the audit trail entry after each successful mutation; the store
//!   never logs activity on its own.
//!
//! # Invariants
//! - VPE-only commands are refused for other members, and members only
//!   withdraw their own sign-ups. These checks are advisory and not a
//!   security boundary.

use anyhow::{anyhow, bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use vpehub_core::db::open_db;
use vpehub_core::{
    init_logging, Achievement, DomainStore, KvRepository, Meeting, MeetingRoleName, MeetingStatus,
    Member, Pathway, RoleAssignment, SqliteKvRepository, StoreConfig, WriteOutcome,
};

/// Exit code for business-rule rejections, distinct from hard failures.
const EXIT_REJECTED: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "vpehub", version, about = "Club roster, meeting roles and pathway awards")]
struct Cli {
    /// Store database file (env: VPEHUB_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// trace|debug|info|warn|error (env: VPEHUB_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files (env: VPEHUB_LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    /// Member id of the person running the command
    #[arg(long = "as", value_name = "MEMBER_ID")]
    actor: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Member, meeting and verified award counts
    Stats,
    /// Print one collection as JSON
    List {
        #[arg(value_enum)]
        collection: ListTarget,
    },
    /// Sign up for a meeting role
    Assign {
        meeting_id: String,
        #[arg(value_parser = parse_role_name)]
        role: MeetingRoleName,
        #[arg(long)]
        speech_title: Option<String>,
        #[arg(long)]
        project_manual: Option<String>,
    },
    /// Withdraw from one of your own meeting roles
    Withdraw { assignment_id: String },
    /// Submit a pathway level award for verification
    SubmitAward {
        level: u8,
        /// Defaults to the member's current pathway
        #[arg(long, value_parser = parse_pathway)]
        path: Option<Pathway>,
    },
    /// Verify a submitted award (VPE only)
    VerifyAward { achievement_id: String },
    /// Change a meeting's status (VPE only)
    SetStatus {
        meeting_id: String,
        #[arg(value_parser = parse_meeting_status)]
        status: MeetingStatus,
    },
    /// Schedule a new meeting (VPE only)
    ScheduleMeeting {
        date: NaiveDate,
        theme: String,
        toastmaster_of_the_day: String,
        #[arg(long)]
        zoom_link: Option<String>,
    },
    /// Add a member to the roster (VPE only)
    AddMember {
        name: String,
        email: String,
        toastmasters_id: String,
        #[arg(long, value_parser = parse_pathway)]
        path: Pathway,
        /// Defaults to today
        #[arg(long)]
        joined: Option<NaiveDate>,
    },
    /// Remove a member from the roster (VPE only)
    RemoveMember { member_id: String },
    /// Turn multi-factor sign-in on or off for yourself
    SetMfa {
        #[arg(value_enum)]
        state: Toggle,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Toggle {
    On,
    Off,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ListTarget {
    Members,
    Meetings,
    Roles,
    Achievements,
    Logs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = StoreConfig::resolve(cli.db, cli.log_level, cli.log_dir);
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir).context("failed to initialize logging")?;
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open store at {}", config.db_path.display()))?;
    let store = DomainStore::new(SqliteKvRepository::try_new(&conn)?);
    let actor = store
        .find_member(&cli.actor)?
        .ok_or_else(|| anyhow!("acting member `{}` is not on the roster", cli.actor))?;
    info!(
        "event=cli_command module=cli status=start actor_id={} actor_role={} command={}",
        actor.id,
        actor.role.as_str(),
        command_name(&cli.command)
    );

    execute(&store, &actor, cli.command)
}

fn execute<R: KvRepository>(
    store: &DomainStore<R>,
    actor: &Member,
    command: Command,
) -> anyhow::Result<ExitCode> {
    match command {
        Command::Stats => {
            let stats = store.club_stats()?;
            println!("Active members:        {}", stats.members);
            println!("Meetings:              {}", stats.meetings);
            println!("Verified achievements: {}", stats.verified_achievements);
            Ok(ExitCode::SUCCESS)
        }
        Command::List { collection } => {
            match collection {
                ListTarget::Members => print_json(&store.list_members()?)?,
                ListTarget::Meetings => print_json(&store.list_meetings()?)?,
                ListTarget::Roles => print_json(&store.list_role_assignments()?)?,
                ListTarget::Achievements => print_json(&store.achievements_visible_to(actor)?)?,
                ListTarget::Logs => {
                    require_vpe(actor)?;
                    print_json(&store.list_logs()?)?;
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Assign {
            meeting_id,
            role,
            speech_title,
            project_manual,
        } => {
            let meeting_date = store
                .list_meetings()?
                .into_iter()
                .find(|meeting| meeting.id == meeting_id)
                .map(|meeting| meeting.date.to_string())
                .unwrap_or_else(|| meeting_id.clone());
            let mut assignment = RoleAssignment::new(meeting_id, actor.id.clone(), role);
            assignment.speech_title = speech_title;
            assignment.project_manual = project_manual;

            let outcome = store.assign_role(&assignment)?;
            let action = format!("Signed up for {} at {}", role.as_str(), meeting_date);
            finish(store, actor, outcome, &action)
        }
        Command::Withdraw { assignment_id } => {
            if let Some(assignment) = store
                .list_role_assignments()?
                .into_iter()
                .find(|assignment| assignment.id == assignment_id)
            {
                require_owner(actor, &assignment)?;
            }
            let outcome = store.withdraw_role(&assignment_id)?;
            finish(store, actor, outcome, "Withdrew from a meeting role")
        }
        Command::SubmitAward { level, path } => {
            let path = path.unwrap_or(actor.current_path);
            let achievement = Achievement::submitted(actor.id.clone(), level, path, today());
            let outcome = store.log_achievement(&achievement)?;
            let action = format!("Submitted {} for verification", achievement.award_type);
            finish(store, actor, outcome, &action)
        }
        Command::VerifyAward { achievement_id } => {
            require_vpe(actor)?;
            let achievement = store
                .list_achievements()?
                .into_iter()
                .find(|achievement| achievement.id == achievement_id);
            let outcome = store.verify_achievement(&achievement_id)?;
            let action = match achievement {
                Some(achievement) => {
                    let owner = store
                        .find_member(&achievement.user_id)?
                        .map_or_else(|| achievement.user_id.clone(), |member| member.name);
                    format!("Verified {} for {}", achievement.award_type, owner)
                }
                None => format!("Verified achievement {achievement_id}"),
            };
            finish(store, actor, outcome, &action)
        }
        Command::SetStatus { meeting_id, status } => {
            require_vpe(actor)?;
            let outcome = store.set_meeting_status(&meeting_id, status)?;
            let action = format!("Set meeting {} to {}", meeting_id, status.as_str());
            finish(store, actor, outcome, &action)
        }
        Command::ScheduleMeeting {
            date,
            theme,
            toastmaster_of_the_day,
            zoom_link,
        } => {
            require_vpe(actor)?;
            let mut meeting = Meeting::schedule(date, theme, toastmaster_of_the_day);
            meeting.zoom_link = zoom_link;
            store.upsert_meeting(&meeting)?;
            let action = format!("Scheduled meeting for {}", meeting.date);
            finish(
                store,
                actor,
                WriteOutcome::accepted(format!("Meeting {} scheduled.", meeting.id)),
                &action,
            )
        }
        Command::AddMember {
            name,
            email,
            toastmasters_id,
            path,
            joined,
        } => {
            require_vpe(actor)?;
            let joined = joined.unwrap_or_else(today);
            let mut member = Member::new(name, email, toastmasters_id, path, joined);
            member.mentor_name = actor.name.clone();
            store.upsert_member(&member)?;
            let action = format!("Manually added {} to roster", member.name);
            finish(
                store,
                actor,
                WriteOutcome::accepted(format!("Member {} added.", member.id)),
                &action,
            )
        }
        Command::RemoveMember { member_id } => {
            require_vpe(actor)?;
            let removed = store
                .find_member(&member_id)?
                .ok_or_else(|| anyhow!("member `{member_id}` is not on the roster"))?;
            store.delete_member(&member_id)?;
            let action = format!("Removed {} from club roster", removed.name);
            finish(store, actor, WriteOutcome::accepted("Member removed."), &action)
        }
        Command::SetMfa { state } => {
            let enabled = state == Toggle::On;
            let mut updated = actor.clone();
            updated.mfa_enabled = enabled;
            store.upsert_member(&updated)?;
            let (message, action) = if enabled {
                ("MFA enabled.", "Enabled MFA security")
            } else {
                ("MFA disabled.", "Disabled MFA security")
            };
            finish(store, actor, WriteOutcome::accepted(message), action)
        }
    }
}

/// Prints the outcome and, on success, appends the audit trail entry.
fn finish<R: KvRepository>(
    store: &DomainStore<R>,
    actor: &Member,
    outcome: WriteOutcome,
    action: &str,
) -> anyhow::Result<ExitCode> {
    if !outcome.success {
        eprintln!("{}", outcome.message);
        return Ok(ExitCode::from(EXIT_REJECTED));
    }
    store.append_log(&actor.id, &actor.name, action)?;
    println!("{}", outcome.message);
    Ok(ExitCode::SUCCESS)
}

fn require_vpe(actor: &Member) -> anyhow::Result<()> {
    if !actor.is_education_vp() {
        bail!("access restricted to VPE only");
    }
    Ok(())
}

fn require_owner(actor: &Member, assignment: &RoleAssignment) -> anyhow::Result<()> {
    if assignment.user_id != actor.id {
        bail!("you can only withdraw from your own roles");
    }
    Ok(())
}

fn print_json<T: Serialize>(records: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Stats => "stats",
        Command::List { .. } => "list",
        Command::Assign { .. } => "assign",
        Command::Withdraw { .. } => "withdraw",
        Command::SubmitAward { .. } => "submit_award",
        Command::VerifyAward { .. } => "verify_award",
        Command::SetStatus { .. } => "set_status",
        Command::ScheduleMeeting { .. } => "schedule_meeting",
        Command::AddMember { .. } => "add_member",
        Command::RemoveMember { .. } => "remove_member",
        Command::SetMfa { .. } => "set_mfa",
    }
}

fn parse_role_name(value: &str) -> Result<MeetingRoleName, String> {
    MeetingRoleName::parse(value).ok_or_else(|| {
        format!(
            "unknown role `{value}`; expected one of: {}",
            MeetingRoleName::ALL.map(MeetingRoleName::as_str).join(", ")
        )
    })
}

fn parse_pathway(value: &str) -> Result<Pathway, String> {
    Pathway::parse(value).ok_or_else(|| {
        format!(
            "unknown pathway `{value}`; expected one of: {}",
            Pathway::ALL.map(Pathway::as_str).join(", ")
        )
    })
}

fn parse_meeting_status(value: &str) -> Result<MeetingStatus, String> {
    MeetingStatus::parse(value).ok_or_else(|| {
        format!(
            "unknown status `{value}`; expected one of: {}",
            MeetingStatus::ALL.map(MeetingStatus::as_str).join(", ")
        )
    })
}
