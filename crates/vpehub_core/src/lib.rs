//! Core domain logic for the club VPE hub.
//! This crate is the single source of truth for club business rules.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::StoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::achievement::{award_type_for_level, parse_award_level, Achievement, AchievementId};
pub use model::activity_log::{ActivityLog, LogId};
pub use model::meeting::{Meeting, MeetingId, MeetingStatus};
pub use model::member::{Member, MemberId, Pathway, UserRole, MAX_LEVEL, MIN_LEVEL};
pub use model::new_record_id;
pub use model::role_assignment::{MeetingRoleName, RoleAssignment, RoleAssignmentId};
pub use repo::collection::{Collection, StoredRecord};
pub use repo::kv_repo::{KvRepository, RepoError, RepoResult, SqliteKvRepository};
pub use service::domain_store::{ClubStats, DomainStore};
pub use service::outcome::{RosterAction, RuleViolation, WriteOutcome};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
