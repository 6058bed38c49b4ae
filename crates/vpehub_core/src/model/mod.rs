//! Club domain model: members, meetings, role assignments, achievements
//! and the activity trail.
//!
//! # Responsibility
//! - Define canonical record shapes shared by the store and its callers.
//! - Fix the persisted JSON spelling of every field and enum value.
//!
//! # Invariants
//! - Every record is identified by an opaque string id that is never reused.
//! - Deletion is a hard delete; there are no tombstones.

use uuid::Uuid;

pub mod achievement;
pub mod activity_log;
pub mod meeting;
pub mod member;
pub mod role_assignment;

/// Generates an opaque id for a new record.
pub fn new_record_id() -> String {
    Uuid::new_v4().simple().to_string()
}
