//! Typed collections stored as JSON blobs in the key-value repository.
//!
//! # Responsibility
//! - Bind each record type to its persisted key and seed dataset.
//! - Implement seed-and-persist loading and replace-or-append upserts.
//!
//! # Invariants
//! - Upsert keeps the position of a replaced record.
//! - Loading never reorders records.

use super::kv_repo::{KvRepository, RepoError, RepoResult};
use super::seed;
use crate::model::achievement::Achievement;
use crate::model::activity_log::ActivityLog;
use crate::model::meeting::Meeting;
use crate::model::member::Member;
use crate::model::role_assignment::RoleAssignment;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Persisted collections and their storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Members,
    Meetings,
    MeetingRoles,
    Achievements,
    Logs,
}

impl Collection {
    /// Key of the collection blob in the key-value repository.
    pub fn key(self) -> &'static str {
        match self {
            Self::Members => "members",
            Self::Meetings => "meetings",
            Self::MeetingRoles => "meeting_roles",
            Self::Achievements => "achievements",
            Self::Logs => "logs",
        }
    }
}

/// A record type persisted as one collection.
pub trait StoredRecord: Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    fn record_id(&self) -> &str;

    /// Records written when the collection is read for the first time.
    fn seed() -> Vec<Self> {
        Vec::new()
    }
}

impl StoredRecord for Member {
    const COLLECTION: Collection = Collection::Members;

    fn record_id(&self) -> &str {
        &self.id
    }

    fn seed() -> Vec<Self> {
        seed::members()
    }
}

impl StoredRecord for Meeting {
    const COLLECTION: Collection = Collection::Meetings;

    fn record_id(&self) -> &str {
        &self.id
    }

    fn seed() -> Vec<Self> {
        seed::meetings()
    }
}

impl StoredRecord for RoleAssignment {
    const COLLECTION: Collection = Collection::MeetingRoles;

    fn record_id(&self) -> &str {
        &self.id
    }
}

impl StoredRecord for Achievement {
    const COLLECTION: Collection = Collection::Achievements;

    fn record_id(&self) -> &str {
        &self.id
    }

    fn seed() -> Vec<Self> {
        seed::achievements()
    }
}

impl StoredRecord for ActivityLog {
    const COLLECTION: Collection = Collection::Logs;

    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Loads a whole collection, seeding and persisting it when absent.
pub fn load_records<T, R>(repo: &R) -> RepoResult<Vec<T>>
where
    T: StoredRecord,
    R: KvRepository,
{
    let key = T::COLLECTION.key();
    match repo.get(key)? {
        Some(blob) => {
            serde_json::from_str(&blob).map_err(|source| RepoError::Serialization { key, source })
        }
        None => {
            let seeded = T::seed();
            save_records(repo, &seeded)?;
            info!(
                "event=collection_seed module=repo status=ok key={} count={}",
                key,
                seeded.len()
            );
            Ok(seeded)
        }
    }
}

/// Replaces a whole collection blob.
pub fn save_records<T, R>(repo: &R, records: &[T]) -> RepoResult<()>
where
    T: StoredRecord,
    R: KvRepository,
{
    let key = T::COLLECTION.key();
    let blob =
        serde_json::to_string(records).map_err(|source| RepoError::Serialization { key, source })?;
    repo.set(key, &blob)?;
    debug!(
        "event=collection_save module=repo status=ok key={} count={}",
        key,
        records.len()
    );
    Ok(())
}

/// Replaces the record with the same id in place, or appends it.
///
/// Returns `true` when an existing record was replaced.
pub fn upsert_record<T: StoredRecord>(records: &mut Vec<T>, record: T) -> bool {
    match records
        .iter()
        .position(|existing| existing.record_id() == record.record_id())
    {
        Some(index) => {
            records[index] = record;
            true
        }
        None => {
            records.push(record);
            false
        }
    }
}
