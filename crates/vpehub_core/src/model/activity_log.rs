//! Append-only audit trail entries.

use super::member::MemberId;
use super::new_record_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type LogId = String;

/// One audit trail entry. Never mutated or deleted once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: LogId,
    pub user_id: MemberId,
    /// Actor name captured at write time; not kept in sync with the roster.
    pub user_name: String,
    pub action: String,
    pub timestamp: DateTime<Utc>,
}

impl ActivityLog {
    /// Stamps a new entry with a generated id and the current instant.
    pub fn record(
        user_id: impl Into<MemberId>,
        user_name: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            id: new_record_id(),
            user_id: user_id.into(),
            user_name: user_name.into(),
            action: action.into(),
            timestamp: Utc::now(),
        }
    }
}
