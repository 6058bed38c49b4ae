//! Meeting record and its status lifecycle.
//!
//! # Invariants
//! - A `Completed` meeting freezes its role roster.
//! - Status transitions are not restricted to a linear order.

use super::new_record_id;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of a meeting.
pub type MeetingId = String;

/// Meeting lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeetingStatus {
    Scheduled,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
}

impl MeetingStatus {
    pub const ALL: [MeetingStatus; 4] = [
        Self::Scheduled,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Parses a status label, ignoring case; `in-progress` is accepted too.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().replace(['-', '_'], " ");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(&normalized))
    }
}

/// One club meeting occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: MeetingId,
    pub date: NaiveDate,
    pub theme: String,
    pub toastmaster_of_the_day: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_link: Option<String>,
    pub meeting_status: MeetingStatus,
    pub created_at: DateTime<Utc>,
}

impl Meeting {
    /// Creates a `Scheduled` meeting with a generated id.
    pub fn schedule(
        date: NaiveDate,
        theme: impl Into<String>,
        toastmaster_of_the_day: impl Into<String>,
    ) -> Self {
        Self {
            id: new_record_id(),
            date,
            theme: theme.into(),
            toastmaster_of_the_day: toastmaster_of_the_day.into(),
            zoom_link: None,
            meeting_status: MeetingStatus::Scheduled,
            created_at: Utc::now(),
        }
    }

    /// Whether the role roster of this meeting is frozen.
    pub fn is_completed(&self) -> bool {
        self.meeting_status == MeetingStatus::Completed
    }
}
