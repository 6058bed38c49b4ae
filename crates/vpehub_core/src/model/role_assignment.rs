//! Meeting role sign-ups.
//!
//! # Invariants
//! - At most one assignment exists per (`meeting_id`, `user_id`) pair.

use super::meeting::MeetingId;
use super::member::MemberId;
use super::new_record_id;
use serde::{Deserialize, Serialize};

/// Stable identifier of a role assignment.
pub type RoleAssignmentId = String;

/// Fixed agenda roles a member can sign up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeetingRoleName {
    #[serde(rename = "Toastmaster of the Day")]
    ToastmasterOfTheDay,
    Speaker,
    Evaluator,
    #[serde(rename = "Table Topics Master")]
    TableTopicsMaster,
    #[serde(rename = "General Evaluator")]
    GeneralEvaluator,
    Grammarian,
    #[serde(rename = "Ah-Counter")]
    AhCounter,
    Timer,
}

impl MeetingRoleName {
    pub const ALL: [MeetingRoleName; 8] = [
        Self::ToastmasterOfTheDay,
        Self::Speaker,
        Self::Evaluator,
        Self::TableTopicsMaster,
        Self::GeneralEvaluator,
        Self::Grammarian,
        Self::AhCounter,
        Self::Timer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToastmasterOfTheDay => "Toastmaster of the Day",
            Self::Speaker => "Speaker",
            Self::Evaluator => "Evaluator",
            Self::TableTopicsMaster => "Table Topics Master",
            Self::GeneralEvaluator => "General Evaluator",
            Self::Grammarian => "Grammarian",
            Self::AhCounter => "Ah-Counter",
            Self::Timer => "Timer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(value))
    }
}

/// A member's claim on one agenda role for one meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
    pub id: RoleAssignmentId,
    pub meeting_id: MeetingId,
    pub user_id: MemberId,
    pub role_name: MeetingRoleName,
    /// Only meaningful for `Speaker`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_manual: Option<String>,
}

impl RoleAssignment {
    /// Creates a sign-up with a generated id and no speech details.
    pub fn new(
        meeting_id: impl Into<MeetingId>,
        user_id: impl Into<MemberId>,
        role_name: MeetingRoleName,
    ) -> Self {
        Self {
            id: new_record_id(),
            meeting_id: meeting_id.into(),
            user_id: user_id.into(),
            role_name,
            speech_title: None,
            project_manual: None,
        }
    }
}
