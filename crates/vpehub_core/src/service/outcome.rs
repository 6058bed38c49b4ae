//! Business-rule results returned by mutating store operations.
//!
//! Rule violations are values, not errors: callers branch on `success` and
//! surface `message` to the operator.

use crate::model::achievement::AchievementId;
use crate::model::meeting::MeetingId;
use crate::model::member::{MemberId, MAX_LEVEL, MIN_LEVEL};
use crate::model::role_assignment::RoleAssignmentId;
use std::fmt::{Display, Formatter};

/// Roster mutation blocked by a completed meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterAction {
    Assign,
    Withdraw,
}

/// Business rule rejected by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    /// Role roster of a completed meeting is frozen.
    CompletedMeeting {
        meeting_id: MeetingId,
        action: RosterAction,
    },
    /// Referenced meeting does not exist.
    UnknownMeeting(MeetingId),
    /// Member already holds another role in the meeting.
    AlreadyAssigned {
        meeting_id: MeetingId,
        user_id: MemberId,
    },
    RoleNotFound(RoleAssignmentId),
    /// Level `N` submitted without a verified level `N - 1`.
    MissingPrerequisite {
        award_type: String,
        prerequisite: String,
    },
    /// Award label is not `Level N` with a supported level.
    MalformedAwardType(String),
    AchievementNotFound(AchievementId),
}

impl RuleViolation {
    /// Stable metadata-only code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::CompletedMeeting { .. } => "completed_meeting",
            Self::UnknownMeeting(_) => "unknown_meeting",
            Self::AlreadyAssigned { .. } => "already_assigned",
            Self::RoleNotFound(_) => "role_not_found",
            Self::MissingPrerequisite { .. } => "missing_prerequisite",
            Self::MalformedAwardType(_) => "malformed_award_type",
            Self::AchievementNotFound(_) => "achievement_not_found",
        }
    }
}

impl Display for RuleViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CompletedMeeting {
                action: RosterAction::Assign,
                ..
            } => write!(f, "Cannot edit roles for a completed meeting."),
            Self::CompletedMeeting {
                action: RosterAction::Withdraw,
                ..
            } => write!(f, "Cannot delete roles for a completed meeting."),
            Self::UnknownMeeting(meeting_id) => write!(f, "Meeting `{meeting_id}` not found."),
            Self::AlreadyAssigned { .. } => {
                write!(f, "You are already signed up for a role in this meeting.")
            }
            Self::RoleNotFound(_) => write!(f, "Role not found."),
            Self::MissingPrerequisite {
                award_type,
                prerequisite,
            } => write!(
                f,
                "Cannot log {award_type} until {prerequisite} is completed and verified."
            ),
            Self::MalformedAwardType(award_type) => write!(
                f,
                "Unrecognized award type `{award_type}`; expected `Level {MIN_LEVEL}` through `Level {MAX_LEVEL}`."
            ),
            Self::AchievementNotFound(_) => write!(f, "Achievement not found."),
        }
    }
}

/// `{success, message}` envelope for mutating store calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub success: bool,
    /// Human-readable text for the operator.
    pub message: String,
    /// Set exactly when `success` is `false`.
    pub violation: Option<RuleViolation>,
}

impl WriteOutcome {
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            violation: None,
        }
    }

    pub fn rejected(violation: RuleViolation) -> Self {
        Self {
            success: false,
            message: violation.to_string(),
            violation: Some(violation),
        }
    }
}
