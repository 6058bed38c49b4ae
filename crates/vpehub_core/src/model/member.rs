//! Member roster record.
//!
//! # Responsibility
//! - Define the member profile and education progress shape.
//! - Provide the advisory role check used by callers to gate VPE actions.
//!
//! # Invariants
//! - `current_level` stays within `MIN_LEVEL..=MAX_LEVEL`.
//! - `current_level` never decreases; only achievement verification raises it.

use super::new_record_id;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable identifier of a roster member.
pub type MemberId = String;

/// First level of every pathway.
pub const MIN_LEVEL: u8 = 1;
/// Last level of every pathway.
pub const MAX_LEVEL: u8 = 5;

/// Club role of a member.
///
/// The role only drives advisory checks in callers; the store never
/// consults it when accepting writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    /// Ordinary club member.
    #[serde(rename = "MEMBER")]
    Member,
    /// Vice President of Education: manages roster, meetings and verification.
    #[serde(rename = "VPE")]
    EducationVp,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "MEMBER",
            Self::EducationVp => "VPE",
        }
    }
}

/// Curriculum track a member progresses through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pathway {
    #[serde(rename = "Dynamic Leadership")]
    DynamicLeadership,
    #[serde(rename = "Effective Coaching")]
    EffectiveCoaching,
    #[serde(rename = "Engaging Humor")]
    EngagingHumor,
    #[serde(rename = "Innovative Planning")]
    InnovativePlanning,
    #[serde(rename = "Leadership Development")]
    LeadershipDevelopment,
    #[serde(rename = "Motivational Strategies")]
    MotivationalStrategies,
    #[serde(rename = "Persuasive Influence")]
    PersuasiveInfluence,
    #[serde(rename = "Presentation Mastery")]
    PresentationMastery,
    #[serde(rename = "Strategic Relationships")]
    StrategicRelationships,
    #[serde(rename = "Team Collaboration")]
    TeamCollaboration,
    #[serde(rename = "Visionary Communication")]
    VisionaryCommunication,
}

impl Pathway {
    /// Every pathway, in catalogue order.
    pub const ALL: [Pathway; 11] = [
        Self::DynamicLeadership,
        Self::EffectiveCoaching,
        Self::EngagingHumor,
        Self::InnovativePlanning,
        Self::LeadershipDevelopment,
        Self::MotivationalStrategies,
        Self::PersuasiveInfluence,
        Self::PresentationMastery,
        Self::StrategicRelationships,
        Self::TeamCollaboration,
        Self::VisionaryCommunication,
    ];

    /// Display name, identical to the persisted spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DynamicLeadership => "Dynamic Leadership",
            Self::EffectiveCoaching => "Effective Coaching",
            Self::EngagingHumor => "Engaging Humor",
            Self::InnovativePlanning => "Innovative Planning",
            Self::LeadershipDevelopment => "Leadership Development",
            Self::MotivationalStrategies => "Motivational Strategies",
            Self::PersuasiveInfluence => "Persuasive Influence",
            Self::PresentationMastery => "Presentation Mastery",
            Self::StrategicRelationships => "Strategic Relationships",
            Self::TeamCollaboration => "Team Collaboration",
            Self::VisionaryCommunication => "Visionary Communication",
        }
    }

    /// Parses a display name, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|pathway| pathway.as_str().eq_ignore_ascii_case(value))
    }
}

/// Club roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    /// Toastmasters International membership number.
    pub toastmasters_id: String,
    pub current_path: Pathway,
    /// Highest verified level on `current_path`.
    pub current_level: u8,
    pub mentor_name: String,
    pub joined_at: NaiveDate,
    pub role: UserRole,
    pub mfa_enabled: bool,
}

impl Member {
    /// Creates an ordinary member at level 1 with a generated id.
    ///
    /// # Invariants
    /// - `role` starts as `UserRole::Member`.
    /// - `mentor_name` starts as `"None"` and `mfa_enabled` as `false`.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        toastmasters_id: impl Into<String>,
        current_path: Pathway,
        joined_at: NaiveDate,
    ) -> Self {
        Self {
            id: new_record_id(),
            name: name.into(),
            email: email.into(),
            toastmasters_id: toastmasters_id.into(),
            current_path,
            current_level: MIN_LEVEL,
            mentor_name: "None".to_string(),
            joined_at,
            role: UserRole::Member,
            mfa_enabled: false,
        }
    }

    /// Advisory check for VPE-only actions. Not a security boundary.
    pub fn is_education_vp(&self) -> bool {
        self.role == UserRole::EducationVp
    }
}

#[cfg(test)]
mod tests {
    use super::{Member, Pathway, UserRole, MIN_LEVEL};
    use chrono::NaiveDate;

    #[test]
    fn role_and_pathway_use_display_spelling_in_json() {
        let joined = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");
        let mut member = Member::new(
            "Ada",
            "ada@example.com",
            "7654321",
            Pathway::EngagingHumor,
            joined,
        );
        member.role = UserRole::EducationVp;

        let json = serde_json::to_value(&member).expect("member should serialize");
        assert_eq!(json["role"], "VPE");
        assert_eq!(json["currentPath"], "Engaging Humor");
        assert_eq!(json["toastmastersId"], "7654321");
        assert_eq!(json["joinedAt"], "2024-03-01");
        assert_eq!(json["currentLevel"], MIN_LEVEL);
    }

    #[test]
    fn pathway_parse_is_case_insensitive() {
        assert_eq!(
            Pathway::parse(" presentation mastery "),
            Some(Pathway::PresentationMastery)
        );
        assert_eq!(Pathway::parse("Basket Weaving"), None);
    }

    #[test]
    fn new_member_is_not_education_vp() {
        let joined = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");
        let member = Member::new("Bo", "bo@example.com", "1", Pathway::TeamCollaboration, joined);
        assert!(!member.is_education_vp());
        assert_eq!(member.mentor_name, "None");
    }
}
