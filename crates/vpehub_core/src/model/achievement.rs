//! Educational achievement (pathway level award) record.
//!
//! # Responsibility
//! - Define the achievement shape and the `Level N` award naming.
//!
//! # Invariants
//! - `award_type` is accepted only in the form `Level N` with
//!   `N` in `MIN_LEVEL..=MAX_LEVEL`.
//! - A level `N > 1` award requires a verified level `N - 1` award for the
//!   same member (enforced by the store at write time).

use super::member::{MemberId, Pathway, MAX_LEVEL, MIN_LEVEL};
use super::new_record_id;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static AWARD_LEVEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^level\s*(\d{1,3})$").expect("valid award level regex"));

/// Stable identifier of an achievement.
pub type AchievementId = String;

/// A submitted pathway level award, optionally verified by the VPE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: AchievementId,
    pub user_id: MemberId,
    /// Award label such as `Level 2`.
    pub award_type: String,
    pub path_name: Pathway,
    pub completion_date: NaiveDate,
    #[serde(rename = "verifiedByVPE")]
    pub verified_by_vpe: bool,
}

impl Achievement {
    /// Creates an unverified submission with a generated id.
    pub fn submitted(
        user_id: impl Into<MemberId>,
        level: u8,
        path_name: Pathway,
        completion_date: NaiveDate,
    ) -> Self {
        Self {
            id: new_record_id(),
            user_id: user_id.into(),
            award_type: award_type_for_level(level),
            path_name,
            completion_date,
            verified_by_vpe: false,
        }
    }

    /// Parsed level of `award_type`, or `None` when malformed.
    pub fn level(&self) -> Option<u8> {
        parse_award_level(&self.award_type)
    }
}

/// Formats the canonical award label for `level`.
pub fn award_type_for_level(level: u8) -> String {
    format!("Level {level}")
}

/// Extracts the pathway level from an award label.
///
/// Returns `None` for labels that are not `Level N` or whose level falls
/// outside `MIN_LEVEL..=MAX_LEVEL`.
pub fn parse_award_level(award_type: &str) -> Option<u8> {
    let captures = AWARD_LEVEL_RE.captures(award_type.trim())?;
    let level = captures.get(1)?.as_str().parse::<u8>().ok()?;
    (MIN_LEVEL..=MAX_LEVEL).contains(&level).then_some(level)
}
