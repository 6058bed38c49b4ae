//! Domain store: the single gateway for club state.
//!
//! # Responsibility
//! - Own every read and write of members, meetings, role assignments,
//!   achievements and activity logs.
//! - Enforce the cross-record rules before accepting writes:
//!   sequential award levels, one role per member per meeting, and a frozen
//!   role roster once a meeting is completed.
//!
//! # Invariants
//! - Each mutating call loads the collections it touches, computes the new
//!   state and writes it back inside one repository transaction.
//! - A member's `current_level` only moves up, and only through a verified
//!   achievement.
//! - The store never writes activity logs on its own; callers append them.
//!
//! # Concurrency
//! - Calls are synchronous and run to completion on the caller's thread.
//! - Writers sharing one database file are serialized by the repository
//!   transaction. Callers holding stale snapshots must re-read after writing.

use crate::model::achievement::{award_type_for_level, Achievement};
use crate::model::activity_log::ActivityLog;
use crate::model::meeting::{Meeting, MeetingStatus};
use crate::model::member::{Member, MIN_LEVEL};
use crate::model::role_assignment::RoleAssignment;
use crate::repo::collection::{load_records, save_records, upsert_record};
use crate::repo::kv_repo::{KvRepository, RepoResult};
use crate::service::outcome::{RosterAction, RuleViolation, WriteOutcome};
use log::{debug, info};

/// Summary counts for the club dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClubStats {
    pub members: usize,
    pub meetings: usize,
    pub verified_achievements: usize,
}

/// Rules-enforcing store over a key-value repository.
///
/// Construct one per session and pass it by reference; there is no global
/// instance.
pub struct DomainStore<R: KvRepository> {
    repo: R,
}

impl<R: KvRepository> DomainStore<R> {
    /// Creates a store over the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists members in storage order.
    pub fn list_members(&self) -> RepoResult<Vec<Member>> {
        load_records(&self.repo)
    }

    /// Looks up one member by id.
    pub fn find_member(&self, id: &str) -> RepoResult<Option<Member>> {
        Ok(self
            .list_members()?
            .into_iter()
            .find(|member| member.id == id))
    }

    /// Inserts a new member or replaces the one with the same id in place.
    ///
    /// No validation is applied; duplicate emails or membership numbers are
    /// accepted.
    pub fn upsert_member(&self, member: &Member) -> RepoResult<()> {
        self.repo.atomically(|repo| {
            let mut members: Vec<Member> = load_records(repo)?;
            let replaced = upsert_record(&mut members, member.clone());
            save_records(repo, &members)?;
            debug!(
                "event=member_upsert module=store status=ok replaced={} member_id={}",
                replaced, member.id
            );
            Ok(())
        })
    }

    /// Hard-deletes a member. Unknown ids are a no-op.
    ///
    /// Role assignments, achievements and logs referencing the member are
    /// left in place.
    pub fn delete_member(&self, id: &str) -> RepoResult<()> {
        self.repo.atomically(|repo| {
            let mut members: Vec<Member> = load_records(repo)?;
            let before = members.len();
            members.retain(|member| member.id != id);
            if members.len() == before {
                debug!("event=member_delete module=store status=noop member_id={id}");
                return Ok(());
            }
            save_records(repo, &members)?;
            info!("event=member_delete module=store status=ok member_id={id}");
            Ok(())
        })
    }

    /// Lists meetings in storage order.
    pub fn list_meetings(&self) -> RepoResult<Vec<Meeting>> {
        load_records(&self.repo)
    }

    /// Inserts a new meeting or replaces the one with the same id in place.
    pub fn upsert_meeting(&self, meeting: &Meeting) -> RepoResult<()> {
        self.repo.atomically(|repo| {
            let mut meetings: Vec<Meeting> = load_records(repo)?;
            let replaced = upsert_record(&mut meetings, meeting.clone());
            save_records(repo, &meetings)?;
            debug!(
                "event=meeting_upsert module=store status=ok replaced={} meeting_id={}",
                replaced, meeting.id
            );
            Ok(())
        })
    }

    /// Moves a meeting to `status`. Any transition is accepted.
    pub fn set_meeting_status(
        &self,
        meeting_id: &str,
        status: MeetingStatus,
    ) -> RepoResult<WriteOutcome> {
        self.repo.atomically(|repo| {
            let mut meetings: Vec<Meeting> = load_records(repo)?;
            let Some(meeting) = meetings.iter_mut().find(|meeting| meeting.id == meeting_id)
            else {
                return Ok(reject(
                    "meeting_status",
                    RuleViolation::UnknownMeeting(meeting_id.to_string()),
                ));
            };
            let previous = meeting.meeting_status;
            meeting.meeting_status = status;
            save_records(repo, &meetings)?;
            info!(
                "event=meeting_status module=store status=ok meeting_id={} from={:?} to={:?}",
                meeting_id, previous, status
            );
            Ok(WriteOutcome::accepted(format!(
                "Meeting status updated to {}.",
                status.as_str()
            )))
        })
    }

    /// Lists role assignments in storage order.
    pub fn list_role_assignments(&self) -> RepoResult<Vec<RoleAssignment>> {
        load_records(&self.repo)
    }

    /// Lists the role assignments of one meeting in storage order.
    pub fn roles_for_meeting(&self, meeting_id: &str) -> RepoResult<Vec<RoleAssignment>> {
        let mut roles = self.list_role_assignments()?;
        roles.retain(|role| role.meeting_id == meeting_id);
        Ok(roles)
    }

    /// Signs a member up for a meeting role, or edits an existing sign-up.
    ///
    /// # Contract
    /// - Rejects unknown and completed meetings, checked in that order.
    /// - Rejects edits of a sign-up that currently belongs to a completed
    ///   meeting.
    /// - Rejects a second role for the same member in the same meeting.
    /// - Otherwise replaces by id or appends.
    pub fn assign_role(&self, assignment: &RoleAssignment) -> RepoResult<WriteOutcome> {
        self.repo
            .atomically(|repo| assign_role_in(repo, assignment))
    }

    /// Withdraws a role sign-up by id.
    ///
    /// Unlike the upsert paths, an unknown id is an explicit failure.
    pub fn withdraw_role(&self, id: &str) -> RepoResult<WriteOutcome> {
        self.repo.atomically(|repo| {
            let mut roles: Vec<RoleAssignment> = load_records(repo)?;
            let Some(role) = roles.iter().find(|role| role.id == id) else {
                return Ok(reject(
                    "role_withdraw",
                    RuleViolation::RoleNotFound(id.to_string()),
                ));
            };

            let meetings: Vec<Meeting> = load_records(repo)?;
            if meetings
                .iter()
                .any(|meeting| meeting.id == role.meeting_id && meeting.is_completed())
            {
                return Ok(reject(
                    "role_withdraw",
                    RuleViolation::CompletedMeeting {
                        meeting_id: role.meeting_id.clone(),
                        action: RosterAction::Withdraw,
                    },
                ));
            }

            roles.retain(|role| role.id != id);
            save_records(repo, &roles)?;
            info!("event=role_withdraw module=store status=ok role_id={id}");
            Ok(WriteOutcome::accepted("Role deleted."))
        })
    }

    /// Lists achievements in storage order.
    pub fn list_achievements(&self) -> RepoResult<Vec<Achievement>> {
        load_records(&self.repo)
    }

    /// Achievements a viewer may see: all of them for an education-VP,
    /// otherwise only the viewer's own.
    pub fn achievements_visible_to(&self, viewer: &Member) -> RepoResult<Vec<Achievement>> {
        let mut achievements = self.list_achievements()?;
        if !viewer.is_education_vp() {
            achievements.retain(|achievement| achievement.user_id == viewer.id);
        }
        Ok(achievements)
    }

    /// Records or updates an achievement, enforcing level sequencing.
    ///
    /// # Contract
    /// - Rejects award labels that are not `Level 1` through `Level 5`.
    /// - Level `N > 1` requires a verified level `N - 1` for the same member,
    ///   held by a different record than the one being written.
    /// - Otherwise replaces by id or appends.
    /// - A verified achievement above the member's `current_level` raises it,
    ///   in the same transaction as the achievement write.
    pub fn log_achievement(&self, achievement: &Achievement) -> RepoResult<WriteOutcome> {
        self.repo
            .atomically(|repo| log_achievement_in(repo, achievement, "Achievement logged."))
    }

    /// Marks an existing achievement verified and applies level propagation.
    pub fn verify_achievement(&self, id: &str) -> RepoResult<WriteOutcome> {
        self.repo.atomically(|repo| {
            let achievements: Vec<Achievement> = load_records(repo)?;
            let Some(existing) = achievements.iter().find(|achievement| achievement.id == id)
            else {
                return Ok(reject(
                    "achievement_verify",
                    RuleViolation::AchievementNotFound(id.to_string()),
                ));
            };
            let verified = Achievement {
                verified_by_vpe: true,
                ..existing.clone()
            };
            log_achievement_in(repo, &verified, "Achievement verified.")
        })
    }

    /// Lists activity log entries in append order.
    pub fn list_logs(&self) -> RepoResult<Vec<ActivityLog>> {
        load_records(&self.repo)
    }

    /// Appends one audit trail entry with a fresh id and timestamp.
    pub fn append_log(
        &self,
        user_id: &str,
        user_name: &str,
        action: &str,
    ) -> RepoResult<ActivityLog> {
        let entry = ActivityLog::record(user_id, user_name, action);
        self.repo.atomically(|repo| {
            let mut logs: Vec<ActivityLog> = load_records(repo)?;
            // Append only: ids are never looked up, so no upsert here.
            logs.push(entry.clone());
            save_records(repo, &logs)?;
            Ok(())
        })?;
        debug!(
            "event=log_append module=store status=ok log_id={} user_id={}",
            entry.id, entry.user_id
        );
        Ok(entry)
    }

    /// Dashboard counts: members, meetings and verified achievements.
    pub fn club_stats(&self) -> RepoResult<ClubStats> {
        Ok(ClubStats {
            members: self.list_members()?.len(),
            meetings: self.list_meetings()?.len(),
            verified_achievements: self
                .list_achievements()?
                .iter()
                .filter(|achievement| achievement.verified_by_vpe)
                .count(),
        })
    }
}

fn assign_role_in<R: KvRepository>(
    repo: &R,
    assignment: &RoleAssignment,
) -> RepoResult<WriteOutcome> {
    let meetings: Vec<Meeting> = load_records(repo)?;
    let is_completed = |meeting_id: &str| {
        meetings
            .iter()
            .any(|meeting| meeting.id == meeting_id && meeting.is_completed())
    };

    if !meetings
        .iter()
        .any(|meeting| meeting.id == assignment.meeting_id)
    {
        return Ok(reject(
            "role_assign",
            RuleViolation::UnknownMeeting(assignment.meeting_id.clone()),
        ));
    }
    if is_completed(assignment.meeting_id.as_str()) {
        return Ok(reject(
            "role_assign",
            RuleViolation::CompletedMeeting {
                meeting_id: assignment.meeting_id.clone(),
                action: RosterAction::Assign,
            },
        ));
    }

    let mut roles: Vec<RoleAssignment> = load_records(repo)?;
    if let Some(current) = roles.iter().find(|role| role.id == assignment.id) {
        // Moving a sign-up out of a completed meeting also edits that roster.
        if is_completed(current.meeting_id.as_str()) {
            return Ok(reject(
                "role_assign",
                RuleViolation::CompletedMeeting {
                    meeting_id: current.meeting_id.clone(),
                    action: RosterAction::Assign,
                },
            ));
        }
    }
    if roles.iter().any(|role| {
        role.meeting_id == assignment.meeting_id
            && role.user_id == assignment.user_id
            && role.id != assignment.id
    }) {
        return Ok(reject(
            "role_assign",
            RuleViolation::AlreadyAssigned {
                meeting_id: assignment.meeting_id.clone(),
                user_id: assignment.user_id.clone(),
            },
        ));
    }

    let replaced = upsert_record(&mut roles, assignment.clone());
    save_records(repo, &roles)?;
    info!(
        "event=role_assign module=store status=ok replaced={} role_id={} meeting_id={}",
        replaced, assignment.id, assignment.meeting_id
    );
    Ok(WriteOutcome::accepted("Role saved successfully."))
}

fn log_achievement_in<R: KvRepository>(
    repo: &R,
    achievement: &Achievement,
    success_message: &str,
) -> RepoResult<WriteOutcome> {
    let Some(level) = achievement.level() else {
        return Ok(reject(
            "achievement_log",
            RuleViolation::MalformedAwardType(achievement.award_type.clone()),
        ));
    };

    let mut achievements: Vec<Achievement> = load_records(repo)?;
    if level > MIN_LEVEL {
        let prerequisite_level = level - 1;
        // The record being rewritten cannot vouch for its own next level.
        let has_prerequisite = achievements.iter().any(|existing| {
            existing.id != achievement.id
                && existing.user_id == achievement.user_id
                && existing.verified_by_vpe
                && existing.level() == Some(prerequisite_level)
        });
        if !has_prerequisite {
            return Ok(reject(
                "achievement_log",
                RuleViolation::MissingPrerequisite {
                    award_type: achievement.award_type.clone(),
                    prerequisite: award_type_for_level(prerequisite_level),
                },
            ));
        }
    }

    let replaced = upsert_record(&mut achievements, achievement.clone());
    save_records(repo, &achievements)?;
    info!(
        "event=achievement_log module=store status=ok replaced={} achievement_id={} level={} verified={}",
        replaced, achievement.id, level, achievement.verified_by_vpe
    );

    if achievement.verified_by_vpe {
        raise_member_level(repo, &achievement.user_id, level)?;
    }

    Ok(WriteOutcome::accepted(success_message))
}

/// Raises `current_level` to `level` when higher; never lowers it.
fn raise_member_level<R: KvRepository>(repo: &R, member_id: &str, level: u8) -> RepoResult<()> {
    let mut members: Vec<Member> = load_records(repo)?;
    let Some(member) = members.iter_mut().find(|member| member.id == member_id) else {
        debug!(
            "event=level_propagate module=store status=skipped reason=unknown_member member_id={}",
            member_id
        );
        return Ok(());
    };
    if level <= member.current_level {
        return Ok(());
    }

    let previous = member.current_level;
    member.current_level = level;
    save_records(repo, &members)?;
    info!(
        "event=level_propagate module=store status=ok member_id={} from={} to={}",
        member_id, previous, level
    );
    Ok(())
}

fn reject(event: &'static str, violation: RuleViolation) -> WriteOutcome {
    info!(
        "event={} module=store status=rejected reason={}",
        event,
        violation.code()
    );
    WriteOutcome::rejected(violation)
}
