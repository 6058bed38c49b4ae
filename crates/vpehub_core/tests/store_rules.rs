use chrono::NaiveDate;
use vpehub_core::db::open_db_in_memory;
use vpehub_core::{
    Achievement, DomainStore, KvRepository, Meeting, MeetingRoleName, MeetingStatus, Pathway,
    RoleAssignment, RosterAction, RuleViolation, SqliteKvRepository,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn achievement(id: &str, user_id: &str, award_type: &str, verified: bool) -> Achievement {
    Achievement {
        id: id.to_string(),
        user_id: user_id.to_string(),
        award_type: award_type.to_string(),
        path_name: Pathway::PresentationMastery,
        completion_date: date(2024, 1, 1),
        verified_by_vpe: verified,
    }
}

fn role(id: &str, meeting_id: &str, user_id: &str, role_name: MeetingRoleName) -> RoleAssignment {
    RoleAssignment {
        id: id.to_string(),
        meeting_id: meeting_id.to_string(),
        user_id: user_id.to_string(),
        role_name,
        speech_title: None,
        project_manual: None,
    }
}

fn member_level<R: KvRepository>(store: &DomainStore<R>, member_id: &str) -> u8 {
    store
        .find_member(member_id)
        .unwrap()
        .expect("member should exist")
        .current_level
}

#[test]
fn level_three_is_rejected_without_verified_level_two() {
    let conn = open_db_in_memory().unwrap();
    let store = DomainStore::new(SqliteKvRepository::try_new(&conn).unwrap());

    let outcome = store
        .log_achievement(&achievement("test_ach_1", "user_2", "Level 3", false))
        .unwrap();

    assert!(!outcome.success);
    assert!(outcome.message.contains("Level 2 is completed"));
    assert_eq!(
        outcome.violation,
        Some(RuleViolation::MissingPrerequisite {
            award_type: "Level 3".to_string(),
            prerequisite: "Level 2".to_string(),
        })
    );
    assert!(store
        .list_achievements()
        .unwrap()
        .iter()
        .all(|existing| existing.id != "test_ach_1"));
}

#[test]
fn level_one_never_needs_a_prerequisite() {
    let conn = open_db_in_memory().unwrap();
    let store = DomainStore::new(SqliteKvRepository::try_new(&conn).unwrap());

    let outcome = store
        .log_achievement(&achievement("fresh", "user_without_history", "Level 1", false))
        .unwrap();
    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(outcome.message, "Achievement logged.");
}

#[test]
fn unverified_prerequisite_does_not_unlock_next_level() {
    let conn = open_db_in_memory().unwrap();
    let store = DomainStore::new(SqliteKvRepository::try_new(&conn).unwrap());

    assert!(store
        .log_achievement(&achievement("l2", "user_2", "Level 2", false))
        .unwrap()
        .success);

    let blocked = store
        .log_achievement(&achievement("l3", "user_2", "Level 3", false))
        .unwrap();
    assert!(!blocked.success);

    assert!(store.verify_achievement("l2").unwrap().success);
    let accepted = store
        .log_achievement(&achievement("l3", "user_2", "Level 3", false))
        .unwrap();
    assert!(accepted.success, "{}", accepted.message);
}

#[test]
fn prerequisite_must_belong_to_the_same_member() {
    let conn = open_db_in_memory().unwrap();
    let store = DomainStore::new(SqliteKvRepository::try_new(&conn).unwrap());

    // user_1 holds a verified Level 2 in the seed; user_2 does not.
    let outcome = store
        .log_achievement(&achievement("borrowed", "user_2", "Level 3", false))
        .unwrap();
    assert!(!outcome.success);
}

#[test]
fn rewriting_a_verified_award_cannot_promote_itself() {
    let conn = open_db_in_memory().unwrap();
    let store = DomainStore::new(SqliteKvRepository::try_new(&conn).unwrap());

    // ach_1 is user_2's only verified award (Level 1) in the seed.
    let outcome = store
        .log_achievement(&achievement("ach_1", "user_2", "Level 2", true))
        .unwrap();
    assert!(!outcome.success);
    assert_eq!(
        outcome.violation,
        Some(RuleViolation::MissingPrerequisite {
            award_type: "Level 2".to_string(),
            prerequisite: "Level 1".to_string(),
        })
    );

    let kept = store
        .list_achievements()
        .unwrap()
        .into_iter()
        .find(|existing| existing.id == "ach_1")
        .expect("seed award should remain");
    assert_eq!(kept.award_type, "Level 1");
    assert_eq!(member_level(&store, "user_2"), 1);

    // A separate Level 2 record is still accepted on top of it.
    let next = store
        .log_achievement(&achievement("ach_next", "user_2", "Level 2", true))
        .unwrap();
    assert!(next.success, "{}", next.message);
    assert_eq!(member_level(&store, "user_2"), 2);
}

#[test]
fn malformed_award_types_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let store = DomainStore::new(SqliteKvRepository::try_new(&conn).unwrap());

    for award_type in ["Level", "Distinguished Toastmaster", "Level 6"] {
        let outcome = store
            .log_achievement(&achievement("odd", "user_2", award_type, true))
            .unwrap();
        assert!(!outcome.success, "{award_type} should be rejected");
        assert_eq!(
            outcome.violation,
            Some(RuleViolation::MalformedAwardType(award_type.to_string()))
        );
    }
    assert_eq!(store.list_achievements().unwrap().len(), 3);
    assert_eq!(member_level(&store, "user_2"), 1);
}

#[test]
fn second_role_in_same_meeting_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let store = DomainStore::new(SqliteKvRepository::try_new(&conn).unwrap());

    let first = store
        .assign_role(&role("role_a", "meet_1", "user_2", MeetingRoleName::Speaker))
        .unwrap();
    assert!(first.success);
    assert_eq!(first.message, "Role saved successfully.");

    let second = store
        .assign_role(&role("role_b", "meet_1", "user_2", MeetingRoleName::AhCounter))
        .unwrap();
    assert!(!second.success);
    assert!(second.message.contains("already signed up"));
    assert_eq!(store.roles_for_meeting("meet_1").unwrap().len(), 1);
}

#[test]
fn editing_own_assignment_is_not_a_duplicate() {
    let conn = open_db_in_memory().unwrap();
    let store = DomainStore::new(SqliteKvRepository::try_new(&conn).unwrap());

    store
        .assign_role(&role("role_a", "meet_1", "user_2", MeetingRoleName::Speaker))
        .unwrap();
    let mut edited = role("role_a", "meet_1", "user_2", MeetingRoleName::Speaker);
    edited.speech_title = Some("Ice Breaker".to_string());
    edited.project_manual = Some("Presentation Mastery L1".to_string());

    let outcome = store.assign_role(&edited).unwrap();
    assert!(outcome.success);
    let roles = store.list_role_assignments().unwrap();
    assert_eq!(roles, vec![edited]);
}

#[test]
fn different_members_can_share_a_meeting() {
    let conn = open_db_in_memory().unwrap();
    let store = DomainStore::new(SqliteKvRepository::try_new(&conn).unwrap());

    assert!(store
        .assign_role(&role("r1", "meet_1", "user_1", MeetingRoleName::Timer))
        .unwrap()
        .success);
    assert!(store
        .assign_role(&role("r2", "meet_1", "user_2", MeetingRoleName::Timer))
        .unwrap()
        .success);
    assert_eq!(store.roles_for_meeting("meet_1").unwrap().len(), 2);
}

#[test]
fn completed_meeting_rejects_new_assignments() {
    let conn = open_db_in_memory().unwrap();
    let store = DomainStore::new(SqliteKvRepository::try_new(&conn).unwrap());

    let outcome = store
        .assign_role(&role("role_x", "meet_2", "user_2", MeetingRoleName::Timer))
        .unwrap();
    assert!(!outcome.success);
    assert!(outcome.message.contains("completed meeting"));
    assert_eq!(
        outcome.violation,
        Some(RuleViolation::CompletedMeeting {
            meeting_id: "meet_2".to_string(),
            action: RosterAction::Assign,
        })
    );
}

#[test]
fn completing_a_meeting_freezes_existing_roles() {
    let conn = open_db_in_memory().unwrap();
    let store = DomainStore::new(SqliteKvRepository::try_new(&conn).unwrap());

    store
        .assign_role(&role("role_a", "meet_1", "user_2", MeetingRoleName::Speaker))
        .unwrap();
    assert!(store
        .set_meeting_status("meet_1", MeetingStatus::Completed)
        .unwrap()
        .success);

    let withdraw = store.withdraw_role("role_a").unwrap();
    assert!(!withdraw.success);
    assert!(withdraw.message.contains("completed meeting"));

    let mut moved = role("role_a", "meet_1", "user_2", MeetingRoleName::Speaker);
    moved.meeting_id = "meet_open".to_string();
    let mut open_meeting = Meeting::schedule(date(2024, 7, 1), "Open", "Jane Smith");
    open_meeting.id = "meet_open".to_string();
    store.upsert_meeting(&open_meeting).unwrap();

    let relocate = store.assign_role(&moved).unwrap();
    assert!(!relocate.success);
    assert_eq!(
        relocate.violation,
        Some(RuleViolation::CompletedMeeting {
            meeting_id: "meet_1".to_string(),
            action: RosterAction::Assign,
        })
    );
    assert_eq!(store.roles_for_meeting("meet_1").unwrap().len(), 1);
}

#[test]
fn assignment_to_unknown_meeting_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let store = DomainStore::new(SqliteKvRepository::try_new(&conn).unwrap());

    let outcome = store
        .assign_role(&role("ghost", "meet_404", "user_2", MeetingRoleName::Timer))
        .unwrap();
    assert!(!outcome.success);
    assert_eq!(
        outcome.violation,
        Some(RuleViolation::UnknownMeeting("meet_404".to_string()))
    );
    assert!(store.list_role_assignments().unwrap().is_empty());
}

#[test]
fn withdraw_unknown_role_fails_and_known_role_is_removed() {
    let conn = open_db_in_memory().unwrap();
    let store = DomainStore::new(SqliteKvRepository::try_new(&conn).unwrap());

    let missing = store.withdraw_role("nope").unwrap();
    assert!(!missing.success);
    assert_eq!(missing.message, "Role not found.");

    store
        .assign_role(&role("role_a", "meet_1", "user_2", MeetingRoleName::Evaluator))
        .unwrap();
    let withdrawn = store.withdraw_role("role_a").unwrap();
    assert!(withdrawn.success);
    assert!(store.list_role_assignments().unwrap().is_empty());

    let again = store
        .assign_role(&role("role_b", "meet_1", "user_2", MeetingRoleName::Grammarian))
        .unwrap();
    assert!(again.success, "withdrawal should free the member's slot");
}

#[test]
fn verification_raises_member_level_exactly_once() {
    let conn = open_db_in_memory().unwrap();
    let store = DomainStore::new(SqliteKvRepository::try_new(&conn).unwrap());
    assert_eq!(member_level(&store, "user_2"), 1);

    assert!(store
        .log_achievement(&achievement("l2", "user_2", "Level 2", false))
        .unwrap()
        .success);
    assert_eq!(member_level(&store, "user_2"), 1, "unverified must not propagate");

    let verified = store.verify_achievement("l2").unwrap();
    assert!(verified.success);
    assert_eq!(verified.message, "Achievement verified.");
    assert_eq!(member_level(&store, "user_2"), 2);

    assert!(store.verify_achievement("l2").unwrap().success);
    assert_eq!(member_level(&store, "user_2"), 2);
}

#[test]
fn verifying_lower_level_never_lowers_member_level() {
    let conn = open_db_in_memory().unwrap();
    let store = DomainStore::new(SqliteKvRepository::try_new(&conn).unwrap());
    assert_eq!(member_level(&store, "user_1"), 2);

    let outcome = store
        .log_achievement(&achievement("again_l1", "user_1", "Level 1", true))
        .unwrap();
    assert!(outcome.success);
    assert_eq!(member_level(&store, "user_1"), 2);
}

#[test]
fn verified_achievement_for_unknown_member_is_saved_without_propagation() {
    let conn = open_db_in_memory().unwrap();
    let store = DomainStore::new(SqliteKvRepository::try_new(&conn).unwrap());

    let outcome = store
        .log_achievement(&achievement("orphan", "user_gone", "Level 1", true))
        .unwrap();
    assert!(outcome.success);
    assert!(store
        .list_achievements()
        .unwrap()
        .iter()
        .any(|existing| existing.id == "orphan"));
}

#[test]
fn verify_unknown_achievement_fails() {
    let conn = open_db_in_memory().unwrap();
    let store = DomainStore::new(SqliteKvRepository::try_new(&conn).unwrap());

    let outcome = store.verify_achievement("missing").unwrap();
    assert!(!outcome.success);
    assert_eq!(
        outcome.violation,
        Some(RuleViolation::AchievementNotFound("missing".to_string()))
    );
}

#[test]
fn meeting_status_accepts_any_transition_and_rejects_unknown_meeting() {
    let conn = open_db_in_memory().unwrap();
    let store = DomainStore::new(SqliteKvRepository::try_new(&conn).unwrap());

    for status in [
        MeetingStatus::InProgress,
        MeetingStatus::Scheduled,
        MeetingStatus::Cancelled,
    ] {
        let outcome = store.set_meeting_status("meet_2", status).unwrap();
        assert!(outcome.success);
        let meeting = store
            .list_meetings()
            .unwrap()
            .into_iter()
            .find(|meeting| meeting.id == "meet_2")
            .unwrap();
        assert_eq!(meeting.meeting_status, status);
    }

    let missing = store
        .set_meeting_status("meet_404", MeetingStatus::Completed)
        .unwrap();
    assert!(!missing.success);
}
