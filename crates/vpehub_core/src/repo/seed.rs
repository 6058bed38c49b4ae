//! Initial dataset written the first time each collection is read.

use crate::model::achievement::{award_type_for_level, Achievement};
use crate::model::meeting::{Meeting, MeetingStatus};
use crate::model::member::{Member, Pathway, UserRole};
use chrono::{NaiveDate, Utc};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("seed dates are valid calendar dates")
}

pub fn members() -> Vec<Member> {
    vec![
        Member {
            id: "user_1".to_string(),
            name: "Admin VPE".to_string(),
            email: "vpe@toastmasters.org".to_string(),
            toastmasters_id: "0000001".to_string(),
            current_path: Pathway::DynamicLeadership,
            current_level: 2,
            mentor_name: "None".to_string(),
            joined_at: date(2022, 1, 1),
            role: UserRole::EducationVp,
            mfa_enabled: true,
        },
        Member {
            id: "user_2".to_string(),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            toastmasters_id: "1234567".to_string(),
            current_path: Pathway::PresentationMastery,
            current_level: 1,
            mentor_name: "Admin VPE".to_string(),
            joined_at: date(2023, 6, 15),
            role: UserRole::Member,
            mfa_enabled: false,
        },
    ]
}

/// `created_at` is the seeding instant.
pub fn meetings() -> Vec<Meeting> {
    let seeded_at = Utc::now();
    vec![
        Meeting {
            id: "meet_1".to_string(),
            date: date(2024, 5, 20),
            theme: "Embracing Change".to_string(),
            toastmaster_of_the_day: "Jane Smith".to_string(),
            zoom_link: None,
            meeting_status: MeetingStatus::Scheduled,
            created_at: seeded_at,
        },
        Meeting {
            id: "meet_2".to_string(),
            date: date(2024, 5, 13),
            theme: "Public Speaking Secrets".to_string(),
            toastmaster_of_the_day: "John Doe".to_string(),
            zoom_link: None,
            meeting_status: MeetingStatus::Completed,
            created_at: seeded_at,
        },
    ]
}

pub fn achievements() -> Vec<Achievement> {
    let verified = |id: &str, user_id: &str, level: u8, path_name: Pathway, completed: NaiveDate| {
        Achievement {
            id: id.to_string(),
            user_id: user_id.to_string(),
            award_type: award_type_for_level(level),
            path_name,
            completion_date: completed,
            verified_by_vpe: true,
        }
    };

    vec![
        verified(
            "ach_1",
            "user_2",
            1,
            Pathway::PresentationMastery,
            date(2023, 12, 1),
        ),
        verified(
            "ach_2",
            "user_1",
            1,
            Pathway::DynamicLeadership,
            date(2022, 6, 1),
        ),
        verified(
            "ach_3",
            "user_1",
            2,
            Pathway::DynamicLeadership,
            date(2023, 1, 15),
        ),
    ]
}
