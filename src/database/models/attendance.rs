use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

pub const FULL_DAY_MINUTES: i32 = 480;
pub const HALF_DAY_MINUTES: i32 = 240;

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "snake_case")]
    pub enum AttendanceStatus {
        FullDay => "full_day",
        HalfDay => "half_day",
        Incomplete => "incomplete",
    }
}

impl AttendanceStatus {
    /// Status is a pure function of worked minutes.
    pub fn from_worked_minutes(worked_minutes: i32) -> Self {
        if worked_minutes >= FULL_DAY_MINUTES {
            AttendanceStatus::FullDay
        } else if worked_minutes >= HALF_DAY_MINUTES {
            AttendanceStatus::HalfDay
        } else {
            AttendanceStatus::Incomplete
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub work_date: NaiveDate,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    pub worked_minutes: i32,
    pub status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Manual entry by HR: both timestamps supplied up front.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualAttendanceInput {
    pub user_id: Uuid,
    pub work_date: NaiveDate,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
}

pub fn worked_minutes(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> i32 {
    (check_out - check_in).num_minutes().max(0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn status_thresholds_are_exact() {
        assert_eq!(
            AttendanceStatus::from_worked_minutes(0),
            AttendanceStatus::Incomplete
        );
        assert_eq!(
            AttendanceStatus::from_worked_minutes(239),
            AttendanceStatus::Incomplete
        );
        assert_eq!(
            AttendanceStatus::from_worked_minutes(240),
            AttendanceStatus::HalfDay
        );
        assert_eq!(
            AttendanceStatus::from_worked_minutes(479),
            AttendanceStatus::HalfDay
        );
        assert_eq!(
            AttendanceStatus::from_worked_minutes(480),
            AttendanceStatus::FullDay
        );
        assert_eq!(
            AttendanceStatus::from_worked_minutes(488),
            AttendanceStatus::FullDay
        );
    }

    #[test]
    fn nine_to_one_is_a_half_day() {
        let check_in = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        let check_out = Utc.with_ymd_and_hms(2024, 3, 4, 13, 0, 0).unwrap();
        let minutes = worked_minutes(check_in, check_out);
        assert_eq!(minutes, 240);
        assert_eq!(
            AttendanceStatus::from_worked_minutes(minutes),
            AttendanceStatus::HalfDay
        );
    }

    #[test]
    fn nine_to_five_oh_five_is_a_full_day() {
        let check_in = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        let check_out = Utc.with_ymd_and_hms(2024, 3, 4, 17, 5, 0).unwrap();
        let minutes = worked_minutes(check_in, check_out);
        assert_eq!(minutes, 488);
        assert_eq!(
            AttendanceStatus::from_worked_minutes(minutes),
            AttendanceStatus::FullDay
        );
    }

    #[test]
    fn reversed_timestamps_clamp_to_zero() {
        let check_in = Utc.with_ymd_and_hms(2024, 3, 4, 17, 0, 0).unwrap();
        let check_out = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        assert_eq!(worked_minutes(check_in, check_out), 0);
    }
}
