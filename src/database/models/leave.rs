use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum LeaveStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Cancelled => "cancelled",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub leave_type_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: i32,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub approved_by: Option<Uuid>,
    pub approval_note: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveApplyInput {
    pub user_id: Option<Uuid>,
    pub leave_type_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalInput {
    pub note: Option<String>,
}

/// Inclusive calendar-day count of a leave span.
pub fn total_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Two closed date ranges intersect unless one ends before the other begins.
pub fn ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && b_start <= a_end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn total_days_is_inclusive() {
        assert_eq!(total_days(d(2024, 3, 1), d(2024, 3, 1)), 1);
        assert_eq!(total_days(d(2024, 3, 1), d(2024, 3, 3)), 3);
    }

    #[test]
    fn overlapping_ranges_are_detected() {
        // [03-01, 03-05] vs [03-04, 03-08] share two days
        assert!(ranges_overlap(
            d(2024, 3, 1),
            d(2024, 3, 5),
            d(2024, 3, 4),
            d(2024, 3, 8)
        ));
        // Single shared boundary day still overlaps
        assert!(ranges_overlap(
            d(2024, 3, 1),
            d(2024, 3, 5),
            d(2024, 3, 5),
            d(2024, 3, 8)
        ));
    }

    #[test]
    fn disjoint_ranges_do_not_overlap() {
        assert!(!ranges_overlap(
            d(2024, 3, 1),
            d(2024, 3, 5),
            d(2024, 3, 6),
            d(2024, 3, 8)
        ));
    }
}
