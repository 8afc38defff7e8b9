use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-user, per-leave-type, per-year allotment with used/remaining tracking.
/// Invariant: remaining_days == total_days - used_days, and remaining_days >= 0.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaveBalance {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub leave_type_id: Uuid,
    pub year: i32,
    pub total_days: i32,
    pub used_days: i32,
    pub remaining_days: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeaveBalance {
    pub fn is_consistent(&self) -> bool {
        self.remaining_days == self.total_days - self.used_days && self.remaining_days >= 0
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceInitInput {
    pub year: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceInitSummary {
    pub year: i32,
    pub created: u64,
    pub skipped: u64,
}

/// Balance row joined with user and leave-type names, for the report export.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaveBalanceReportRow {
    pub employee_name: String,
    pub email: String,
    pub leave_type: String,
    pub total_days: i32,
    pub used_days: i32,
    pub remaining_days: i32,
}

impl LeaveBalanceReportRow {
    pub fn usage_percent(&self) -> f64 {
        if self.total_days == 0 {
            0.0
        } else {
            (self.used_days as f64 / self.total_days as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance(total: i32, used: i32, remaining: i32) -> LeaveBalance {
        LeaveBalance {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            leave_type_id: Uuid::new_v4(),
            year: 2024,
            total_days: total,
            used_days: used,
            remaining_days: remaining,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn consistency_checks_both_arithmetic_and_sign() {
        assert!(balance(20, 5, 15).is_consistent());
        assert!(!balance(20, 5, 14).is_consistent());
        assert!(!balance(20, 25, -5).is_consistent());
    }

    #[test]
    fn usage_percent_handles_zero_allotment() {
        let row = LeaveBalanceReportRow {
            employee_name: "A".into(),
            email: "a@example.com".into(),
            leave_type: "Annual".into(),
            total_days: 0,
            used_days: 0,
            remaining_days: 0,
        };
        assert_eq!(row.usage_percent(), 0.0);

        let row = LeaveBalanceReportRow {
            total_days: 20,
            used_days: 5,
            remaining_days: 15,
            ..row
        };
        assert!((row.usage_percent() - 25.0).abs() < f64::EPSILON);
    }
}
