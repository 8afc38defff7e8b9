use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum EmployeeStatus {
        Active => "active",
        Probation => "probation",
        Terminated => "terminated",
        Resigned => "resigned",
    }
}

impl EmployeeStatus {
    /// Lifecycle: active and probation are working states and may move to any
    /// other state; terminated and resigned are terminal.
    pub fn can_transition_to(self, next: EmployeeStatus) -> bool {
        match self {
            EmployeeStatus::Active | EmployeeStatus::Probation => self != next,
            EmployeeStatus::Terminated | EmployeeStatus::Resigned => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub employee_code: String,
    pub department_id: Option<Uuid>,
    pub designation: String,
    pub manager_id: Option<Uuid>,
    pub basic_salary: BigDecimal,
    pub allowances: BigDecimal,
    pub hire_date: NaiveDate,
    pub status: EmployeeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    pub user_id: Uuid,
    pub employee_code: String,
    pub department_id: Option<Uuid>,
    pub designation: String,
    pub manager_id: Option<Uuid>,
    pub basic_salary: BigDecimal,
    pub allowances: Option<BigDecimal>,
    pub hire_date: NaiveDate,
    pub status: Option<EmployeeStatus>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdateInput {
    pub department_id: Option<Uuid>,
    pub designation: Option<String>,
    pub manager_id: Option<Uuid>,
    pub basic_salary: Option<BigDecimal>,
    pub allowances: Option<BigDecimal>,
    pub status: Option<EmployeeStatus>,
}

/// Employee row joined with its user's name and email, for listings.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeWithUser {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub employee_code: String,
    pub department_id: Option<Uuid>,
    pub designation: String,
    pub manager_id: Option<Uuid>,
    pub basic_salary: BigDecimal,
    pub allowances: BigDecimal,
    pub hire_date: NaiveDate,
    pub status: EmployeeStatus,
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses_do_not_transition() {
        assert!(!EmployeeStatus::Terminated.can_transition_to(EmployeeStatus::Active));
        assert!(!EmployeeStatus::Resigned.can_transition_to(EmployeeStatus::Probation));
    }

    #[test]
    fn working_statuses_transition_to_any_other() {
        assert!(EmployeeStatus::Probation.can_transition_to(EmployeeStatus::Active));
        assert!(EmployeeStatus::Active.can_transition_to(EmployeeStatus::Resigned));
        assert!(!EmployeeStatus::Active.can_transition_to(EmployeeStatus::Active));
    }
}
