use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum PayrollStatus {
        Draft => "draft",
        Approved => "approved",
        Processed => "processed",
        Paid => "paid",
    }
}

impl PayrollStatus {
    /// Linear progression, no skipping, no reversal.
    pub fn next(self) -> Option<PayrollStatus> {
        match self {
            PayrollStatus::Draft => Some(PayrollStatus::Approved),
            PayrollStatus::Approved => Some(PayrollStatus::Processed),
            PayrollStatus::Processed => Some(PayrollStatus::Paid),
            PayrollStatus::Paid => None,
        }
    }

    pub fn can_transition_to(self, target: PayrollStatus) -> bool {
        self.next() == Some(target)
    }

    /// The only state from which `target` is reachable in one step.
    pub fn required_predecessor(target: PayrollStatus) -> Option<PayrollStatus> {
        match target {
            PayrollStatus::Draft => None,
            PayrollStatus::Approved => Some(PayrollStatus::Draft),
            PayrollStatus::Processed => Some(PayrollStatus::Approved),
            PayrollStatus::Paid => Some(PayrollStatus::Processed),
        }
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum ComponentKind {
        Earning => "earning",
        Deduction => "deduction",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payroll {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub employee_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub basic_salary: BigDecimal,
    pub total_earnings: BigDecimal,
    pub total_deductions: BigDecimal,
    pub net_salary: BigDecimal,
    pub status: PayrollStatus,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub processed_by: Option<Uuid>,
    pub processed_at: Option<DateTime<Utc>>,
    pub paid_by: Option<Uuid>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SalaryComponent {
    pub id: Uuid,
    pub payroll_id: Uuid,
    pub name: String,
    pub kind: ComponentKind,
    pub amount: BigDecimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryComponentInput {
    pub name: String,
    pub kind: ComponentKind,
    pub amount: BigDecimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollInput {
    pub employee_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub basic_salary: BigDecimal,
    #[serde(default)]
    pub components: Vec<SalaryComponentInput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollWithComponents {
    #[serde(flatten)]
    pub payroll: Payroll,
    pub components: Vec<SalaryComponent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkTransitionInput {
    pub payroll_ids: Vec<Uuid>,
}

/// Per-item outcome tally for bulk status transitions.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkTransitionSummary {
    pub succeeded: Vec<Uuid>,
    pub failed: Vec<BulkTransitionFailure>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkTransitionFailure {
    pub payroll_id: Uuid,
    pub reason: String,
}

/// Net salary is basic plus earnings minus deductions.
pub fn compute_totals(
    basic_salary: &BigDecimal,
    components: &[SalaryComponentInput],
) -> (BigDecimal, BigDecimal, BigDecimal) {
    let mut earnings = BigDecimal::from(0);
    let mut deductions = BigDecimal::from(0);
    for component in components {
        match component.kind {
            ComponentKind::Earning => earnings += &component.amount,
            ComponentKind::Deduction => deductions += &component.amount,
        }
    }
    let net = basic_salary + &earnings - &deductions;
    (earnings, deductions, net)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progression_is_linear_with_no_skipping() {
        assert_eq!(PayrollStatus::Draft.next(), Some(PayrollStatus::Approved));
        assert_eq!(
            PayrollStatus::Approved.next(),
            Some(PayrollStatus::Processed)
        );
        assert_eq!(PayrollStatus::Processed.next(), Some(PayrollStatus::Paid));
        assert_eq!(PayrollStatus::Paid.next(), None);

        // no skipping a step
        assert!(!PayrollStatus::Draft.can_transition_to(PayrollStatus::Processed));
        assert!(!PayrollStatus::Approved.can_transition_to(PayrollStatus::Paid));
        // no reversal
        assert!(!PayrollStatus::Paid.can_transition_to(PayrollStatus::Draft));
    }

    #[test]
    fn required_predecessor_matches_progression() {
        assert_eq!(
            PayrollStatus::required_predecessor(PayrollStatus::Paid),
            Some(PayrollStatus::Processed)
        );
        assert_eq!(
            PayrollStatus::required_predecessor(PayrollStatus::Draft),
            None
        );
    }

    #[test]
    fn totals_split_earnings_and_deductions() {
        let components = vec![
            SalaryComponentInput {
                name: "House rent".into(),
                kind: ComponentKind::Earning,
                amount: BigDecimal::from(500),
            },
            SalaryComponentInput {
                name: "Transport".into(),
                kind: ComponentKind::Earning,
                amount: BigDecimal::from(100),
            },
            SalaryComponentInput {
                name: "Tax".into(),
                kind: ComponentKind::Deduction,
                amount: BigDecimal::from(250),
            },
        ];
        let (earnings, deductions, net) = compute_totals(&BigDecimal::from(3000), &components);
        assert_eq!(earnings, BigDecimal::from(600));
        assert_eq!(deductions, BigDecimal::from(250));
        assert_eq!(net, BigDecimal::from(3350));
    }

    #[test]
    fn totals_with_no_components_equal_basic() {
        let (earnings, deductions, net) = compute_totals(&BigDecimal::from(2000), &[]);
        assert_eq!(earnings, BigDecimal::from(0));
        assert_eq!(deductions, BigDecimal::from(0));
        assert_eq!(net, BigDecimal::from(2000));
    }
}
