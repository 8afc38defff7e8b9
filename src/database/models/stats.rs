use bigdecimal::BigDecimal;
use serde::Serialize;

/// Organization dashboard numbers: headcount, today's attendance, pending
/// leave, and the month's payroll total.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub active_employees: i64,
    pub present_today: i64,
    pub pending_leave_requests: i64,
    pub payroll_net_total: BigDecimal,
}
