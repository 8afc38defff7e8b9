use anyhow::Result;
use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::DashboardSummary;

#[derive(Clone)]
pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn dashboard_summary(&self, organization_id: Uuid) -> Result<DashboardSummary> {
        let today: NaiveDate = Utc::now().date_naive();

        let active_employees: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM employees WHERE organization_id = $1 AND status IN ('active', 'probation')",
        )
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;

        let present_today: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM attendance
            WHERE organization_id = $1 AND work_date = $2 AND check_in IS NOT NULL
            "#,
        )
        .bind(organization_id)
        .bind(today)
        .fetch_one(&self.pool)
        .await?;

        let pending_leave_requests: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM leave_requests WHERE organization_id = $1 AND status = 'pending'",
        )
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;

        let payroll_net_total: Option<BigDecimal> = sqlx::query_scalar(
            "SELECT SUM(net_salary) FROM payrolls WHERE organization_id = $1 AND month = $2 AND year = $3",
        )
        .bind(organization_id)
        .bind(today.month() as i32)
        .bind(today.year())
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardSummary {
            active_employees,
            present_today,
            pending_leave_requests,
            payroll_net_total: payroll_net_total.unwrap_or_else(|| BigDecimal::from(0)),
        })
    }
}
