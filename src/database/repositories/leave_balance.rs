use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{BalanceInitSummary, LeaveBalance, LeaveBalanceReportRow};

const BALANCE_COLUMNS: &str = r#"
    id,
    organization_id,
    user_id,
    leave_type_id,
    year,
    total_days,
    used_days,
    remaining_days,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct LeaveBalanceRepository {
    pool: PgPool,
}

impl LeaveBalanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        organization_id: Uuid,
        user_id: Option<Uuid>,
        year: Option<i32>,
    ) -> Result<Vec<LeaveBalance>> {
        let mut conditions = vec!["organization_id = $1".to_string()];
        let mut param_index = 2;

        if user_id.is_some() {
            conditions.push(format!("user_id = ${param_index}"));
            param_index += 1;
        }
        if year.is_some() {
            conditions.push(format!("year = ${param_index}"));
        }

        let query = format!(
            "SELECT {BALANCE_COLUMNS} FROM leave_balances WHERE {} ORDER BY year DESC, user_id",
            conditions.join(" AND ")
        );

        let mut prepared = sqlx::query_as::<_, LeaveBalance>(&query).bind(organization_id);
        if let Some(u) = user_id {
            prepared = prepared.bind(u);
        }
        if let Some(y) = year {
            prepared = prepared.bind(y);
        }

        let balances = prepared.fetch_all(&self.pool).await?;

        Ok(balances)
    }

    /// Yearly initialization: one balance row per (active user, leave type)
    /// from the type's default allotment. One transaction; rows that already
    /// exist are counted as skipped, not overwritten.
    pub async fn init_year(&self, organization_id: Uuid, year: i32) -> Result<BalanceInitSummary> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let pairs: Vec<(Uuid, Uuid, i32)> = sqlx::query_as(
            r#"
            SELECT u.id, lt.id, lt.default_days
            FROM users u
            CROSS JOIN leave_types lt
            WHERE
                u.organization_id = $1
                AND u.deleted_at IS NULL
                AND lt.organization_id = $1
                AND lt.requires_balance
            "#,
        )
        .bind(organization_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut created = 0u64;
        let mut skipped = 0u64;

        for (user_id, leave_type_id, default_days) in pairs {
            let result = sqlx::query(
                r#"
                INSERT INTO
                    leave_balances (
                        id,
                        organization_id,
                        user_id,
                        leave_type_id,
                        year,
                        total_days,
                        used_days,
                        remaining_days,
                        created_at,
                        updated_at
                    )
                VALUES
                    ($1, $2, $3, $4, $5, $6, 0, $6, $7, $7)
                ON CONFLICT (user_id, leave_type_id, year) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(organization_id)
            .bind(user_id)
            .bind(leave_type_id)
            .bind(year)
            .bind(default_days)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() > 0 {
                created += 1;
            } else {
                skipped += 1;
            }
        }

        tx.commit().await?;

        Ok(BalanceInitSummary {
            year,
            created,
            skipped,
        })
    }

    /// Rows for the CSV export: balances joined with user and type names.
    pub async fn report_rows(
        &self,
        organization_id: Uuid,
        year: i32,
    ) -> Result<Vec<LeaveBalanceReportRow>> {
        let rows = sqlx::query_as::<_, LeaveBalanceReportRow>(
            r#"
            SELECT
                u.name AS employee_name,
                u.email,
                lt.name AS leave_type,
                lb.total_days,
                lb.used_days,
                lb.remaining_days
            FROM
                leave_balances lb
                JOIN users u ON u.id = lb.user_id
                JOIN leave_types lt ON lt.id = lb.leave_type_id
            WHERE
                lb.organization_id = $1
                AND lb.year = $2
            ORDER BY
                u.name, lt.name
            "#,
        )
        .bind(organization_id)
        .bind(year)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
