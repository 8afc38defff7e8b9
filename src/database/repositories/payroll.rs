use anyhow::Result;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::database::models::{
    Payroll, PayrollInput, PayrollStatus, SalaryComponent, SalaryComponentInput, compute_totals,
};

const PAYROLL_COLUMNS: &str = r#"
    id,
    organization_id,
    employee_id,
    month,
    year,
    basic_salary,
    total_earnings,
    total_deductions,
    net_salary,
    status,
    approved_by,
    approved_at,
    processed_by,
    processed_at,
    paid_by,
    paid_at,
    created_at,
    updated_at
"#;

const COMPONENT_COLUMNS: &str = "id, payroll_id, name, kind, amount";

#[derive(Clone)]
pub struct PayrollRepository {
    pool: PgPool,
}

impl PayrollRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a payroll with its line items in one transaction; totals are
    /// computed server-side from the components.
    pub async fn create_with_components(
        &self,
        organization_id: Uuid,
        input: PayrollInput,
    ) -> Result<Payroll> {
        let (earnings, deductions, net) = compute_totals(&input.basic_salary, &input.components);
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let payroll = sqlx::query_as::<_, Payroll>(&format!(
            r#"
            INSERT INTO
                payrolls (
                    id,
                    organization_id,
                    employee_id,
                    month,
                    year,
                    basic_salary,
                    total_earnings,
                    total_deductions,
                    net_salary,
                    status,
                    created_at,
                    updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING {PAYROLL_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(organization_id)
        .bind(input.employee_id)
        .bind(input.month)
        .bind(input.year)
        .bind(&input.basic_salary)
        .bind(&earnings)
        .bind(&deductions)
        .bind(&net)
        .bind(PayrollStatus::Draft)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        for component in &input.components {
            Self::insert_component(&mut tx, payroll.id, component).await?;
        }

        tx.commit().await?;
        Ok(payroll)
    }

    async fn insert_component(
        tx: &mut Transaction<'_, Postgres>,
        payroll_id: Uuid,
        input: &SalaryComponentInput,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO
                salary_components (id, payroll_id, name, kind, amount)
            VALUES
                ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(payroll_id)
        .bind(&input.name)
        .bind(input.kind)
        .bind(&input.amount)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Payroll>> {
        let payroll = sqlx::query_as::<_, Payroll>(&format!(
            "SELECT {PAYROLL_COLUMNS} FROM payrolls WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payroll)
    }

    pub async fn components(&self, payroll_id: Uuid) -> Result<Vec<SalaryComponent>> {
        let components = sqlx::query_as::<_, SalaryComponent>(&format!(
            "SELECT {COMPONENT_COLUMNS} FROM salary_components WHERE payroll_id = $1 ORDER BY name"
        ))
        .bind(payroll_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(components)
    }

    pub async fn list(
        &self,
        organization_id: Uuid,
        employee_id: Option<Uuid>,
        month: Option<i32>,
        year: Option<i32>,
        status: Option<PayrollStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Payroll>, i64)> {
        let mut conditions = vec!["organization_id = $1".to_string()];
        let mut param_index = 2;

        if employee_id.is_some() {
            conditions.push(format!("employee_id = ${param_index}"));
            param_index += 1;
        }
        if month.is_some() {
            conditions.push(format!("month = ${param_index}"));
            param_index += 1;
        }
        if year.is_some() {
            conditions.push(format!("year = ${param_index}"));
            param_index += 1;
        }
        if status.is_some() {
            conditions.push(format!("status = ${param_index}"));
            param_index += 1;
        }

        let where_clause = conditions.join(" AND ");
        let list_query = format!(
            "SELECT {PAYROLL_COLUMNS} FROM payrolls WHERE {where_clause} \
             ORDER BY year DESC, month DESC LIMIT ${param_index} OFFSET ${}",
            param_index + 1
        );
        let count_query = format!("SELECT COUNT(*) FROM payrolls WHERE {where_clause}");

        let mut list = sqlx::query_as::<_, Payroll>(&list_query).bind(organization_id);
        let mut count = sqlx::query_scalar::<_, i64>(&count_query).bind(organization_id);

        if let Some(e) = employee_id {
            list = list.bind(e);
            count = count.bind(e);
        }
        if let Some(m) = month {
            list = list.bind(m);
            count = count.bind(m);
        }
        if let Some(y) = year {
            list = list.bind(y);
            count = count.bind(y);
        }
        if let Some(s) = status {
            list = list.bind(s);
            count = count.bind(s);
        }

        let payrolls = list.bind(limit).bind(offset).fetch_all(&self.pool).await?;
        let total = count.fetch_one(&self.pool).await?;

        Ok((payrolls, total))
    }

    /// Compare-and-set transition: the WHERE clause names the required
    /// predecessor, so out-of-order or concurrent calls affect zero rows and
    /// the record is left untouched. The matching actor/timestamp pair is
    /// stamped per target state.
    pub async fn transition(
        &self,
        id: Uuid,
        target: PayrollStatus,
        actor: Uuid,
    ) -> Result<Option<Payroll>> {
        let Some(predecessor) = PayrollStatus::required_predecessor(target) else {
            return Ok(None);
        };

        let (actor_column, time_column) = match target {
            PayrollStatus::Approved => ("approved_by", "approved_at"),
            PayrollStatus::Processed => ("processed_by", "processed_at"),
            PayrollStatus::Paid => ("paid_by", "paid_at"),
            PayrollStatus::Draft => return Ok(None),
        };

        let now = Utc::now();
        let payroll = sqlx::query_as::<_, Payroll>(&format!(
            r#"
            UPDATE
                payrolls
            SET
                status = $1,
                {actor_column} = $2,
                {time_column} = $3,
                updated_at = $3
            WHERE
                id = $4
                AND status = $5
            RETURNING {PAYROLL_COLUMNS}
            "#
        ))
        .bind(target)
        .bind(actor)
        .bind(now)
        .bind(id)
        .bind(predecessor)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payroll)
    }

    /// Delete a payroll that has not reached `paid`; components cascade.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM payrolls WHERE id = $1 AND status <> $2")
            .bind(id)
            .bind(PayrollStatus::Paid)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
