use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{
    Employee, EmployeeInput, EmployeeStatus, EmployeeUpdateInput, EmployeeWithUser,
};

const EMPLOYEE_COLUMNS: &str = r#"
    id,
    organization_id,
    user_id,
    employee_code,
    department_id,
    designation,
    manager_id,
    basic_salary,
    allowances,
    hire_date,
    status,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, organization_id: Uuid, input: EmployeeInput) -> Result<Employee> {
        let now = Utc::now();

        let employee = sqlx::query_as::<_, Employee>(&format!(
            r#"
            INSERT INTO
                employees (
                    id,
                    organization_id,
                    user_id,
                    employee_code,
                    department_id,
                    designation,
                    manager_id,
                    basic_salary,
                    allowances,
                    hire_date,
                    status,
                    created_at,
                    updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, 0), $10, $11, $12, $13)
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(organization_id)
        .bind(input.user_id)
        .bind(&input.employee_code)
        .bind(input.department_id)
        .bind(&input.designation)
        .bind(input.manager_id)
        .bind(&input.basic_salary)
        .bind(input.allowances.as_ref())
        .bind(input.hire_date)
        .bind(input.status.unwrap_or(EmployeeStatus::Probation))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(employee)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// List employees joined with their user rows, with optional department
    /// and status filters, paginated.
    pub async fn list(
        &self,
        organization_id: Uuid,
        department_id: Option<Uuid>,
        status: Option<EmployeeStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<EmployeeWithUser>, i64)> {
        let mut conditions = vec!["e.organization_id = $1".to_string()];
        let mut param_index = 2;

        if department_id.is_some() {
            conditions.push(format!("e.department_id = ${param_index}"));
            param_index += 1;
        }
        if status.is_some() {
            conditions.push(format!("e.status = ${param_index}"));
            param_index += 1;
        }

        let where_clause = conditions.join(" AND ");
        let list_query = format!(
            r#"
            SELECT
                e.id,
                e.organization_id,
                e.user_id,
                e.employee_code,
                e.department_id,
                e.designation,
                e.manager_id,
                e.basic_salary,
                e.allowances,
                e.hire_date,
                e.status,
                u.name,
                u.email
            FROM
                employees e
                JOIN users u ON u.id = e.user_id
            WHERE
                {where_clause}
            ORDER BY
                e.employee_code
            LIMIT ${param_index} OFFSET ${}
            "#,
            param_index + 1
        );
        let count_query = format!(
            "SELECT COUNT(*) FROM employees e JOIN users u ON u.id = e.user_id WHERE {where_clause}"
        );

        let mut list = sqlx::query_as::<_, EmployeeWithUser>(&list_query).bind(organization_id);
        let mut count = sqlx::query_scalar::<_, i64>(&count_query).bind(organization_id);

        if let Some(d) = department_id {
            list = list.bind(d);
            count = count.bind(d);
        }
        if let Some(s) = status {
            list = list.bind(s);
            count = count.bind(s);
        }

        let employees = list.bind(limit).bind(offset).fetch_all(&self.pool).await?;
        let total = count.fetch_one(&self.pool).await?;

        Ok((employees, total))
    }

    pub async fn update(&self, id: Uuid, input: EmployeeUpdateInput) -> Result<Employee> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            r#"
            UPDATE
                employees
            SET
                department_id = COALESCE($1, department_id),
                designation = COALESCE($2, designation),
                manager_id = COALESCE($3, manager_id),
                basic_salary = COALESCE($4, basic_salary),
                allowances = COALESCE($5, allowances),
                updated_at = $6
            WHERE
                id = $7
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(input.department_id)
        .bind(input.designation.as_deref())
        .bind(input.manager_id)
        .bind(input.basic_salary.as_ref())
        .bind(input.allowances.as_ref())
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Compare-and-set status transition: the WHERE clause names the current
    /// status, so a concurrent transition loses cleanly.
    pub async fn transition_status(
        &self,
        id: Uuid,
        from: EmployeeStatus,
        to: EmployeeStatus,
    ) -> Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            r#"
            UPDATE
                employees
            SET
                status = $1,
                updated_at = $2
            WHERE
                id = $3
                AND status = $4
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(to)
        .bind(Utc::now())
        .bind(id)
        .bind(from)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }
}
