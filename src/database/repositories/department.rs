use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Department;

/// Departments every new organization starts with.
const DEFAULT_DEPARTMENTS: &[&str] = &["Engineering", "Human Resources", "Operations"];

#[derive(Clone)]
pub struct DepartmentRepository {
    pool: PgPool,
}

impl DepartmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, organization_id: Uuid, name: &str) -> Result<Department> {
        let now = Utc::now();

        let department = sqlx::query_as::<_, Department>(
            r#"
            INSERT INTO
                departments (id, organization_id, name, created_at, updated_at)
            VALUES
                ($1, $2, $3, $4, $5)
            RETURNING
                id, organization_id, name, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(organization_id)
        .bind(name)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(department)
    }

    pub async fn seed_defaults_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        organization_id: Uuid,
    ) -> Result<()> {
        let now = Utc::now();

        for name in DEFAULT_DEPARTMENTS {
            sqlx::query(
                r#"
                INSERT INTO
                    departments (id, organization_id, name, created_at, updated_at)
                VALUES
                    ($1, $2, $3, $4, $4)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(organization_id)
            .bind(name)
            .bind(now)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Department>> {
        let department = sqlx::query_as::<_, Department>(
            "SELECT id, organization_id, name, created_at, updated_at FROM departments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(department)
    }

    pub async fn list(&self, organization_id: Uuid) -> Result<Vec<Department>> {
        let departments = sqlx::query_as::<_, Department>(
            r#"
            SELECT
                id, organization_id, name, created_at, updated_at
            FROM
                departments
            WHERE
                organization_id = $1
            ORDER BY
                name
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(departments)
    }

    pub async fn update(&self, id: Uuid, name: &str) -> Result<Department> {
        let department = sqlx::query_as::<_, Department>(
            r#"
            UPDATE
                departments
            SET
                name = $1,
                updated_at = $2
            WHERE
                id = $3
            RETURNING
                id, organization_id, name, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(department)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
