use anyhow::Result;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::database::models::{LeaveType, LeaveTypeInput};

const LEAVE_TYPE_COLUMNS: &str = r#"
    id,
    organization_id,
    name,
    default_days,
    requires_approval,
    requires_balance,
    created_at,
    updated_at
"#;

/// Leave types every new organization starts with: (name, default days,
/// requires approval).
pub const DEFAULT_LEAVE_TYPES: &[(&str, i32, bool)] = &[
    ("Annual", 20, true),
    ("Sick", 10, false),
    ("Unpaid", 0, true),
];

#[derive(Clone)]
pub struct LeaveTypeRepository {
    pool: PgPool,
}

impl LeaveTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, organization_id: Uuid, input: LeaveTypeInput) -> Result<LeaveType> {
        let now = Utc::now();

        let leave_type = sqlx::query_as::<_, LeaveType>(&format!(
            r#"
            INSERT INTO
                leave_types (
                    id,
                    organization_id,
                    name,
                    default_days,
                    requires_approval,
                    requires_balance,
                    created_at,
                    updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {LEAVE_TYPE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(organization_id)
        .bind(&input.name)
        .bind(input.default_days)
        .bind(input.requires_approval.unwrap_or(true))
        .bind(input.requires_balance.unwrap_or(true))
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(leave_type)
    }

    /// Seed the default catalog for a freshly registered organization.
    pub async fn seed_defaults_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        organization_id: Uuid,
    ) -> Result<()> {
        let now = Utc::now();
        for (name, default_days, requires_approval) in DEFAULT_LEAVE_TYPES {
            sqlx::query(
                r#"
                INSERT INTO
                    leave_types (
                        id,
                        organization_id,
                        name,
                        default_days,
                        requires_approval,
                        requires_balance,
                        created_at,
                        updated_at
                    )
                VALUES
                    ($1, $2, $3, $4, $5, $6, $7, $7)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(organization_id)
            .bind(name)
            .bind(default_days)
            .bind(requires_approval)
            .bind(*default_days > 0)
            .bind(now)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<LeaveType>> {
        let leave_type = sqlx::query_as::<_, LeaveType>(&format!(
            "SELECT {LEAVE_TYPE_COLUMNS} FROM leave_types WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(leave_type)
    }

    pub async fn list(&self, organization_id: Uuid) -> Result<Vec<LeaveType>> {
        let leave_types = sqlx::query_as::<_, LeaveType>(&format!(
            "SELECT {LEAVE_TYPE_COLUMNS} FROM leave_types WHERE organization_id = $1 ORDER BY name"
        ))
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(leave_types)
    }

    pub async fn update(&self, id: Uuid, input: LeaveTypeInput) -> Result<LeaveType> {
        let leave_type = sqlx::query_as::<_, LeaveType>(&format!(
            r#"
            UPDATE
                leave_types
            SET
                name = $1,
                default_days = $2,
                requires_approval = COALESCE($3, requires_approval),
                requires_balance = COALESCE($4, requires_balance),
                updated_at = $5
            WHERE
                id = $6
            RETURNING {LEAVE_TYPE_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(input.default_days)
        .bind(input.requires_approval)
        .bind(input.requires_balance)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(leave_type)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM leave_types WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
