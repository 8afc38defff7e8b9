use anyhow::Result;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::database::models::{Role, UpdateUserInput, User};

const USER_COLUMNS: &str = r#"
    id,
    organization_id,
    email,
    password_hash,
    name,
    role,
    deleted_at,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_user(&self, user: &User) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        self.create_user_in_tx(&mut tx, user).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn create_user_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: &User,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO
                users (id, organization_id, email, password_hash, name, role, created_at, updated_at)
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id)
        .bind(user.organization_id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.role)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    /// List users in an organization with optional role filter and name/email
    /// search, newest first, paginated.
    pub async fn list(
        &self,
        organization_id: Uuid,
        role: Option<Role>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<User>, i64)> {
        let mut conditions = vec![
            "organization_id = $1".to_string(),
            "deleted_at IS NULL".to_string(),
        ];
        let mut param_index = 2;

        if role.is_some() {
            conditions.push(format!("role = ${param_index}"));
            param_index += 1;
        }
        if search.is_some() {
            conditions.push(format!(
                "(name ILIKE ${param_index} OR email ILIKE ${param_index})"
            ));
            param_index += 1;
        }

        let where_clause = conditions.join(" AND ");
        let list_query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {where_clause} \
             ORDER BY created_at DESC LIMIT ${param_index} OFFSET ${}",
            param_index + 1
        );
        let count_query = format!("SELECT COUNT(*) FROM users WHERE {where_clause}");

        let mut list = sqlx::query_as::<_, User>(&list_query).bind(organization_id);
        let mut count = sqlx::query_scalar::<_, i64>(&count_query).bind(organization_id);

        if let Some(r) = role {
            list = list.bind(r);
            count = count.bind(r);
        }
        if let Some(s) = search {
            let pattern = format!("%{}%", s);
            list = list.bind(pattern.clone());
            count = count.bind(pattern);
        }

        let users = list.bind(limit).bind(offset).fetch_all(&self.pool).await?;
        let total = count.fetch_one(&self.pool).await?;

        Ok((users, total))
    }

    pub async fn update(&self, id: Uuid, input: UpdateUserInput) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE
                users
            SET
                name = $1,
                email = $2,
                role = COALESCE($3, role),
                updated_at = $4
            WHERE
                id = $5
                AND deleted_at IS NULL
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(input.name)
        .bind(input.email)
        .bind(input.role)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE users SET password_hash = $1, updated_at = $2 WHERE id = $3")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Soft delete: the row stays for referential integrity, lookups skip it.
    pub async fn soft_delete(&self, id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("UPDATE users SET deleted_at = $1 WHERE id = $2 AND deleted_at IS NULL")
                .bind(Utc::now())
                .bind(id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
