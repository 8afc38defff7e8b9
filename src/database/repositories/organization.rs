use anyhow::Result;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::database::models::{Organization, slugify};

#[derive(Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new organization inside an existing transaction (signup creates
    /// the organization and its admin user atomically).
    pub async fn create_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
        slug: &str,
    ) -> Result<Organization> {
        let now = Utc::now();

        let organization = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO
                organizations (id, name, slug, created_at, updated_at)
            VALUES
                ($1, $2, $3, $4, $5)
            RETURNING
                id, name, slug, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(slug)
        .bind(now)
        .bind(now)
        .fetch_one(&mut **tx)
        .await?;

        Ok(organization)
    }

    /// Slug derived from the name, suffixed with a counter when taken.
    pub async fn unique_slug(&self, name: &str) -> Result<String> {
        let base = slugify(name);
        if !self.slug_exists(&base).await? {
            return Ok(base);
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}-{n}");
            if !self.slug_exists(&candidate).await? {
                return Ok(candidate);
            }
            n += 1;
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Organization>> {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            SELECT
                id, name, slug, created_at, updated_at
            FROM
                organizations
            WHERE
                id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(organization)
    }

    pub async fn slug_exists(&self, slug: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM organizations WHERE slug = $1")
                .bind(slug)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    pub async fn update_name(&self, id: Uuid, name: &str) -> Result<Organization> {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            UPDATE
                organizations
            SET
                name = $1,
                updated_at = $2
            WHERE
                id = $3
            RETURNING
                id, name, slug, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(organization)
    }
}
