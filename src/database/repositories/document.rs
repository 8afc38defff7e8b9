use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Document;

const DOCUMENT_COLUMNS: &str = r#"
    id,
    organization_id,
    employee_id,
    file_name,
    stored_path,
    size_bytes,
    mime_type,
    uploaded_by,
    created_at
"#;

#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        organization_id: Uuid,
        employee_id: Uuid,
        file_name: &str,
        stored_path: &str,
        size_bytes: i64,
        mime_type: &str,
        uploaded_by: Uuid,
    ) -> Result<Document> {
        let document = sqlx::query_as::<_, Document>(&format!(
            r#"
            INSERT INTO
                documents (
                    id,
                    organization_id,
                    employee_id,
                    file_name,
                    stored_path,
                    size_bytes,
                    mime_type,
                    uploaded_by,
                    created_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {DOCUMENT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(organization_id)
        .bind(employee_id)
        .bind(file_name)
        .bind(stored_path)
        .bind(size_bytes)
        .bind(mime_type)
        .bind(uploaded_by)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(document)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>> {
        let document = sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(document)
    }

    pub async fn list_for_employee(&self, employee_id: Uuid) -> Result<Vec<Document>> {
        let documents = sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE employee_id = $1 ORDER BY created_at DESC"
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(documents)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
