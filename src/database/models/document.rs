use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub employee_id: Uuid,
    pub file_name: String,
    pub stored_path: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Upload payload: file content travels as base64 inside the JSON body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUploadInput {
    pub file_name: String,
    pub mime_type: String,
    pub content_base64: String,
}
