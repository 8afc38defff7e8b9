use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Organization-defined category of leave (Sick, Annual, ...).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaveType {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub default_days: i32,
    pub requires_approval: bool,
    pub requires_balance: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveTypeInput {
    pub name: String,
    pub default_days: i32,
    pub requires_approval: Option<bool>,
    pub requires_balance: Option<bool>,
}
