use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{
    Attendance, AttendanceStatus, ManualAttendanceInput, worked_minutes,
};

const ATTENDANCE_COLUMNS: &str = r#"
    id,
    organization_id,
    user_id,
    work_date,
    check_in,
    check_out,
    worked_minutes,
    status,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_for_day(
        &self,
        user_id: Uuid,
        work_date: NaiveDate,
    ) -> Result<Option<Attendance>> {
        let attendance = sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE user_id = $1 AND work_date = $2"
        ))
        .bind(user_id)
        .bind(work_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendance)
    }

    /// Insert the day's record with the check-in stamp. The unique
    /// (user_id, work_date) key makes a second check-in insert nothing;
    /// None signals the caller that today is already checked in.
    pub async fn check_in(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<Attendance>> {
        let attendance = sqlx::query_as::<_, Attendance>(&format!(
            r#"
            INSERT INTO
                attendance (
                    id,
                    organization_id,
                    user_id,
                    work_date,
                    check_in,
                    worked_minutes,
                    status,
                    created_at,
                    updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, 0, $6, $7, $7)
            ON CONFLICT (user_id, work_date) DO NOTHING
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(organization_id)
        .bind(user_id)
        .bind(now.date_naive())
        .bind(now)
        .bind(AttendanceStatus::Incomplete)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendance)
    }

    /// Stamp the check-out and derive worked minutes and status. Guarded so it
    /// only applies to a record that has a check-in and no check-out yet.
    pub async fn check_out(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<Attendance>> {
        let attendance = sqlx::query_as::<_, Attendance>(&format!(
            r#"
            UPDATE
                attendance
            SET
                check_out = $1,
                worked_minutes = (EXTRACT(EPOCH FROM ($1 - check_in)) / 60)::INTEGER,
                status = CASE
                    WHEN EXTRACT(EPOCH FROM ($1 - check_in)) / 60 >= 480 THEN 'full_day'
                    WHEN EXTRACT(EPOCH FROM ($1 - check_in)) / 60 >= 240 THEN 'half_day'
                    ELSE 'incomplete'
                END,
                updated_at = $1
            WHERE
                user_id = $2
                AND work_date = $3
                AND check_in IS NOT NULL
                AND check_out IS NULL
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        ))
        .bind(now)
        .bind(user_id)
        .bind(now.date_naive())
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendance)
    }

    /// HR manual entry: both stamps known up front, status derived in Rust.
    /// None when the (user, date) slot is already taken.
    pub async fn create_manual(
        &self,
        organization_id: Uuid,
        input: ManualAttendanceInput,
    ) -> Result<Option<Attendance>> {
        let now = Utc::now();
        let minutes = worked_minutes(input.check_in, input.check_out);
        let status = AttendanceStatus::from_worked_minutes(minutes);

        let attendance = sqlx::query_as::<_, Attendance>(&format!(
            r#"
            INSERT INTO
                attendance (
                    id,
                    organization_id,
                    user_id,
                    work_date,
                    check_in,
                    check_out,
                    worked_minutes,
                    status,
                    created_at,
                    updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            ON CONFLICT (user_id, work_date) DO NOTHING
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(organization_id)
        .bind(input.user_id)
        .bind(input.work_date)
        .bind(input.check_in)
        .bind(input.check_out)
        .bind(minutes)
        .bind(status)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendance)
    }

    pub async fn list(
        &self,
        organization_id: Uuid,
        user_id: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Attendance>, i64)> {
        let mut conditions = vec!["organization_id = $1".to_string()];
        let mut param_index = 2;

        if user_id.is_some() {
            conditions.push(format!("user_id = ${param_index}"));
            param_index += 1;
        }
        if from.is_some() {
            conditions.push(format!("work_date >= ${param_index}"));
            param_index += 1;
        }
        if to.is_some() {
            conditions.push(format!("work_date <= ${param_index}"));
            param_index += 1;
        }

        let where_clause = conditions.join(" AND ");
        let list_query = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE {where_clause} \
             ORDER BY work_date DESC LIMIT ${param_index} OFFSET ${}",
            param_index + 1
        );
        let count_query = format!("SELECT COUNT(*) FROM attendance WHERE {where_clause}");

        let mut list = sqlx::query_as::<_, Attendance>(&list_query).bind(organization_id);
        let mut count = sqlx::query_scalar::<_, i64>(&count_query).bind(organization_id);

        if let Some(u) = user_id {
            list = list.bind(u);
            count = count.bind(u);
        }
        if let Some(f) = from {
            list = list.bind(f);
            count = count.bind(f);
        }
        if let Some(t) = to {
            list = list.bind(t);
            count = count.bind(t);
        }

        let rows = list.bind(limit).bind(offset).fetch_all(&self.pool).await?;
        let total = count.fetch_one(&self.pool).await?;

        Ok((rows, total))
    }
}
