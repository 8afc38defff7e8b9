use anyhow::Result;
use chrono::{Datelike, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::database::models::{LeaveRequest, LeaveStatus, LeaveType, total_days};

const LEAVE_COLUMNS: &str = r#"
    id,
    organization_id,
    user_id,
    leave_type_id,
    start_date,
    end_date,
    total_days,
    reason,
    status,
    approved_by,
    approval_note,
    approved_at,
    created_at,
    updated_at
"#;

/// Outcome of a leave application; domain failures are values, not errors.
#[derive(Debug)]
pub enum ApplyOutcome {
    Created(LeaveRequest),
    Overlap,
    InsufficientBalance,
}

#[derive(Debug)]
pub enum ApproveOutcome {
    Approved(LeaveRequest),
    NotPending,
    InsufficientBalance,
}

#[derive(Clone)]
pub struct LeaveRepository {
    pool: PgPool,
}

impl LeaveRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply for leave. Overlap check, request insert, and (for types that
    /// skip approval) the balance decrement run in one transaction.
    pub async fn apply(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
        leave_type: &LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: Option<String>,
    ) -> Result<ApplyOutcome> {
        let days = total_days(start_date, end_date) as i32;
        let mut tx = self.pool.begin().await?;

        if Self::has_overlap(&mut tx, user_id, start_date, end_date).await? {
            tx.rollback().await?;
            return Ok(ApplyOutcome::Overlap);
        }

        // Balance is only a precondition for types that track one.
        if leave_type.requires_balance {
            let remaining =
                Self::remaining_days(&mut tx, user_id, leave_type.id, start_date.year()).await?;
            if remaining < days {
                tx.rollback().await?;
                return Ok(ApplyOutcome::InsufficientBalance);
            }
        }

        let auto_approve = !leave_type.requires_approval;
        let status = if auto_approve {
            LeaveStatus::Approved
        } else {
            LeaveStatus::Pending
        };

        let now = Utc::now();
        let inserted = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            INSERT INTO
                leave_requests (
                    id,
                    organization_id,
                    user_id,
                    leave_type_id,
                    start_date,
                    end_date,
                    total_days,
                    reason,
                    status,
                    approved_at,
                    created_at,
                    updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING {LEAVE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(organization_id)
        .bind(user_id)
        .bind(leave_type.id)
        .bind(start_date)
        .bind(end_date)
        .bind(days)
        .bind(reason)
        .bind(status)
        .bind(auto_approve.then_some(now))
        .bind(now)
        .fetch_one(&mut *tx)
        .await;

        // The leave_requests_no_overlap exclusion constraint catches the race
        // where two applications pass has_overlap concurrently.
        let request = match inserted {
            Ok(request) => request,
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23P01") => {
                tx.rollback().await?;
                return Ok(ApplyOutcome::Overlap);
            }
            Err(e) => return Err(e.into()),
        };

        if auto_approve && leave_type.requires_balance {
            let year = start_date.year();
            if !Self::decrement_balance(&mut tx, user_id, leave_type.id, year, days).await? {
                tx.rollback().await?;
                return Ok(ApplyOutcome::InsufficientBalance);
            }
        }

        tx.commit().await?;
        Ok(ApplyOutcome::Created(request))
    }

    /// Approve a pending request and charge the balance atomically. Both
    /// UPDATEs are compare-and-set, so a concurrent approval of the same
    /// request observes NotPending instead of double-charging.
    pub async fn approve(
        &self,
        request: &LeaveRequest,
        requires_balance: bool,
        approver: Uuid,
        note: Option<String>,
    ) -> Result<ApproveOutcome> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let approved = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            UPDATE
                leave_requests
            SET
                status = $1,
                approved_by = $2,
                approval_note = $3,
                approved_at = $4,
                updated_at = $4
            WHERE
                id = $5
                AND status = $6
            RETURNING {LEAVE_COLUMNS}
            "#
        ))
        .bind(LeaveStatus::Approved)
        .bind(approver)
        .bind(note)
        .bind(now)
        .bind(request.id)
        .bind(LeaveStatus::Pending)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(approved) = approved else {
            tx.rollback().await?;
            return Ok(ApproveOutcome::NotPending);
        };

        if requires_balance {
            let year = request.start_date.year();
            let charged = Self::decrement_balance(
                &mut tx,
                request.user_id,
                request.leave_type_id,
                year,
                request.total_days,
            )
            .await?;
            if !charged {
                tx.rollback().await?;
                return Ok(ApproveOutcome::InsufficientBalance);
            }
        }

        tx.commit().await?;
        Ok(ApproveOutcome::Approved(approved))
    }

    /// Reject a pending request; no balance mutation. None when not pending.
    pub async fn reject(
        &self,
        id: Uuid,
        approver: Uuid,
        note: Option<String>,
    ) -> Result<Option<LeaveRequest>> {
        let request = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            UPDATE
                leave_requests
            SET
                status = $1,
                approved_by = $2,
                approval_note = $3,
                updated_at = $4
            WHERE
                id = $5
                AND status = $6
            RETURNING {LEAVE_COLUMNS}
            "#
        ))
        .bind(LeaveStatus::Rejected)
        .bind(approver)
        .bind(note)
        .bind(Utc::now())
        .bind(id)
        .bind(LeaveStatus::Pending)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Cancel a pending request; the balance was never touched for it.
    pub async fn cancel(&self, id: Uuid) -> Result<Option<LeaveRequest>> {
        let request = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            UPDATE
                leave_requests
            SET
                status = $1,
                updated_at = $2
            WHERE
                id = $3
                AND status = $4
            RETURNING {LEAVE_COLUMNS}
            "#
        ))
        .bind(LeaveStatus::Cancelled)
        .bind(Utc::now())
        .bind(id)
        .bind(LeaveStatus::Pending)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<LeaveRequest>> {
        let request = sqlx::query_as::<_, LeaveRequest>(&format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    pub async fn list(
        &self,
        organization_id: Uuid,
        user_id: Option<Uuid>,
        status: Option<LeaveStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<LeaveRequest>, i64)> {
        let mut conditions = vec!["organization_id = $1".to_string()];
        let mut param_index = 2;

        if user_id.is_some() {
            conditions.push(format!("user_id = ${param_index}"));
            param_index += 1;
        }
        if status.is_some() {
            conditions.push(format!("status = ${param_index}"));
            param_index += 1;
        }

        let where_clause = conditions.join(" AND ");
        let list_query = format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE {where_clause} \
             ORDER BY created_at DESC LIMIT ${param_index} OFFSET ${}",
            param_index + 1
        );
        let count_query = format!("SELECT COUNT(*) FROM leave_requests WHERE {where_clause}");

        let mut list = sqlx::query_as::<_, LeaveRequest>(&list_query).bind(organization_id);
        let mut count = sqlx::query_scalar::<_, i64>(&count_query).bind(organization_id);

        if let Some(u) = user_id {
            list = list.bind(u);
            count = count.bind(u);
        }
        if let Some(s) = status {
            list = list.bind(s);
            count = count.bind(s);
        }

        let requests = list.bind(limit).bind(offset).fetch_all(&self.pool).await?;
        let total = count.fetch_one(&self.pool).await?;

        Ok((requests, total))
    }

    /// Delete a pending request (owner withdrawing before any decision).
    pub async fn delete_pending(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM leave_requests WHERE id = $1 AND status = $2")
            .bind(id)
            .bind(LeaveStatus::Pending)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// A pending or approved request whose closed date range intersects the
    /// candidate range blocks the application.
    async fn has_overlap(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM leave_requests
                WHERE
                    user_id = $1
                    AND status IN ('pending', 'approved')
                    AND start_date <= $2
                    AND end_date >= $3
            )
            "#,
        )
        .bind(user_id)
        .bind(end_date)
        .bind(start_date)
        .fetch_one(&mut **tx)
        .await?;

        Ok(exists)
    }

    async fn remaining_days(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        leave_type_id: Uuid,
        year: i32,
    ) -> Result<i32> {
        let remaining: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT remaining_days
            FROM leave_balances
            WHERE user_id = $1 AND leave_type_id = $2 AND year = $3
            "#,
        )
        .bind(user_id)
        .bind(leave_type_id)
        .bind(year)
        .fetch_optional(&mut **tx)
        .await?;

        // No balance row means no allotment.
        Ok(remaining.unwrap_or(0))
    }

    /// Guarded decrement: the WHERE clause re-checks the remaining balance so
    /// two concurrent approvals cannot drive it negative.
    async fn decrement_balance(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        leave_type_id: Uuid,
        year: i32,
        days: i32,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE
                leave_balances
            SET
                used_days = used_days + $1,
                remaining_days = remaining_days - $1,
                updated_at = $2
            WHERE
                user_id = $3
                AND leave_type_id = $4
                AND year = $5
                AND remaining_days >= $1
            "#,
        )
        .bind(days)
        .bind(Utc::now())
        .bind(user_id)
        .bind(leave_type_id)
        .bind(year)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
