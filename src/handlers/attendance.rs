use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::ManualAttendanceInput;
use crate::database::repositories::AttendanceRepository;
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, FieldErrors, Paginated, resolve_page};
use crate::services::auth::Claims;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceListQuery {
    pub user_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Stamp today's check-in for the calling user. A second call on the same
/// day conflicts instead of overwriting the first stamp.
pub async fn check_in(
    claims: Claims,
    repo: web::Data<AttendanceRepository>,
) -> Result<HttpResponse, AppError> {
    match repo
        .check_in(claims.organization_id, claims.sub, Utc::now())
        .await?
    {
        Some(attendance) => Ok(HttpResponse::Created().json(ApiResponse::success(attendance))),
        None => Err(AppError::Conflict(
            "Already checked in today".to_string(),
        )),
    }
}

/// Stamp today's check-out; worked minutes and day status are derived from
/// the pair of stamps.
pub async fn check_out(
    claims: Claims,
    repo: web::Data<AttendanceRepository>,
) -> Result<HttpResponse, AppError> {
    match repo.check_out(claims.sub, Utc::now()).await? {
        Some(attendance) => Ok(HttpResponse::Ok().json(ApiResponse::success(attendance))),
        None => Err(AppError::Conflict(
            "No open check-in for today".to_string(),
        )),
    }
}

/// HR backfills a full day record with both stamps known.
pub async fn create_manual(
    claims: Claims,
    repo: web::Data<AttendanceRepository>,
    input: web::Json<ManualAttendanceInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_hr()?;
    let input = input.into_inner();

    let mut errors = FieldErrors::new();
    if input.check_out < input.check_in {
        errors.add("checkOut", "must not be before checkIn");
    }
    errors.into_result()?;

    match repo.create_manual(claims.organization_id, input).await? {
        Some(attendance) => Ok(HttpResponse::Created().json(ApiResponse::success(attendance))),
        None => Err(AppError::Conflict(
            "Attendance already recorded for that day".to_string(),
        )),
    }
}

pub async fn list_attendance(
    claims: Claims,
    repo: web::Data<AttendanceRepository>,
    query: web::Query<AttendanceListQuery>,
) -> Result<HttpResponse, AppError> {
    // Employees see only their own records; the filter is forced.
    let user_id = if claims.is_manager() {
        query.user_id
    } else {
        Some(claims.sub)
    };

    let (page, per_page, limit, offset) = resolve_page(query.page, query.per_page);
    let (rows, total) = repo
        .list(
            claims.organization_id,
            user_id,
            query.from,
            query.to,
            limit,
            offset,
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(Paginated::new(
        rows, page, per_page, total,
    ))))
}

/// The calling user's record for today, if any.
pub async fn today(
    claims: Claims,
    repo: web::Data<AttendanceRepository>,
) -> Result<HttpResponse, AppError> {
    let attendance = repo
        .find_for_day(claims.sub, Utc::now().date_naive())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(attendance)))
}
