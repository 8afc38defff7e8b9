use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{ApprovalInput, LeaveApplyInput, LeaveStatus};
use crate::database::repositories::{
    ApplyOutcome, ApproveOutcome, LeaveRepository, LeaveTypeRepository,
};
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, FieldErrors, Paginated, resolve_page};
use crate::services::auth::Claims;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveListQuery {
    pub user_id: Option<Uuid>,
    pub status: Option<LeaveStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Apply for leave. Overlap and balance violations surface as conflicts;
/// types that skip approval come back already approved.
pub async fn apply(
    claims: Claims,
    repo: web::Data<LeaveRepository>,
    leave_types: web::Data<LeaveTypeRepository>,
    input: web::Json<LeaveApplyInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();

    // Managers may file on behalf of others; employees only for themselves.
    let user_id = match input.user_id {
        Some(other) if other != claims.sub => {
            claims.require_manager()?;
            other
        }
        _ => claims.sub,
    };

    let mut errors = FieldErrors::new();
    if input.end_date < input.start_date {
        errors.add("endDate", "must not be before startDate");
    }
    errors.into_result()?;

    let leave_type = leave_types
        .find_by_id(input.leave_type_id)
        .await?
        .filter(|lt| lt.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("Leave type"))?;

    match repo
        .apply(
            claims.organization_id,
            user_id,
            &leave_type,
            input.start_date,
            input.end_date,
            input.reason,
        )
        .await?
    {
        ApplyOutcome::Created(request) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(request)))
        }
        ApplyOutcome::Overlap => Err(AppError::Conflict(
            "Leave dates overlap an existing request".to_string(),
        )),
        ApplyOutcome::InsufficientBalance => Err(AppError::Conflict(
            "Insufficient leave balance".to_string(),
        )),
    }
}

pub async fn list_leave(
    claims: Claims,
    repo: web::Data<LeaveRepository>,
    query: web::Query<LeaveListQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = if claims.is_manager() {
        query.user_id
    } else {
        Some(claims.sub)
    };

    let (page, per_page, limit, offset) = resolve_page(query.page, query.per_page);
    let (requests, total) = repo
        .list(claims.organization_id, user_id, query.status, limit, offset)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(Paginated::new(
        requests, page, per_page, total,
    ))))
}

pub async fn get_leave(
    claims: Claims,
    repo: web::Data<LeaveRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let request = repo
        .find_by_id(path.into_inner())
        .await?
        .filter(|r| r.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("Leave request"))?;

    claims.require_self_or_manager(request.user_id)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(request)))
}

/// Approve a pending request; the balance is charged in the same
/// transaction, so a double approval or an exhausted balance conflicts.
pub async fn approve(
    claims: Claims,
    repo: web::Data<LeaveRepository>,
    leave_types: web::Data<LeaveTypeRepository>,
    path: web::Path<Uuid>,
    input: web::Json<ApprovalInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_manager()?;
    let request_id = path.into_inner();

    let request = repo
        .find_by_id(request_id)
        .await?
        .filter(|r| r.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("Leave request"))?;

    if request.user_id == claims.sub {
        return Err(AppError::Forbidden(
            "Cannot approve your own leave request".to_string(),
        ));
    }

    let leave_type = leave_types
        .find_by_id(request.leave_type_id)
        .await?
        .ok_or_else(|| AppError::not_found("Leave type"))?;

    match repo
        .approve(
            &request,
            leave_type.requires_balance,
            claims.sub,
            input.note.clone(),
        )
        .await?
    {
        ApproveOutcome::Approved(request) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(request)))
        }
        ApproveOutcome::NotPending => Err(AppError::Conflict(
            "Leave request is not pending".to_string(),
        )),
        ApproveOutcome::InsufficientBalance => Err(AppError::Conflict(
            "Insufficient leave balance".to_string(),
        )),
    }
}

pub async fn reject(
    claims: Claims,
    repo: web::Data<LeaveRepository>,
    path: web::Path<Uuid>,
    input: web::Json<ApprovalInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_manager()?;
    let request_id = path.into_inner();

    repo.find_by_id(request_id)
        .await?
        .filter(|r| r.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("Leave request"))?;

    match repo.reject(request_id, claims.sub, input.note.clone()).await? {
        Some(request) => Ok(HttpResponse::Ok().json(ApiResponse::success(request))),
        None => Err(AppError::Conflict(
            "Leave request is not pending".to_string(),
        )),
    }
}

/// The owner withdraws a still-pending request.
pub async fn cancel(
    claims: Claims,
    repo: web::Data<LeaveRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let request_id = path.into_inner();

    let request = repo
        .find_by_id(request_id)
        .await?
        .filter(|r| r.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("Leave request"))?;

    if request.user_id != claims.sub {
        return Err(AppError::Forbidden(
            "Cannot cancel other users' requests".to_string(),
        ));
    }

    match repo.cancel(request_id).await? {
        Some(request) => Ok(HttpResponse::Ok().json(ApiResponse::success(request))),
        None => Err(AppError::Conflict(
            "Leave request is not pending".to_string(),
        )),
    }
}

/// Hard delete of a pending request, HR only.
pub async fn delete_leave(
    claims: Claims,
    repo: web::Data<LeaveRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    claims.require_hr()?;
    let request_id = path.into_inner();

    repo.find_by_id(request_id)
        .await?
        .filter(|r| r.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("Leave request"))?;

    if repo.delete_pending(request_id).await? {
        Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
            None,
            "Leave request deleted",
        )))
    } else {
        Err(AppError::Conflict(
            "Only pending requests can be deleted".to_string(),
        ))
    }
}
