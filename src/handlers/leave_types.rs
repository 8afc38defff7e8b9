use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::database::models::LeaveTypeInput;
use crate::database::repositories::LeaveTypeRepository;
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, FieldErrors};
use crate::services::auth::Claims;

pub async fn create_leave_type(
    claims: Claims,
    repo: web::Data<LeaveTypeRepository>,
    input: web::Json<LeaveTypeInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_hr()?;
    let input = input.into_inner();

    let mut errors = FieldErrors::new();
    errors.require_non_empty("name", &input.name);
    if input.default_days < 0 {
        errors.add("defaultDays", "must not be negative");
    }
    errors.into_result()?;

    let leave_type = repo.create(claims.organization_id, input).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(leave_type)))
}

pub async fn list_leave_types(
    claims: Claims,
    repo: web::Data<LeaveTypeRepository>,
) -> Result<HttpResponse, AppError> {
    let leave_types = repo.list(claims.organization_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(leave_types)))
}

pub async fn update_leave_type(
    claims: Claims,
    repo: web::Data<LeaveTypeRepository>,
    path: web::Path<Uuid>,
    input: web::Json<LeaveTypeInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_hr()?;
    let leave_type_id = path.into_inner();
    let input = input.into_inner();

    let mut errors = FieldErrors::new();
    errors.require_non_empty("name", &input.name);
    if input.default_days < 0 {
        errors.add("defaultDays", "must not be negative");
    }
    errors.into_result()?;

    repo.find_by_id(leave_type_id)
        .await?
        .filter(|lt| lt.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("Leave type"))?;

    let leave_type = repo.update(leave_type_id, input).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(leave_type)))
}

pub async fn delete_leave_type(
    claims: Claims,
    repo: web::Data<LeaveTypeRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    claims.require_hr()?;
    let leave_type_id = path.into_inner();

    repo.find_by_id(leave_type_id)
        .await?
        .filter(|lt| lt.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("Leave type"))?;

    // Requests referencing the type keep history; the FK restricts deletes
    // to unused types and that restriction surfaces as a conflict.
    match repo.delete(leave_type_id).await {
        Ok(_) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
            None,
            "Leave type deleted",
        ))),
        Err(_) => Err(AppError::Conflict(
            "Leave type is in use and cannot be deleted".to_string(),
        )),
    }
}
