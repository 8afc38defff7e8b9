use actix_web::{HttpResponse, web};
use bigdecimal::BigDecimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{EmployeeInput, EmployeeStatus, EmployeeUpdateInput};
use crate::database::repositories::{EmployeeRepository, UserRepository};
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, FieldErrors, Paginated, resolve_page};
use crate::services::auth::Claims;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeListQuery {
    pub department_id: Option<Uuid>,
    pub status: Option<EmployeeStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTransitionInput {
    pub status: EmployeeStatus,
}

pub async fn create_employee(
    claims: Claims,
    repo: web::Data<EmployeeRepository>,
    users: web::Data<UserRepository>,
    input: web::Json<EmployeeInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_hr()?;
    let input = input.into_inner();

    let mut errors = FieldErrors::new();
    errors.require_non_empty("employeeCode", &input.employee_code);
    errors.require_non_empty("designation", &input.designation);
    if input.basic_salary < BigDecimal::from(0) {
        errors.add("basicSalary", "must not be negative");
    }
    errors.into_result()?;

    // The profile must attach to a user of the same organization.
    users
        .find_by_id(input.user_id)
        .await?
        .filter(|u| u.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("User"))?;

    if repo.find_by_user_id(input.user_id).await?.is_some() {
        return Err(AppError::Conflict(
            "User already has an employee profile".to_string(),
        ));
    }

    let employee = repo.create(claims.organization_id, input).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(employee)))
}

pub async fn list_employees(
    claims: Claims,
    repo: web::Data<EmployeeRepository>,
    query: web::Query<EmployeeListQuery>,
) -> Result<HttpResponse, AppError> {
    claims.require_manager()?;

    let (page, per_page, limit, offset) = resolve_page(query.page, query.per_page);
    let (employees, total) = repo
        .list(
            claims.organization_id,
            query.department_id,
            query.status,
            limit,
            offset,
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(Paginated::new(
        employees, page, per_page, total,
    ))))
}

pub async fn get_employee(
    claims: Claims,
    repo: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let employee = repo
        .find_by_id(path.into_inner())
        .await?
        .filter(|e| e.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("Employee"))?;

    claims.require_self_or_manager(employee.user_id)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(employee)))
}

pub async fn update_employee(
    claims: Claims,
    repo: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
    input: web::Json<EmployeeUpdateInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_hr()?;
    let employee_id = path.into_inner();
    let input = input.into_inner();

    let existing = repo
        .find_by_id(employee_id)
        .await?
        .filter(|e| e.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("Employee"))?;

    // Status changes go through the transition endpoint, not the update.
    if let Some(status) = input.status {
        if status != existing.status {
            return Err(AppError::BadRequest(
                "Use the status transition endpoint to change status".to_string(),
            ));
        }
    }

    let employee = repo.update(employee_id, input).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(employee)))
}

/// Lifecycle transition with a compare-and-set on the current status, so
/// concurrent transitions cannot both win.
pub async fn transition_employee_status(
    claims: Claims,
    repo: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
    input: web::Json<StatusTransitionInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_hr()?;
    let employee_id = path.into_inner();
    let target = input.status;

    let existing = repo
        .find_by_id(employee_id)
        .await?
        .filter(|e| e.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("Employee"))?;

    if !existing.status.can_transition_to(target) {
        return Err(AppError::Conflict(format!(
            "Cannot transition from {} to {}",
            existing.status, target
        )));
    }

    match repo
        .transition_status(employee_id, existing.status, target)
        .await?
    {
        Some(employee) => Ok(HttpResponse::Ok().json(ApiResponse::success(employee))),
        None => Err(AppError::Conflict(
            "Employee status changed concurrently".to_string(),
        )),
    }
}
