use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::repositories::DepartmentRepository;
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, FieldErrors};
use crate::services::auth::Claims;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentInput {
    pub name: String,
}

pub async fn create_department(
    claims: Claims,
    repo: web::Data<DepartmentRepository>,
    input: web::Json<DepartmentInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_hr()?;

    let mut errors = FieldErrors::new();
    errors.require_non_empty("name", &input.name);
    errors.into_result()?;

    let department = repo.create(claims.organization_id, input.name.trim()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(department)))
}

pub async fn list_departments(
    claims: Claims,
    repo: web::Data<DepartmentRepository>,
) -> Result<HttpResponse, AppError> {
    let departments = repo.list(claims.organization_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(departments)))
}

pub async fn get_department(
    claims: Claims,
    repo: web::Data<DepartmentRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let department = repo
        .find_by_id(path.into_inner())
        .await?
        .filter(|d| d.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("Department"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(department)))
}

pub async fn update_department(
    claims: Claims,
    repo: web::Data<DepartmentRepository>,
    path: web::Path<Uuid>,
    input: web::Json<DepartmentInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_hr()?;
    let department_id = path.into_inner();

    let mut errors = FieldErrors::new();
    errors.require_non_empty("name", &input.name);
    errors.into_result()?;

    repo.find_by_id(department_id)
        .await?
        .filter(|d| d.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("Department"))?;

    let department = repo.update(department_id, input.name.trim()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(department)))
}

pub async fn delete_department(
    claims: Claims,
    repo: web::Data<DepartmentRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    claims.require_hr()?;
    let department_id = path.into_inner();

    repo.find_by_id(department_id)
        .await?
        .filter(|d| d.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("Department"))?;

    repo.delete(department_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
        None,
        "Department deleted",
    )))
}
