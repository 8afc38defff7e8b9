use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::database::models::DocumentUploadInput;
use crate::database::repositories::{DocumentRepository, EmployeeRepository};
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, FieldErrors};
use crate::services::auth::Claims;
use crate::services::storage::DocumentStore;

/// Upload a document for an employee; the file content travels as base64
/// in the JSON body and is written under the store root.
pub async fn upload_document(
    claims: Claims,
    repo: web::Data<DocumentRepository>,
    employees: web::Data<EmployeeRepository>,
    store: web::Data<DocumentStore>,
    path: web::Path<Uuid>,
    input: web::Json<DocumentUploadInput>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();
    let input = input.into_inner();

    let mut errors = FieldErrors::new();
    errors.require_non_empty("fileName", &input.file_name);
    errors.require_non_empty("mimeType", &input.mime_type);
    errors.require_non_empty("contentBase64", &input.content_base64);
    errors.into_result()?;

    let employee = employees
        .find_by_id(employee_id)
        .await?
        .filter(|e| e.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("Employee"))?;

    claims.require_self_or_manager(employee.user_id)?;

    let stored = store
        .save(employee_id, &input.file_name, &input.content_base64)
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let document = repo
        .create(
            claims.organization_id,
            employee_id,
            input.file_name.trim(),
            &stored.relative_path,
            stored.size_bytes,
            &input.mime_type,
            claims.sub,
        )
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(document)))
}

pub async fn list_documents(
    claims: Claims,
    repo: web::Data<DocumentRepository>,
    employees: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();

    let employee = employees
        .find_by_id(employee_id)
        .await?
        .filter(|e| e.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("Employee"))?;

    claims.require_self_or_manager(employee.user_id)?;

    let documents = repo.list_for_employee(employee_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(documents)))
}

/// Stream the stored file back with its original name and MIME type.
pub async fn download_document(
    claims: Claims,
    repo: web::Data<DocumentRepository>,
    employees: web::Data<EmployeeRepository>,
    store: web::Data<DocumentStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let document = repo
        .find_by_id(path.into_inner())
        .await?
        .filter(|d| d.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("Document"))?;

    let employee = employees
        .find_by_id(document.employee_id)
        .await?
        .ok_or_else(|| AppError::not_found("Employee"))?;

    claims.require_self_or_manager(employee.user_id)?;

    let bytes = store
        .read(&document.stored_path)
        .await
        .map_err(|_| AppError::not_found("Document file"))?;

    Ok(HttpResponse::Ok()
        .content_type(document.mime_type.clone())
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", document.file_name),
        ))
        .body(bytes))
}

pub async fn delete_document(
    claims: Claims,
    repo: web::Data<DocumentRepository>,
    store: web::Data<DocumentStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    claims.require_hr()?;

    let document = repo
        .find_by_id(path.into_inner())
        .await?
        .filter(|d| d.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("Document"))?;

    repo.delete(document.id).await?;
    store
        .remove(&document.stored_path)
        .await
        .map_err(|e| AppError::internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
        None,
        "Document deleted",
    )))
}
