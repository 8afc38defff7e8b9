use actix_web::{HttpResponse, web};

use crate::database::models::OrganizationInput;
use crate::database::repositories::OrganizationRepository;
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, FieldErrors};
use crate::services::auth::Claims;

/// The calling user's organization.
pub async fn get_organization(
    claims: Claims,
    repo: web::Data<OrganizationRepository>,
) -> Result<HttpResponse, AppError> {
    let organization = repo
        .find_by_id(claims.organization_id)
        .await?
        .ok_or_else(|| AppError::not_found("Organization"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(organization)))
}

/// Rename the organization; the slug is fixed at signup and never changes.
pub async fn update_organization(
    claims: Claims,
    repo: web::Data<OrganizationRepository>,
    input: web::Json<OrganizationInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let mut errors = FieldErrors::new();
    errors.require_non_empty("name", &input.name);
    errors.into_result()?;

    let organization = repo
        .update_name(claims.organization_id, input.name.trim())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(organization)))
}
