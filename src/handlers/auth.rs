use actix_web::{HttpResponse, web};

use crate::database::models::{LoginInput, RegisterInput, UserInfo};
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, FieldErrors};
use crate::services::auth::{AuthService, Claims, LoginOutcome, RegisterOutcome};

/// Admin signup: creates the organization, its first admin user, and the
/// default leave-type and department catalogs.
pub async fn register(
    service: web::Data<AuthService>,
    input: web::Json<RegisterInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();

    let mut errors = FieldErrors::new();
    errors.require_non_empty("organizationName", &input.organization_name);
    errors.require_non_empty("name", &input.name);
    if !input.email.contains('@') {
        errors.add("email", "must be a valid email address");
    }
    if input.password.len() < 8 {
        errors.add("password", "must be at least 8 characters");
    }
    errors.into_result()?;

    match service.register(input).await? {
        RegisterOutcome::Registered(response) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(response)))
        }
        RegisterOutcome::EmailTaken => {
            Err(AppError::Conflict("Email already exists".to_string()))
        }
    }
}

pub async fn login(
    service: web::Data<AuthService>,
    input: web::Json<LoginInput>,
) -> Result<HttpResponse, AppError> {
    match service.login(input.into_inner()).await? {
        LoginOutcome::Authenticated(response) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
        }
        LoginOutcome::InvalidCredentials => Err(AppError::Unauthorized),
    }
}

/// The authenticated user's own profile.
pub async fn me(
    claims: Claims,
    service: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let user = service
        .get_user(claims.sub)
        .await
        .map_err(|_| AppError::not_found("User"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserInfo::from(user))))
}
