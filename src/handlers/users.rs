use actix_web::{HttpResponse, web};
use bcrypt::{DEFAULT_COST, hash};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{CreateUserInput, Role, UpdateUserInput, User, UserInfo};
use crate::database::repositories::UserRepository;
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, FieldErrors, Paginated, resolve_page};
use crate::services::auth::Claims;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListQuery {
    pub role: Option<Role>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordInput {
    pub password: String,
}

/// HR creates accounts for employees; only admins may mint another admin.
pub async fn create_user(
    claims: Claims,
    repo: web::Data<UserRepository>,
    input: web::Json<CreateUserInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_hr()?;
    let input = input.into_inner();

    let role = input.role.unwrap_or_default();
    if role == Role::Admin && !claims.is_admin() {
        return Err(AppError::Forbidden(
            "Only admins can create admin accounts".to_string(),
        ));
    }

    let mut errors = FieldErrors::new();
    errors.require_non_empty("name", &input.name);
    if !input.email.contains('@') {
        errors.add("email", "must be a valid email address");
    }
    if input.password.len() < 8 {
        errors.add("password", "must be at least 8 characters");
    }
    errors.into_result()?;

    if repo.email_exists(&input.email).await? {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    let password_hash =
        hash(&input.password, DEFAULT_COST).map_err(|e| AppError::internal(e.to_string()))?;
    let user = User::new(
        claims.organization_id,
        input.email,
        password_hash,
        input.name,
        role,
    );
    repo.create_user(&user).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(UserInfo::from(user))))
}

pub async fn list_users(
    claims: Claims,
    repo: web::Data<UserRepository>,
    query: web::Query<UserListQuery>,
) -> Result<HttpResponse, AppError> {
    claims.require_manager()?;

    let (page, per_page, limit, offset) = resolve_page(query.page, query.per_page);
    let (users, total) = repo
        .list(
            claims.organization_id,
            query.role,
            query.search.as_deref(),
            limit,
            offset,
        )
        .await?;

    let users: Vec<UserInfo> = users.into_iter().map(UserInfo::from).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(Paginated::new(
        users, page, per_page, total,
    ))))
}

pub async fn get_user(
    claims: Claims,
    repo: web::Data<UserRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    claims.require_self_or_manager(user_id)?;

    let user = repo
        .find_by_id(user_id)
        .await?
        .filter(|u| u.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("User"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserInfo::from(user))))
}

pub async fn update_user(
    claims: Claims,
    repo: web::Data<UserRepository>,
    path: web::Path<Uuid>,
    input: web::Json<UpdateUserInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_hr()?;
    let user_id = path.into_inner();
    let input = input.into_inner();

    let existing = repo
        .find_by_id(user_id)
        .await?
        .filter(|u| u.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("User"))?;

    // Role escalation to admin stays admin-only.
    if input.role == Some(Role::Admin) && !claims.is_admin() {
        return Err(AppError::Forbidden(
            "Only admins can grant the admin role".to_string(),
        ));
    }

    if input.email != existing.email && repo.email_exists(&input.email).await? {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    let user = repo.update(user_id, input).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(UserInfo::from(user))))
}

/// Users change their own password; admins can reset anyone's.
pub async fn change_password(
    claims: Claims,
    repo: web::Data<UserRepository>,
    path: web::Path<Uuid>,
    input: web::Json<ChangePasswordInput>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    if claims.sub != user_id {
        claims.require_admin()?;
    }

    if input.password.len() < 8 {
        let mut errors = FieldErrors::new();
        errors.add("password", "must be at least 8 characters");
        errors.into_result()?;
    }

    repo.find_by_id(user_id)
        .await?
        .filter(|u| u.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("User"))?;

    let password_hash =
        hash(&input.password, DEFAULT_COST).map_err(|e| AppError::internal(e.to_string()))?;
    repo.update_password(user_id, &password_hash).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
        None,
        "Password updated",
    )))
}

pub async fn delete_user(
    claims: Claims,
    repo: web::Data<UserRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;
    let user_id = path.into_inner();

    if user_id == claims.sub {
        return Err(AppError::BadRequest(
            "Cannot delete your own account".to_string(),
        ));
    }

    repo.find_by_id(user_id)
        .await?
        .filter(|u| u.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("User"))?;

    repo.soft_delete(user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
        None,
        "User deleted",
    )))
}
