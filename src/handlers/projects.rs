use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Project, ProjectInput, ProjectStatus, ProjectTaskInput};
use crate::database::repositories::ProjectRepository;
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, FieldErrors, Paginated, resolve_page};
use crate::services::auth::Claims;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListQuery {
    pub status: Option<ProjectStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInput {
    pub user_id: Uuid,
}

async fn find_project(
    claims: &Claims,
    repo: &ProjectRepository,
    id: Uuid,
) -> Result<Project, AppError> {
    repo.find_by_id(id)
        .await?
        .filter(|p| p.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("Project"))
}

pub async fn create_project(
    claims: Claims,
    repo: web::Data<ProjectRepository>,
    input: web::Json<ProjectInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_manager()?;
    let input = input.into_inner();

    let mut errors = FieldErrors::new();
    errors.require_non_empty("name", &input.name);
    errors.into_result()?;

    let project = repo.create(claims.organization_id, input).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(project)))
}

pub async fn list_projects(
    claims: Claims,
    repo: web::Data<ProjectRepository>,
    query: web::Query<ProjectListQuery>,
) -> Result<HttpResponse, AppError> {
    let (page, per_page, limit, offset) = resolve_page(query.page, query.per_page);
    let (projects, total) = repo
        .list(claims.organization_id, query.status, limit, offset)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(Paginated::new(
        projects, page, per_page, total,
    ))))
}

pub async fn get_project(
    claims: Claims,
    repo: web::Data<ProjectRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let project = find_project(&claims, &repo, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(project)))
}

pub async fn update_project(
    claims: Claims,
    repo: web::Data<ProjectRepository>,
    path: web::Path<Uuid>,
    input: web::Json<ProjectInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_manager()?;
    let project_id = path.into_inner();
    let input = input.into_inner();

    let mut errors = FieldErrors::new();
    errors.require_non_empty("name", &input.name);
    errors.into_result()?;

    find_project(&claims, &repo, project_id).await?;

    let project = repo.update(project_id, input).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(project)))
}

pub async fn delete_project(
    claims: Claims,
    repo: web::Data<ProjectRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    claims.require_manager()?;
    let project_id = path.into_inner();

    find_project(&claims, &repo, project_id).await?;

    repo.delete(project_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
        None,
        "Project deleted",
    )))
}

// Tasks

pub async fn create_task(
    claims: Claims,
    repo: web::Data<ProjectRepository>,
    path: web::Path<Uuid>,
    input: web::Json<ProjectTaskInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_manager()?;
    let project_id = path.into_inner();
    let input = input.into_inner();

    let mut errors = FieldErrors::new();
    errors.require_non_empty("title", &input.title);
    errors.into_result()?;

    find_project(&claims, &repo, project_id).await?;

    let task = repo.create_task(project_id, input).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(task)))
}

pub async fn list_tasks(
    claims: Claims,
    repo: web::Data<ProjectRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let project_id = path.into_inner();
    find_project(&claims, &repo, project_id).await?;

    let tasks = repo.list_tasks(project_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(tasks)))
}

/// Assignees may move their own tasks; managers may edit any task.
pub async fn update_task(
    claims: Claims,
    repo: web::Data<ProjectRepository>,
    path: web::Path<(Uuid, Uuid)>,
    input: web::Json<ProjectTaskInput>,
) -> Result<HttpResponse, AppError> {
    let (project_id, task_id) = path.into_inner();
    find_project(&claims, &repo, project_id).await?;

    let task = repo
        .find_task(task_id)
        .await?
        .filter(|t| t.project_id == project_id)
        .ok_or_else(|| AppError::not_found("Task"))?;

    if !claims.is_manager() && task.assigned_to != Some(claims.sub) {
        return Err(AppError::Forbidden(
            "Cannot update tasks assigned to others".to_string(),
        ));
    }

    let task = repo.update_task(task_id, input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(task)))
}

pub async fn delete_task(
    claims: Claims,
    repo: web::Data<ProjectRepository>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    claims.require_manager()?;
    let (project_id, task_id) = path.into_inner();
    find_project(&claims, &repo, project_id).await?;

    repo.find_task(task_id)
        .await?
        .filter(|t| t.project_id == project_id)
        .ok_or_else(|| AppError::not_found("Task"))?;

    repo.delete_task(task_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
        None,
        "Task deleted",
    )))
}

// Members

pub async fn add_member(
    claims: Claims,
    repo: web::Data<ProjectRepository>,
    path: web::Path<Uuid>,
    input: web::Json<MemberInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_manager()?;
    let project_id = path.into_inner();
    find_project(&claims, &repo, project_id).await?;

    if repo.add_member(project_id, input.user_id).await? {
        Ok(HttpResponse::Created().json(ApiResponse::<()>::success_with_message(
            None,
            "Member added",
        )))
    } else {
        Err(AppError::Conflict(
            "User is already a member of this project".to_string(),
        ))
    }
}

pub async fn remove_member(
    claims: Claims,
    repo: web::Data<ProjectRepository>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    claims.require_manager()?;
    let (project_id, user_id) = path.into_inner();
    find_project(&claims, &repo, project_id).await?;

    if repo.remove_member(project_id, user_id).await? {
        Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
            None,
            "Member removed",
        )))
    } else {
        Err(AppError::not_found("Project member"))
    }
}

pub async fn list_members(
    claims: Claims,
    repo: web::Data<ProjectRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let project_id = path.into_inner();
    find_project(&claims, &repo, project_id).await?;

    let members = repo.list_members(project_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(members)))
}
