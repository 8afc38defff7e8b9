use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::BalanceInitInput;
use crate::database::repositories::LeaveBalanceRepository;
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, FieldErrors};
use crate::services::auth::Claims;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceListQuery {
    pub user_id: Option<Uuid>,
    pub year: Option<i32>,
}

pub async fn list_balances(
    claims: Claims,
    repo: web::Data<LeaveBalanceRepository>,
    query: web::Query<BalanceListQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = if claims.is_manager() {
        query.user_id
    } else {
        Some(claims.sub)
    };

    let balances = repo
        .list(claims.organization_id, user_id, query.year)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(balances)))
}

/// Seed the year's balances from each leave type's default allotment.
/// Idempotent: existing rows are counted as skipped, never overwritten.
pub async fn init_year(
    claims: Claims,
    repo: web::Data<LeaveBalanceRepository>,
    input: web::Json<BalanceInitInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_hr()?;

    let mut errors = FieldErrors::new();
    if !(2000..=2100).contains(&input.year) {
        errors.add("year", "must be between 2000 and 2100");
    }
    errors.into_result()?;

    let summary = repo.init_year(claims.organization_id, input.year).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(summary)))
}
