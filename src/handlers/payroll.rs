use actix_web::{HttpResponse, web};
use bigdecimal::BigDecimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{
    BulkTransitionFailure, BulkTransitionInput, BulkTransitionSummary, Payroll, PayrollInput,
    PayrollStatus, PayrollWithComponents,
};
use crate::database::repositories::{EmployeeRepository, PayrollRepository};
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, FieldErrors, Paginated, resolve_page};
use crate::services::auth::Claims;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollListQuery {
    pub employee_id: Option<Uuid>,
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub status: Option<PayrollStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

fn validate_period(errors: &mut FieldErrors, month: i32, year: i32) {
    if !(1..=12).contains(&month) {
        errors.add("month", "must be between 1 and 12");
    }
    if !(2000..=2100).contains(&year) {
        errors.add("year", "must be between 2000 and 2100");
    }
}

/// Create a draft payroll with its salary components; totals are derived,
/// never supplied by the caller.
pub async fn create_payroll(
    claims: Claims,
    repo: web::Data<PayrollRepository>,
    employees: web::Data<EmployeeRepository>,
    input: web::Json<PayrollInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_hr()?;
    let input = input.into_inner();

    let mut errors = FieldErrors::new();
    validate_period(&mut errors, input.month, input.year);
    if input.basic_salary < BigDecimal::from(0) {
        errors.add("basicSalary", "must not be negative");
    }
    for (i, component) in input.components.iter().enumerate() {
        if component.name.trim().is_empty() {
            errors.add(&format!("components[{i}].name"), "must not be empty");
        }
        if component.amount < BigDecimal::from(0) {
            errors.add(&format!("components[{i}].amount"), "must not be negative");
        }
    }
    errors.into_result()?;

    employees
        .find_by_id(input.employee_id)
        .await?
        .filter(|e| e.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("Employee"))?;

    // The unique (employee, month, year) key backs this up under races.
    match repo.create_with_components(claims.organization_id, input).await {
        Ok(payroll) => Ok(HttpResponse::Created().json(ApiResponse::success(payroll))),
        Err(err) => match err.downcast_ref::<sqlx::Error>() {
            Some(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Conflict(
                "Payroll already exists for that employee and period".to_string(),
            )),
            _ => Err(err.into()),
        },
    }
}

pub async fn list_payrolls(
    claims: Claims,
    repo: web::Data<PayrollRepository>,
    query: web::Query<PayrollListQuery>,
) -> Result<HttpResponse, AppError> {
    claims.require_hr()?;

    let (page, per_page, limit, offset) = resolve_page(query.page, query.per_page);
    let (payrolls, total) = repo
        .list(
            claims.organization_id,
            query.employee_id,
            query.month,
            query.year,
            query.status,
            limit,
            offset,
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(Paginated::new(
        payrolls, page, per_page, total,
    ))))
}

pub async fn get_payroll(
    claims: Claims,
    repo: web::Data<PayrollRepository>,
    employees: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let payroll = repo
        .find_by_id(path.into_inner())
        .await?
        .filter(|p| p.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("Payroll"))?;

    // Employees may view their own payslips.
    if !claims.is_hr() {
        let employee = employees
            .find_by_id(payroll.employee_id)
            .await?
            .ok_or_else(|| AppError::not_found("Employee"))?;
        if employee.user_id != claims.sub {
            return Err(AppError::Forbidden(
                "Cannot view other employees' payrolls".to_string(),
            ));
        }
    }

    let components = repo.components(payroll.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(PayrollWithComponents {
        payroll,
        components,
    })))
}

enum TransitionError {
    NotFound,
    Conflict(String),
}

async fn transition_one(
    claims: &Claims,
    repo: &PayrollRepository,
    id: Uuid,
    target: PayrollStatus,
) -> Result<Result<Payroll, TransitionError>, AppError> {
    let found = repo
        .find_by_id(id)
        .await?
        .filter(|p| p.organization_id == claims.organization_id);
    let Some(payroll) = found else {
        return Ok(Err(TransitionError::NotFound));
    };

    if !payroll.status.can_transition_to(target) {
        return Ok(Err(TransitionError::Conflict(format!(
            "cannot transition from {} to {}",
            payroll.status, target
        ))));
    }

    match repo.transition(id, target, claims.sub).await? {
        Some(payroll) => Ok(Ok(payroll)),
        None => Ok(Err(TransitionError::Conflict(
            "status changed concurrently".to_string(),
        ))),
    }
}

/// Single-record transition; the target state comes from the route.
pub async fn transition_payroll(
    claims: Claims,
    repo: web::Data<PayrollRepository>,
    path: web::Path<(Uuid, PayrollStatus)>,
) -> Result<HttpResponse, AppError> {
    claims.require_hr()?;
    let (id, target) = path.into_inner();

    match transition_one(&claims, &repo, id, target).await? {
        Ok(payroll) => Ok(HttpResponse::Ok().json(ApiResponse::success(payroll))),
        Err(TransitionError::NotFound) => Err(AppError::not_found("Payroll")),
        Err(TransitionError::Conflict(reason)) => Err(AppError::Conflict(reason)),
    }
}

/// Bulk transition: each record is attempted independently and the summary
/// tallies per-record outcomes; one bad record never aborts the batch.
pub async fn bulk_transition(
    claims: Claims,
    repo: web::Data<PayrollRepository>,
    path: web::Path<PayrollStatus>,
    input: web::Json<BulkTransitionInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_hr()?;
    let target = path.into_inner();

    let mut summary = BulkTransitionSummary {
        succeeded: Vec::new(),
        failed: Vec::new(),
    };

    for id in &input.payroll_ids {
        match transition_one(&claims, &repo, *id, target).await? {
            Ok(payroll) => summary.succeeded.push(payroll.id),
            Err(err) => {
                let reason = match err {
                    TransitionError::NotFound => "not found".to_string(),
                    TransitionError::Conflict(reason) => reason,
                };
                summary.failed.push(BulkTransitionFailure {
                    payroll_id: *id,
                    reason,
                });
            }
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(summary)))
}

/// Delete a payroll that has not been paid out.
pub async fn delete_payroll(
    claims: Claims,
    repo: web::Data<PayrollRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    claims.require_hr()?;
    let payroll_id = path.into_inner();

    repo.find_by_id(payroll_id)
        .await?
        .filter(|p| p.organization_id == claims.organization_id)
        .ok_or_else(|| AppError::not_found("Payroll"))?;

    if repo.delete(payroll_id).await? {
        Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
            None,
            "Payroll deleted",
        )))
    } else {
        Err(AppError::Conflict(
            "Paid payrolls cannot be deleted".to_string(),
        ))
    }
}
