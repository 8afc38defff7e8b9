use actix_web::{HttpResponse, web};
use chrono::{Datelike, Utc};
use serde::Deserialize;

use crate::database::models::LeaveBalanceReportRow;
use crate::database::repositories::{LeaveBalanceRepository, StatsRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub year: Option<i32>,
}

const REPORT_HEADERS: [&str; 7] = [
    "Employee Name",
    "Email",
    "Leave Type",
    "Total Days",
    "Used Days",
    "Remaining Days",
    "Usage %",
];

fn render_csv(rows: &[LeaveBalanceReportRow]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(REPORT_HEADERS)
        .map_err(|e| AppError::internal(e.to_string()))?;

    for row in rows {
        writer
            .write_record([
                row.employee_name.as_str(),
                row.email.as_str(),
                row.leave_type.as_str(),
                &row.total_days.to_string(),
                &row.used_days.to_string(),
                &row.remaining_days.to_string(),
                &format!("{:.1}", row.usage_percent()),
            ])
            .map_err(|e| AppError::internal(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::internal(e.to_string()))
}

/// CSV export of the year's leave balances, one row per (employee, type).
pub async fn leave_balance_report(
    claims: Claims,
    repo: web::Data<LeaveBalanceRepository>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, AppError> {
    claims.require_hr()?;

    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let rows = repo.report_rows(claims.organization_id, year).await?;
    let csv = render_csv(&rows)?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"leave_balances_{year}.csv\""),
        ))
        .body(csv))
}

/// Headline counts for the landing dashboard.
pub async fn dashboard(
    claims: Claims,
    repo: web::Data<StatsRepository>,
) -> Result<HttpResponse, AppError> {
    claims.require_manager()?;

    let summary = repo.dashboard_summary(claims.organization_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(summary)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, used: i32, total: i32) -> LeaveBalanceReportRow {
        LeaveBalanceReportRow {
            employee_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            leave_type: "Annual".to_string(),
            total_days: total,
            used_days: used,
            remaining_days: total - used,
        }
    }

    #[test]
    fn csv_has_header_and_one_line_per_row() {
        let rows = vec![row("Alice", 5, 20), row("Bob", 0, 10)];
        let bytes = render_csv(&rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Employee Name,Email,Leave Type,Total Days,Used Days,Remaining Days,Usage %"
        );
        assert_eq!(lines[1], "Alice,alice@example.com,Annual,20,5,15,25.0");
        assert_eq!(lines[2], "Bob,bob@example.com,Annual,10,0,10,0.0");
    }

    #[test]
    fn csv_quotes_fields_with_commas() {
        let mut r = row("Smith, Jane", 2, 10);
        r.email = "jane@example.com".to_string();
        let text = String::from_utf8(render_csv(&[r]).unwrap()).unwrap();
        assert!(text.contains("\"Smith, Jane\""));
    }
}
