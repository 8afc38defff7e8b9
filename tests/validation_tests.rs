use actix_web::{App, http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use hrms_be::database::models::Role;
use hrms_be::routes;

mod common;

macro_rules! test_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .configure(|cfg| $ctx.register(cfg))
                .configure(routes::configure),
        )
        .await
    };
}

macro_rules! assert_validation_error {
    ($app:expr, $token:expr, $req:expr, $field:expr) => {{
        let req = $req
            .insert_header(("Authorization", format!("Bearer {}", $token)))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(
            resp.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "field: {}",
            $field
        );

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(false));
        assert!(
            body["errors"][$field].is_array(),
            "expected error for field {}, got {}",
            $field,
            body["errors"]
        );
    }};
}

#[actix_web::test]
async fn payroll_rejects_out_of_range_month() {
    let ctx = common::TestContext::new();
    let app = test_app!(ctx);
    let token = ctx.token(Role::Hr);

    assert_validation_error!(
        app,
        token,
        test::TestRequest::post().uri("/api/v1/payroll").set_json(json!({
            "employeeId": Uuid::new_v4(),
            "month": 13,
            "year": 2026,
            "basicSalary": "3000",
        })),
        "month"
    );
}

#[actix_web::test]
async fn payroll_rejects_negative_amounts() {
    let ctx = common::TestContext::new();
    let app = test_app!(ctx);
    let token = ctx.token(Role::Hr);

    assert_validation_error!(
        app,
        token,
        test::TestRequest::post().uri("/api/v1/payroll").set_json(json!({
            "employeeId": Uuid::new_v4(),
            "month": 3,
            "year": 2026,
            "basicSalary": "-1",
        })),
        "basicSalary"
    );

    assert_validation_error!(
        app,
        token,
        test::TestRequest::post().uri("/api/v1/payroll").set_json(json!({
            "employeeId": Uuid::new_v4(),
            "month": 3,
            "year": 2026,
            "basicSalary": "3000",
            "components": [
                { "name": "Tax", "kind": "deduction", "amount": "-50" },
            ],
        })),
        "components[0].amount"
    );
}

#[actix_web::test]
async fn manual_attendance_rejects_reversed_stamps() {
    let ctx = common::TestContext::new();
    let app = test_app!(ctx);
    let token = ctx.token(Role::Hr);

    assert_validation_error!(
        app,
        token,
        test::TestRequest::post().uri("/api/v1/attendance").set_json(json!({
            "userId": Uuid::new_v4(),
            "workDate": "2026-03-04",
            "checkIn": "2026-03-04T17:00:00Z",
            "checkOut": "2026-03-04T09:00:00Z",
        })),
        "checkOut"
    );
}

#[actix_web::test]
async fn leave_rejects_reversed_dates() {
    let ctx = common::TestContext::new();
    let app = test_app!(ctx);
    let token = ctx.token(Role::Employee);

    assert_validation_error!(
        app,
        token,
        test::TestRequest::post().uri("/api/v1/leave").set_json(json!({
            "leaveTypeId": Uuid::new_v4(),
            "startDate": "2026-03-10",
            "endDate": "2026-03-01",
        })),
        "endDate"
    );
}

#[actix_web::test]
async fn balance_init_rejects_implausible_years() {
    let ctx = common::TestContext::new();
    let app = test_app!(ctx);
    let token = ctx.token(Role::Hr);

    assert_validation_error!(
        app,
        token,
        test::TestRequest::post()
            .uri("/api/v1/leave-balances/init")
            .set_json(json!({ "year": 1800 })),
        "year"
    );
}

#[actix_web::test]
async fn employee_creation_rejects_blank_fields() {
    let ctx = common::TestContext::new();
    let app = test_app!(ctx);
    let token = ctx.token(Role::Hr);

    assert_validation_error!(
        app,
        token,
        test::TestRequest::post().uri("/api/v1/employees").set_json(json!({
            "userId": Uuid::new_v4(),
            "employeeCode": "   ",
            "designation": "Engineer",
            "basicSalary": "3000",
            "hireDate": "2026-01-15",
        })),
        "employeeCode"
    );
}

#[actix_web::test]
async fn organization_rename_rejects_blank_name() {
    let ctx = common::TestContext::new();
    let app = test_app!(ctx);
    let token = ctx.token(Role::Admin);

    assert_validation_error!(
        app,
        token,
        test::TestRequest::put()
            .uri("/api/v1/organization")
            .set_json(json!({ "name": "  " })),
        "name"
    );
}
