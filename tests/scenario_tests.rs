//! End-to-end scenarios against a real per-test Postgres database.
//!
//! `#[sqlx::test]` provisions a fresh database for each test and applies the
//! migrations, so every scenario starts from an empty schema and drives the
//! API the way a client would.

use actix_web::{App, http::StatusCode, test};
use chrono::Utc;
use pretty_assertions::assert_eq;
use serde_json::json;
use sqlx::PgPool;
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

macro_rules! post_json {
    ($app:expr, $uri:expr, $token:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri($uri)
            .insert_header(("Authorization", format!("Bearer {}", $token)))
            .set_json($body)
            .to_request();
        let resp = test::call_service(&$app, req).await;
        let status = resp.status();
        let body: serde_json::Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

macro_rules! get_json {
    ($app:expr, $uri:expr, $token:expr) => {{
        let req = test::TestRequest::get()
            .uri($uri)
            .insert_header(("Authorization", format!("Bearer {}", $token)))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        let status = resp.status();
        let body: serde_json::Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

struct Workspace {
    admin_token: String,
    organization_id: Uuid,
}

// Register an organization through the API. Signup seeds the default leave
// types and departments, so the returned workspace is ready for use.
macro_rules! register_workspace {
    ($app:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({
                "organizationName": "Globex",
                "name": "Ada Admin",
                "email": "admin@globex.test",
                "password": "correct-horse",
            }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: serde_json::Value = test::read_body_json(resp).await;
        Workspace {
            admin_token: body["data"]["token"].as_str().unwrap().to_string(),
            organization_id: body["data"]["organization"]["id"]
                .as_str()
                .unwrap()
                .parse()
                .unwrap(),
        }
    }};
}

async fn annual_leave_type_id(pool: &PgPool, organization_id: Uuid) -> Uuid {
    sqlx::query_scalar("SELECT id FROM leave_types WHERE organization_id = $1 AND name = 'Annual'")
        .bind(organization_id)
        .fetch_one(pool)
        .await
        .expect("seeded Annual leave type")
}

async fn balance_row(pool: &PgPool, user_id: Uuid, leave_type_id: Uuid) -> (i32, i32, i32) {
    sqlx::query_as(
        "SELECT total_days, used_days, remaining_days FROM leave_balances \
         WHERE user_id = $1 AND leave_type_id = $2 AND year = 2024",
    )
    .bind(user_id)
    .bind(leave_type_id)
    .fetch_one(pool)
    .await
    .expect("balance row")
}

#[sqlx::test]
async fn approval_charges_the_balance_but_applying_does_not(pool: PgPool) {
    let ctx = common::TestContext::with_pool(pool.clone());
    let app = test_app!(ctx);
    let ws = register_workspace!(app);

    let (status, body) = post_json!(
        &app,
        "/api/v1/users",
        ws.admin_token,
        json!({
            "email": "erin@globex.test",
            "password": "erin-password",
            "name": "Erin Employee",
            "role": "employee",
        })
    );
    assert_eq!(status, StatusCode::CREATED);
    let employee_id: Uuid = body["data"]["id"].as_str().unwrap().parse().unwrap();
    let employee_token = ctx.token_for(employee_id, ws.organization_id, Role::Employee);

    let (status, _) = post_json!(
        &app,
        "/api/v1/leave-balances/init",
        ws.admin_token,
        json!({ "year": 2024 })
    );
    assert_eq!(status, StatusCode::OK);

    let annual = annual_leave_type_id(&pool, ws.organization_id).await;
    sqlx::query(
        "UPDATE leave_balances SET used_days = 5, remaining_days = 15 \
         WHERE user_id = $1 AND leave_type_id = $2 AND year = 2024",
    )
    .bind(employee_id)
    .bind(annual)
    .execute(&pool)
    .await
    .unwrap();

    let (status, body) = post_json!(
        &app,
        "/api/v1/leave",
        employee_token,
        json!({
            "leaveTypeId": annual,
            "startDate": "2024-06-03",
            "endDate": "2024-06-05",
            "reason": "long weekend",
        })
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], json!("pending"));
    assert_eq!(body["data"]["totalDays"], json!(3));
    let request_id = body["data"]["id"].as_str().unwrap().to_string();

    // Applying reserves nothing; the balance moves only on approval.
    assert_eq!(balance_row(&pool, employee_id, annual).await, (20, 5, 15));

    let (status, body) = post_json!(
        &app,
        &format!("/api/v1/leave/{request_id}/approve"),
        ws.admin_token,
        json!({ "note": "enjoy" })
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("approved"));

    assert_eq!(balance_row(&pool, employee_id, annual).await, (20, 8, 12));
}

#[sqlx::test]
async fn overlapping_leave_applications_conflict(pool: PgPool) {
    let ctx = common::TestContext::with_pool(pool.clone());
    let app = test_app!(ctx);
    let ws = register_workspace!(app);

    let (status, _) = post_json!(
        &app,
        "/api/v1/leave-balances/init",
        ws.admin_token,
        json!({ "year": 2024 })
    );
    assert_eq!(status, StatusCode::OK);

    let annual = annual_leave_type_id(&pool, ws.organization_id).await;
    let (status, _) = post_json!(
        &app,
        "/api/v1/leave",
        ws.admin_token,
        json!({
            "leaveTypeId": annual,
            "startDate": "2024-03-01",
            "endDate": "2024-03-05",
        })
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json!(
        &app,
        "/api/v1/leave",
        ws.admin_token,
        json!({
            "leaveTypeId": annual,
            "startDate": "2024-03-04",
            "endDate": "2024-03-08",
        })
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], json!(false));
}

#[sqlx::test]
async fn overlap_exclusion_holds_at_the_database_level(pool: PgPool) {
    let ctx = common::TestContext::with_pool(pool.clone());
    let app = test_app!(ctx);
    let ws = register_workspace!(app);

    let (status, _) = post_json!(
        &app,
        "/api/v1/leave-balances/init",
        ws.admin_token,
        json!({ "year": 2024 })
    );
    assert_eq!(status, StatusCode::OK);

    let annual = annual_leave_type_id(&pool, ws.organization_id).await;
    let (status, body) = post_json!(
        &app,
        "/api/v1/leave",
        ws.admin_token,
        json!({
            "leaveTypeId": annual,
            "startDate": "2024-03-01",
            "endDate": "2024-03-05",
        })
    );
    assert_eq!(status, StatusCode::CREATED);
    let user_id: Uuid = body["data"]["userId"].as_str().unwrap().parse().unwrap();

    // A writer that skips the application-level check still cannot land an
    // overlapping live request.
    let now = Utc::now();
    let err = sqlx::query(
        "INSERT INTO leave_requests \
         (id, organization_id, user_id, leave_type_id, start_date, end_date, \
          total_days, status, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, '2024-03-04', '2024-03-08', 5, 'pending', $5, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(ws.organization_id)
    .bind(user_id)
    .bind(annual)
    .bind(now)
    .execute(&pool)
    .await
    .expect_err("exclusion constraint");

    match err {
        sqlx::Error::Database(db) => assert_eq!(db.code().as_deref(), Some("23P01")),
        other => panic!("expected a database error, got {other}"),
    }
}

#[sqlx::test]
async fn draft_payroll_cannot_skip_to_processed(pool: PgPool) {
    let ctx = common::TestContext::with_pool(pool.clone());
    let app = test_app!(ctx);
    let ws = register_workspace!(app);

    let (status, body) = post_json!(
        &app,
        "/api/v1/users",
        ws.admin_token,
        json!({
            "email": "pat@globex.test",
            "password": "pat-password",
            "name": "Pat Payee",
            "role": "employee",
        })
    );
    assert_eq!(status, StatusCode::CREATED);
    let user_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = post_json!(
        &app,
        "/api/v1/employees",
        ws.admin_token,
        json!({
            "userId": user_id,
            "employeeCode": "EMP-001",
            "designation": "Engineer",
            "basicSalary": "50000",
            "hireDate": "2023-01-09",
        })
    );
    assert_eq!(status, StatusCode::CREATED);
    let employee_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = post_json!(
        &app,
        "/api/v1/payroll",
        ws.admin_token,
        json!({
            "employeeId": employee_id,
            "month": 1,
            "year": 2024,
            "basicSalary": "50000",
            "components": [
                { "name": "Transport", "kind": "earning", "amount": "2000" },
            ],
        })
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], json!("draft"));
    let payroll_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = post_json!(
        &app,
        &format!("/api/v1/payroll/{payroll_id}/transition/processed"),
        ws.admin_token,
        json!({})
    );
    assert_eq!(status, StatusCode::CONFLICT);

    // The failed transition left the record untouched.
    let (status, body) = get_json!(
        &app,
        &format!("/api/v1/payroll/{payroll_id}"),
        ws.admin_token
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("draft"));
    assert_eq!(body["data"]["processedBy"], json!(null));
    assert_eq!(body["data"]["processedAt"], json!(null));
}

#[sqlx::test]
async fn second_check_in_on_the_same_day_conflicts(pool: PgPool) {
    let ctx = common::TestContext::with_pool(pool.clone());
    let app = test_app!(ctx);
    let ws = register_workspace!(app);

    let (status, body) = post_json!(
        &app,
        "/api/v1/attendance/check-in",
        ws.admin_token,
        json!({})
    );
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["checkIn"].is_string());

    let (status, body) = post_json!(
        &app,
        "/api/v1/attendance/check-in",
        ws.admin_token,
        json!({})
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], json!(false));
}

#[sqlx::test]
async fn login_rejects_a_wrong_password_but_accepts_the_right_one(pool: PgPool) {
    let ctx = common::TestContext::with_pool(pool.clone());
    let app = test_app!(ctx);
    let _ws = register_workspace!(app);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({
            "email": "admin@globex.test",
            "password": "wrong-horse",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({
            "email": "admin@globex.test",
            "password": "correct-horse",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["data"]["token"].is_string());
}
