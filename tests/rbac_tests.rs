use actix_web::{App, http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::json;

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

macro_rules! assert_forbidden {
    ($app:expr, $token:expr, $req:expr, $what:expr) => {{
        let req = $req
            .insert_header(("Authorization", format!("Bearer {}", $token)))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{}", $what);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(false), "{}", $what);
    }};
}

#[actix_web::test]
async fn employees_cannot_reach_hr_surfaces() {
    let ctx = common::TestContext::new();
    let app = test_app!(ctx);
    let token = ctx.token(Role::Employee);

    assert_forbidden!(
        app,
        token,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({
                "email": "new@example.com",
                "password": "long enough password",
                "name": "New User",
            })),
        "create user"
    );

    assert_forbidden!(
        app,
        token,
        test::TestRequest::post()
            .uri("/api/v1/leave-types")
            .set_json(json!({ "name": "Study", "defaultDays": 5 })),
        "create leave type"
    );

    assert_forbidden!(
        app,
        token,
        test::TestRequest::post()
            .uri("/api/v1/leave-balances/init")
            .set_json(json!({ "year": 2026 })),
        "init balances"
    );

    assert_forbidden!(
        app,
        token,
        test::TestRequest::get().uri("/api/v1/payroll"),
        "list payrolls"
    );

    assert_forbidden!(
        app,
        token,
        test::TestRequest::get().uri("/api/v1/reports/leave-balances"),
        "export report"
    );

    assert_forbidden!(
        app,
        token,
        test::TestRequest::get().uri("/api/v1/users"),
        "list users"
    );
}

#[actix_web::test]
async fn managers_are_not_hr() {
    let ctx = common::TestContext::new();
    let app = test_app!(ctx);
    let token = ctx.token(Role::Manager);

    assert_forbidden!(
        app,
        token,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({
                "email": "new@example.com",
                "password": "long enough password",
                "name": "New User",
            })),
        "create user"
    );

    assert_forbidden!(
        app,
        token,
        test::TestRequest::post().uri("/api/v1/payroll").set_json(json!({
            "employeeId": uuid::Uuid::new_v4(),
            "month": 3,
            "year": 2026,
            "basicSalary": "3000",
        })),
        "create payroll"
    );
}

#[actix_web::test]
async fn hr_cannot_rename_the_organization() {
    let ctx = common::TestContext::new();
    let app = test_app!(ctx);
    let token = ctx.token(Role::Hr);

    assert_forbidden!(
        app,
        token,
        test::TestRequest::put()
            .uri("/api/v1/organization")
            .set_json(json!({ "name": "New Name" })),
        "rename organization"
    );
}

#[actix_web::test]
async fn hr_cannot_mint_admin_accounts() {
    let ctx = common::TestContext::new();
    let app = test_app!(ctx);
    let token = ctx.token(Role::Hr);

    assert_forbidden!(
        app,
        token,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({
                "email": "boss@example.com",
                "password": "long enough password",
                "name": "Boss",
                "role": "admin",
            })),
        "create admin"
    );
}
