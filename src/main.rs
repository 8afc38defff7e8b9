use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;

use hrms_be::database::{
    init_database,
    repositories::{
        AttendanceRepository, DepartmentRepository, DocumentRepository, EmployeeRepository,
        LeaveBalanceRepository, LeaveRepository, LeaveTypeRepository, OrganizationRepository,
        PayrollRepository, ProjectRepository, StatsRepository, UserRepository,
    },
};
use hrms_be::middleware::RequestIdMiddleware;
use hrms_be::routes;
use hrms_be::services::{AuthService, DocumentStore};
use hrms_be::Config;

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("HRMS API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    log::info!("Configuration loaded (environment: {})", config.environment);

    let pool = init_database(&config.database_url).await?;
    log::info!("Database initialized");

    let user_repository = UserRepository::new(pool.clone());
    let organization_repository = OrganizationRepository::new(pool.clone());
    let department_repository = DepartmentRepository::new(pool.clone());
    let employee_repository = EmployeeRepository::new(pool.clone());
    let attendance_repository = AttendanceRepository::new(pool.clone());
    let leave_type_repository = LeaveTypeRepository::new(pool.clone());
    let leave_repository = LeaveRepository::new(pool.clone());
    let leave_balance_repository = LeaveBalanceRepository::new(pool.clone());
    let payroll_repository = PayrollRepository::new(pool.clone());
    let project_repository = ProjectRepository::new(pool.clone());
    let document_repository = DocumentRepository::new(pool.clone());
    let stats_repository = StatsRepository::new(pool.clone());

    let auth_service = AuthService::new(
        config.clone(),
        pool.clone(),
        user_repository.clone(),
        organization_repository.clone(),
        leave_type_repository.clone(),
        department_repository.clone(),
    );
    let document_store = DocumentStore::new(&config.upload_dir);

    let config_data = web::Data::new(config.clone());
    let auth_service_data = web::Data::new(auth_service);
    let document_store_data = web::Data::new(document_store);
    let user_repo_data = web::Data::new(user_repository);
    let organization_repo_data = web::Data::new(organization_repository);
    let department_repo_data = web::Data::new(department_repository);
    let employee_repo_data = web::Data::new(employee_repository);
    let attendance_repo_data = web::Data::new(attendance_repository);
    let leave_type_repo_data = web::Data::new(leave_type_repository);
    let leave_repo_data = web::Data::new(leave_repository);
    let leave_balance_repo_data = web::Data::new(leave_balance_repository);
    let payroll_repo_data = web::Data::new(payroll_repository);
    let project_repo_data = web::Data::new(project_repository);
    let document_repo_data = web::Data::new(document_repository);
    let stats_repo_data = web::Data::new(stats_repository);

    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(config_data.clone())
            .app_data(auth_service_data.clone())
            .app_data(document_store_data.clone())
            .app_data(user_repo_data.clone())
            .app_data(organization_repo_data.clone())
            .app_data(department_repo_data.clone())
            .app_data(employee_repo_data.clone())
            .app_data(attendance_repo_data.clone())
            .app_data(leave_type_repo_data.clone())
            .app_data(leave_repo_data.clone())
            .app_data(leave_balance_repo_data.clone())
            .app_data(payroll_repo_data.clone())
            .app_data(project_repo_data.clone())
            .app_data(document_repo_data.clone())
            .app_data(stats_repo_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin("http://localhost:3000")
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .max_age(3600),
            )
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(hello)
            .service(health)
            .configure(routes::configure)
    })
    .bind(server_address)?
    .run()
    .await?;

    Ok(())
}
