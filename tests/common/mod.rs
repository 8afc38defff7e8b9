#![allow(dead_code)]

use actix_web::web;
use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use jsonwebtoken::{EncodingKey, Header, encode};
use sqlx::postgres::PgPoolOptions;
use tempfile::TempDir;
use uuid::Uuid;

use hrms_be::Config;
use hrms_be::database::models::Role;
use hrms_be::database::repositories::{
    AttendanceRepository, DepartmentRepository, DocumentRepository, EmployeeRepository,
    LeaveBalanceRepository, LeaveRepository, LeaveTypeRepository, OrganizationRepository,
    PayrollRepository, ProjectRepository, StatsRepository, UserRepository,
};
use hrms_be::services::{AuthService, Claims, DocumentStore};

/// Everything a test app needs. The pool connects lazily, so tests that never
/// reach the database (auth, validation, role checks) run without Postgres.
pub struct TestContext {
    pub config: Config,
    pub pool: sqlx::PgPool,
    _upload_dir: TempDir,
    upload_path: std::path::PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let config = Config::test_config();
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy(&config.database_url)
            .expect("lazy pool");
        Self::with_config_and_pool(config, pool)
    }

    /// Build the context around an externally managed pool, e.g. the
    /// per-test database that `#[sqlx::test]` provisions.
    pub fn with_pool(pool: sqlx::PgPool) -> Self {
        Self::with_config_and_pool(Config::test_config(), pool)
    }

    /// A pool pointed at a port nothing listens on. Requests that reach the
    /// database fail with a connection error instead of hanging.
    pub fn unreachable_db() -> Self {
        let config = Config::test_config();
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy("postgres://127.0.0.1:1/hrms_test")
            .expect("lazy pool");
        Self::with_config_and_pool(config, pool)
    }

    fn with_config_and_pool(config: Config, pool: sqlx::PgPool) -> Self {
        let upload_dir = TempDir::new().expect("temp upload dir");
        let upload_path = upload_dir.path().to_path_buf();

        Self {
            config,
            pool,
            _upload_dir: upload_dir,
            upload_path,
        }
    }

    /// Register config, service, and repository data on the app under test.
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        let user_repository = UserRepository::new(self.pool.clone());
        let organization_repository = OrganizationRepository::new(self.pool.clone());
        let department_repository = DepartmentRepository::new(self.pool.clone());
        let leave_type_repository = LeaveTypeRepository::new(self.pool.clone());

        let auth_service = AuthService::new(
            self.config.clone(),
            self.pool.clone(),
            user_repository.clone(),
            organization_repository.clone(),
            leave_type_repository.clone(),
            department_repository.clone(),
        );

        cfg.app_data(web::Data::new(self.config.clone()))
            .app_data(web::Data::new(auth_service))
            .app_data(web::Data::new(DocumentStore::new(&self.upload_path)))
            .app_data(web::Data::new(user_repository))
            .app_data(web::Data::new(organization_repository))
            .app_data(web::Data::new(department_repository))
            .app_data(web::Data::new(leave_type_repository))
            .app_data(web::Data::new(EmployeeRepository::new(self.pool.clone())))
            .app_data(web::Data::new(AttendanceRepository::new(self.pool.clone())))
            .app_data(web::Data::new(LeaveRepository::new(self.pool.clone())))
            .app_data(web::Data::new(LeaveBalanceRepository::new(
                self.pool.clone(),
            )))
            .app_data(web::Data::new(PayrollRepository::new(self.pool.clone())))
            .app_data(web::Data::new(ProjectRepository::new(self.pool.clone())))
            .app_data(web::Data::new(DocumentRepository::new(self.pool.clone())))
            .app_data(web::Data::new(StatsRepository::new(self.pool.clone())));
    }

    /// Mint a token for a fresh user of the given role.
    pub fn token(&self, role: Role) -> String {
        self.token_for(Uuid::new_v4(), Uuid::new_v4(), role)
    }

    pub fn token_for(&self, user_id: Uuid, organization_id: Uuid, role: Role) -> String {
        let claims = Claims {
            sub: user_id,
            email: SafeEmail().fake(),
            organization_id,
            role,
            exp: (Utc::now() + Duration::days(1)).timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )
        .expect("token")
    }

    /// A token that expired an hour ago.
    pub fn expired_token(&self) -> String {
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: SafeEmail().fake(),
            organization_id: Uuid::new_v4(),
            role: Role::Admin,
            exp: (Utc::now() - Duration::hours(1)).timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )
        .expect("token")
    }
}
