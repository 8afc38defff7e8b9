use actix_web::web;

pub mod attendance;
pub mod auth;
pub mod departments;
pub mod documents;
pub mod employees;
pub mod leave;
pub mod organization;
pub mod payroll;
pub mod projects;
pub mod reports;
pub mod users;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(auth::configure)
            .configure(organization::configure)
            .configure(users::configure)
            .configure(departments::configure)
            .configure(employees::configure)
            .configure(attendance::configure)
            .configure(leave::configure)
            .configure(payroll::configure)
            .configure(projects::configure)
            .configure(documents::configure)
            .configure(reports::configure),
    );
}
