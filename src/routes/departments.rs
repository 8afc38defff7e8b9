use actix_web::web;

use crate::handlers::departments;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/departments")
            .route("", web::post().to(departments::create_department))
            .route("", web::get().to(departments::list_departments))
            .route("/{id}", web::get().to(departments::get_department))
            .route("/{id}", web::put().to(departments::update_department))
            .route("/{id}", web::delete().to(departments::delete_department)),
    );
}
