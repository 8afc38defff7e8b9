use actix_web::web;

use crate::handlers::{documents, employees};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/employees")
            .route("", web::post().to(employees::create_employee))
            .route("", web::get().to(employees::list_employees))
            .route("/{id}", web::get().to(employees::get_employee))
            .route("/{id}", web::put().to(employees::update_employee))
            .route(
                "/{id}/status",
                web::post().to(employees::transition_employee_status),
            )
            .route(
                "/{id}/documents",
                web::post().to(documents::upload_document),
            )
            .route("/{id}/documents", web::get().to(documents::list_documents)),
    );
}
