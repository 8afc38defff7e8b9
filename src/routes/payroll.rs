use actix_web::web;

use crate::handlers::payroll;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payroll")
            .route("", web::post().to(payroll::create_payroll))
            .route("", web::get().to(payroll::list_payrolls))
            .route(
                "/bulk/{status}",
                web::post().to(payroll::bulk_transition),
            )
            .route("/{id}", web::get().to(payroll::get_payroll))
            .route("/{id}", web::delete().to(payroll::delete_payroll))
            .route(
                "/{id}/transition/{status}",
                web::post().to(payroll::transition_payroll),
            ),
    );
}
