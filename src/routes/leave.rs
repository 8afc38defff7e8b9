use actix_web::web;

use crate::handlers::{leave, leave_balances, leave_types};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/leave-types")
            .route("", web::post().to(leave_types::create_leave_type))
            .route("", web::get().to(leave_types::list_leave_types))
            .route("/{id}", web::put().to(leave_types::update_leave_type))
            .route("/{id}", web::delete().to(leave_types::delete_leave_type)),
    );
    cfg.service(
        web::scope("/leave-balances")
            .route("", web::get().to(leave_balances::list_balances))
            .route("/init", web::post().to(leave_balances::init_year)),
    );
    cfg.service(
        web::scope("/leave")
            .route("", web::post().to(leave::apply))
            .route("", web::get().to(leave::list_leave))
            .route("/{id}", web::get().to(leave::get_leave))
            .route("/{id}", web::delete().to(leave::delete_leave))
            .route("/{id}/approve", web::post().to(leave::approve))
            .route("/{id}/reject", web::post().to(leave::reject))
            .route("/{id}/cancel", web::post().to(leave::cancel)),
    );
}
