use actix_web::web;

use crate::handlers::reports;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route(
                "/leave-balances",
                web::get().to(reports::leave_balance_report),
            )
            .route("/dashboard", web::get().to(reports::dashboard)),
    );
}
