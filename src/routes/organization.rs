use actix_web::web;

use crate::handlers::organization;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/organization")
            .route("", web::get().to(organization::get_organization))
            .route("", web::put().to(organization::update_organization)),
    );
}
