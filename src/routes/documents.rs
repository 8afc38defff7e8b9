use actix_web::web;

use crate::handlers::documents;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/documents")
            .route(
                "/{id}/download",
                web::get().to(documents::download_document),
            )
            .route("/{id}", web::delete().to(documents::delete_document)),
    );
}
