use actix_web::web;

use crate::handlers::projects;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/projects")
            .route("", web::post().to(projects::create_project))
            .route("", web::get().to(projects::list_projects))
            .route("/{id}", web::get().to(projects::get_project))
            .route("/{id}", web::put().to(projects::update_project))
            .route("/{id}", web::delete().to(projects::delete_project))
            .route("/{id}/tasks", web::post().to(projects::create_task))
            .route("/{id}/tasks", web::get().to(projects::list_tasks))
            .route(
                "/{id}/tasks/{task_id}",
                web::put().to(projects::update_task),
            )
            .route(
                "/{id}/tasks/{task_id}",
                web::delete().to(projects::delete_task),
            )
            .route("/{id}/members", web::post().to(projects::add_member))
            .route("/{id}/members", web::get().to(projects::list_members))
            .route(
                "/{id}/members/{user_id}",
                web::delete().to(projects::remove_member),
            ),
    );
}
