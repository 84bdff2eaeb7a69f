use actix_web::web;

use crate::web::{handlers, pages};

/// JSON proxy under `/api`, the server-rendered wizard under `/wizard`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api").route("/generate", web::post().to(handlers::generate)))
        .service(
            web::scope("/wizard")
                .route("/next", web::post().to(pages::advance))
                .route("/back", web::post().to(pages::go_back))
                .route("/generate", web::post().to(pages::generate_prompt))
                .route("/modification/open", web::post().to(pages::open_modification))
                .route("/modification/cancel", web::post().to(pages::cancel_modification))
                .route("/modify", web::post().to(pages::modify_prompt))
                .route("/return", web::post().to(pages::return_to_input))
                .route("/reset", web::post().to(pages::reset)),
        )
        .route("/", web::get().to(pages::index))
        .route("/health", web::get().to(handlers::health_check));
}
