//! HTTP handlers and route configuration.

mod feed;
mod health;
mod posts;
mod suggestions;
mod uploads;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::state::UPLOADS_PATH;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            // Feed
            .route("/posts", web::get().to(posts::list_posts))
            .route("/posts", web::post().to(posts::create_post))
            .route("/feed/events", web::get().to(feed::feed_events))
            // AI assistance
            .route(
                "/hashtags/suggestions",
                web::post().to(suggestions::suggest_hashtags),
            ),
    )
    .route(
        &format!("{}/{{file_name}}", UPLOADS_PATH),
        web::get().to(uploads::serve_upload),
    );
}
