use crate::{AppState, handlers};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{post, put},
};

/// Writer Router Module
///
/// All mutating endpoints. The router wraps this group in the authorization
/// guard with the `Writer` role as its declared requirement.
pub fn writer_routes() -> Router<AppState> {
    Router::new()
        // POST /regions, PUT/DELETE /regions/{id}
        .route("/regions", post(handlers::create_region))
        .route(
            "/regions/{id}",
            put(handlers::update_region).delete(handlers::delete_region),
        )
        // POST /walks, PUT/DELETE /walks/{id}
        .route("/walks", post(handlers::create_walk))
        .route(
            "/walks/{id}",
            put(handlers::update_walk).delete(handlers::delete_walk),
        )
        // POST /images/upload
        // Multipart upload; the route-level body limit leaves headroom over
        // the 10MB file cap enforced by the handler.
        .route(
            "/images/upload",
            post(handlers::upload_image).layer(DefaultBodyLimit::max(12 * 1024 * 1024)),
        )
}
