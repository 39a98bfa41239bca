use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Reader Router Module
///
/// All read endpoints. The router wraps this group in the authorization
/// guard with the `Reader` role as its declared requirement, so no handler
/// here re-checks roles.
pub fn reader_routes() -> Router<AppState> {
    Router::new()
        // GET /regions and GET /regions/{id}
        .route("/regions", get(handlers::get_regions))
        .route("/regions/{id}", get(handlers::get_region))
        // GET /walks?filterOn&filterQuery&sortBy&isAscending&pageNumber&pageSize
        // Listing supports filtering, sorting and pagination; unrecognized
        // field names are ignored.
        .route("/walks", get(handlers::get_walks))
        .route("/walks/{id}", get(handlers::get_walk))
        // GET /difficulties
        // Seeded reference data; read-only.
        .route("/difficulties", get(handlers::get_difficulties))
}
