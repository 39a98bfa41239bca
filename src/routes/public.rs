use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a bearer token: the health probe and the two
/// identity-flow endpoints. Everything else in the API sits behind a
/// role-gated route group.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Unauthenticated liveness probe for monitors and load balancers.
        .route("/health", get(|| async { "ok" }))
        // POST /auth/register
        // Creates an account with its role assignments.
        .route("/auth/register", post(handlers::register))
        // POST /auth/login
        // Verifies credentials and returns the bearer token used on all
        // subsequent requests.
        .route("/auth/login", post(handlers::login))
}
