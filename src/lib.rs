use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod credentials;
pub mod error;
pub mod handlers;
pub mod mappings;
pub mod models;
pub mod query;
pub mod repository;
pub mod storage;

// Module for routing segregation (Public, Reader, Writer).
pub mod routes;
use routes::{public, reader, writer};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point.
pub use config::AppConfig;
pub use repository::{PostgresRepository, RepositoryState};
pub use storage::{LocalImageStorage, MockImageStorage, StorageState};

/// AppState
///
/// The single, thread-safe, immutable container holding all application
/// services and configuration, shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Repository layer: abstracts database access.
    pub repo: RepositoryState,
    /// Storage layer: abstracts the image content root.
    pub storage: StorageState,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These allow handlers and middleware to pull individual components out of
// the shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routing structure, applies the per-group authorization
/// guards and the global observability and error-boundary layers, and
/// registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Per-group authorization guards. Each route group declares its
    // required role set once; the guard denies with 403 before any handler
    // (and therefore any storage access) runs.
    let reader_guard = middleware::from_fn({
        let config = state.config.clone();
        move |req: Request, next: Next| {
            let config = config.clone();
            async move { auth::authorize(config, auth::READER_ROLES, req, next).await }
        }
    });
    let writer_guard = middleware::from_fn({
        let config = state.config.clone();
        move |req: Request, next: Next| {
            let config = config.clone();
            async move { auth::authorize(config, auth::WRITER_ROLES, req, next).await }
        }
    });

    // Uploaded images are served read-only under the fixed /Images prefix.
    let images_dir = state.config.images_dir.clone();

    // 3. Base Router Assembly
    let base_router = Router::new()
        // Public routes: no guard.
        .merge(public::public_routes())
        // Read endpoints: Reader role required.
        .merge(reader::reader_routes().route_layer(reader_guard))
        // Mutating endpoints: Writer role required.
        .merge(writer::writer_routes().route_layer(writer_guard))
        // Static file serving for the image content root.
        .nest_service("/Images", ServeDir::new(images_dir))
        .with_state(state);

    // 4. Observability, Correlation and Error Boundary Layers
    base_router
        .layer(
            ServiceBuilder::new()
                // 4a. Request ID generation: a unique UUID per request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 4b. Request tracing: wraps the request/response lifecycle in
                // a span carrying the request id.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 4c. Request ID propagation back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id))
                // 4d. Error boundary for panics: anything a handler fails to
                // convert into a response becomes the opaque error envelope.
                .layer(CatchPanicLayer::custom(error::handle_panic)),
        )
        // 5. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes the `TraceLayer` span so every log line for a request carries
/// the method, URI and correlation id.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
