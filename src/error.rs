use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// The opaque message returned for any unhandled failure. Internal detail is
/// logged against the correlation id, never sent to the caller.
pub const OPAQUE_ERROR_MESSAGE: &str = "Something went wrong! We are looking into resolving this.";

/// FieldViolation
///
/// A single field-level validation failure. The full set for a request is
/// collected before responding, so the caller gets every violation in one
/// round trip.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// ApiError
///
/// The error taxonomy every handler speaks: validation and authentication
/// failures are client errors, authorization denials are 403, missing rows
/// are 404, and everything else is converted to an opaque 500 by the
/// `Internal` rendering path.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldViolation>),
    #[error("{0}")]
    BadRequest(String),
    #[error("insufficient role")]
    Forbidden,
    #[error("resource not found")]
    NotFound,
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Collects every entry of a validation report into field violations.
    pub fn from_report(report: &garde::Report) -> Self {
        let violations = report
            .iter()
            .map(|(path, error)| FieldViolation::new(path.to_string(), error.to_string()))
            .collect();
        Self::Validation(violations)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

/// ErrorEnvelope
///
/// Fixed-shape body for unhandled failures: a correlation id the caller can
/// quote back, and a message that leaks nothing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub id: Uuid,
    pub error_message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(violations) => {
                // Group violations per field, ModelState-style.
                let mut errors: BTreeMap<String, Vec<String>> = BTreeMap::new();
                for violation in violations {
                    errors.entry(violation.field).or_default().push(violation.message);
                }
                (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "errors": errors })),
                )
                    .into_response()
            }
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
            Self::NotFound => StatusCode::NOT_FOUND.into_response(),
            Self::Internal(detail) => internal_error_response(&detail),
        }
    }
}

/// internal_error_response
///
/// The Error Boundary: assigns a fresh correlation id, logs it with the
/// failure detail, and returns the opaque envelope.
pub fn internal_error_response(detail: &str) -> Response {
    let id = Uuid::new_v4();
    tracing::error!("{id}: {detail}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorEnvelope {
            id,
            error_message: OPAQUE_ERROR_MESSAGE.to_string(),
        }),
    )
        .into_response()
}

/// handle_panic
///
/// Panic hook for the outermost catch-panic layer; routes panics through the
/// same boundary as propagated errors.
pub fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    internal_error_response(&detail)
}
