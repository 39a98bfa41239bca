use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::{config::AppConfig, error::ApiError};

/// The two role names the system recognizes. Readers may call read endpoints,
/// Writers may call mutating endpoints.
pub const ROLE_READER: &str = "Reader";
pub const ROLE_WRITER: &str = "Writer";

/// Required-role sets declared per route group in the router.
pub const READER_ROLES: &[&str] = &[ROLE_READER];
pub const WRITER_ROLES: &[&str] = &[ROLE_WRITER];

/// Claims
///
/// The payload signed into every access token: subject identity, one entry
/// per role, and the issuer/audience/expiry fields verified on each request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the username (used as email) of the bearer.
    pub sub: String,
    /// Role names granted at registration time.
    pub roles: Vec<String>,
    /// Issuer, must match the configured value on verification.
    pub iss: String,
    /// Audience, must match the configured value on verification.
    pub aud: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiry timestamp. The sole lifetime bound; there is no refresh or
    /// revocation mechanism.
    pub exp: i64,
}

/// issue_token
///
/// Mints a signed, time-bounded access token embedding the subject identity
/// and its role claims. HMAC-SHA256 with the server-held symmetric key.
pub fn issue_token(
    config: &AppConfig,
    username: &str,
    roles: Vec<String>,
) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: username.to_string(),
        roles,
        iss: config.jwt_issuer.clone(),
        aud: config.jwt_audience.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(config.token_expiry_minutes)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::internal(format!("token signing failed: {e}")))
}

/// verify_token
///
/// Validates signature, issuer, audience and expiry. Any failure means the
/// caller is treated as holding no roles.
pub fn verify_token(config: &AppConfig, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.jwt_issuer]);
    validation.set_audience(&[&config.jwt_audience]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

/// authorize
///
/// The per-route-group authorization guard. Extracts the bearer token,
/// verifies it, and grants access when the caller holds at least one of the
/// declared required roles. A missing, expired or unverifiable token is
/// treated identically to holding no roles: the request is denied with 403
/// and no further work happens.
pub async fn authorize(
    config: AppConfig,
    required: &'static [&'static str],
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = bearer_token(&req).and_then(|token| match verify_token(&config, token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            match e.kind() {
                ErrorKind::ExpiredSignature => tracing::debug!("rejected expired token"),
                kind => tracing::debug!("rejected token: {kind:?}"),
            }
            None
        }
    });

    let roles = claims.as_ref().map(|c| c.roles.as_slice()).unwrap_or_default();

    if required.iter().any(|r| roles.iter().any(|held| held == r)) {
        if let Some(claims) = &claims {
            tracing::debug!(user = %claims.sub, "authorized");
        }
        Ok(next.run(req).await)
    } else {
        Err(ApiError::Forbidden)
    }
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}
