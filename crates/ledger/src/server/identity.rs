use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use interface::Identity;
use tracing::warn;

use super::error::ApiError;
use super::AppState;
use crate::auth::verify_token;

/// Caller identity taken from `Authorization: Bearer <jwt>`.
///
/// No header means an anonymous caller. A header that does not carry a
/// valid token is rejected outright.
pub struct Caller(pub Option<Identity>);

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Caller(None));
        };

        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::InvalidToken)?;

        let Some(secret) = state.jwt_secret.as_deref() else {
            warn!("Bearer token presented but LEDGER_JWT_SECRET is not configured");
            return Err(ApiError::InvalidToken);
        };

        verify_token(token, secret).map(|identity| Caller(Some(identity))).map_err(|e| {
            warn!("Rejected bearer token: {}", e);
            ApiError::InvalidToken
        })
    }
}
