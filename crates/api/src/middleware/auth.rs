//! Authentication middleware and extractors.
//!
//! Provides an extractor for requiring a valid bearer token in route handlers.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use ecomshop_core::UserId;

use crate::state::AppState;

/// The authenticated caller, as carried by the bearer token.
///
/// Handlers that need the full profile fetch it from the database; the token
/// alone identifies the caller for scoping queries.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
}

/// Extractor that requires a valid bearer token.
///
/// Rejects missing, malformed, expired, or wrongly-signed tokens with a
/// 401 JSON response.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but missing or invalid.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Unauthorized" })),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthRejection)?;

        let token = parse_bearer(header_value).ok_or(AuthRejection)?;

        let claims = state.tokens().verify(token).map_err(|_| AuthRejection)?;
        let id = claims.user_id().map_err(|_| AuthRejection)?;

        Ok(Self(CurrentUser {
            id,
            email: claims.email,
        }))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
fn parse_bearer(header_value: &str) -> Option<&str> {
    let token = header_value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}
