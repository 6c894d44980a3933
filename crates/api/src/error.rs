//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers should return
//! `Result<T, AppError>`. Responses are JSON `{ "message": ... }` bodies with
//! conventional status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::razorpay::GatewayError;
use crate::services::auth::AuthError;
use crate::services::orders::OrderError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Payment gateway operation failed.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Order operation failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Gateway(_) => StatusCode::BAD_GATEWAY,
            Self::Auth(err) => auth_status(err),
            Self::Order(err) => order_status(err),
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message. Internal details are never exposed.
    fn message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Gateway(_) => "Payment gateway error".to_string(),
            Self::Auth(err) => auth_message(err),
            Self::Order(err) => order_message(err),
            Self::NotFound(msg) | Self::Unauthorized(msg) | Self::BadRequest(msg) => msg.clone(),
        }
    }
}

fn auth_status(err: &AuthError) -> StatusCode {
    match err {
        AuthError::InvalidCredentials | AuthError::UserNotFound | AuthError::InvalidToken => {
            StatusCode::UNAUTHORIZED
        }
        AuthError::UserAlreadyExists => StatusCode::CONFLICT,
        AuthError::WeakPassword(_) | AuthError::InvalidEmail(_) | AuthError::InvalidUsername(_) => {
            StatusCode::BAD_REQUEST
        }
        AuthError::OAuth(_) => StatusCode::BAD_GATEWAY,
        AuthError::TokenSigning(_) | AuthError::Repository(_) | AuthError::PasswordHash => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn auth_message(err: &AuthError) -> String {
    match err {
        AuthError::InvalidCredentials | AuthError::UserNotFound => {
            "Invalid credentials".to_string()
        }
        AuthError::InvalidToken => "Invalid or expired token".to_string(),
        AuthError::UserAlreadyExists => {
            "An account with this email already exists".to_string()
        }
        AuthError::WeakPassword(msg) | AuthError::InvalidUsername(msg) => msg.clone(),
        AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
        AuthError::OAuth(_) => "Authentication with the identity provider failed".to_string(),
        AuthError::TokenSigning(_) | AuthError::Repository(_) | AuthError::PasswordHash => {
            "Internal server error".to_string()
        }
    }
}

fn order_status(err: &OrderError) -> StatusCode {
    match err {
        OrderError::EmptyCart | OrderError::Amount(_) => StatusCode::BAD_REQUEST,
        OrderError::NotFound => StatusCode::NOT_FOUND,
        OrderError::DuplicateOrder => StatusCode::CONFLICT,
        OrderError::Gateway(_) => StatusCode::BAD_GATEWAY,
        OrderError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn order_message(err: &OrderError) -> String {
    match err {
        OrderError::EmptyCart => "No items in cart".to_string(),
        OrderError::NotFound => "Order not found".to_string(),
        OrderError::DuplicateOrder => {
            "An order already exists for this gateway order id".to_string()
        }
        OrderError::Amount(_) => "Invalid order amount".to_string(),
        OrderError::Gateway(_) => "Payment gateway error".to_string(),
        OrderError::Repository(_) => "Internal server error".to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() || status == StatusCode::BAD_GATEWAY {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = Json(json!({ "message": self.message() }));
        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
