//! Auth route handlers.
//!
//! Local (email/password) and Google OAuth login, both producing a signed
//! bearer token plus the user profile.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::user::UserProfile;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login/registration response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserProfile,
}

/// Query parameters from the Google OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
}

/// Register a new account.
///
/// # Route
///
/// `POST /auth/register`
///
/// # Errors
///
/// Returns 400 for invalid fields, 409 when the email is taken.
#[instrument(skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .register(&body.username, &body.email, &body.password)
        .await?;

    let access_token = state.tokens().issue(&user)?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            access_token,
            user: UserProfile::from(&user),
        }),
    ))
}

/// Login with email and password.
///
/// # Route
///
/// `POST /auth/login`
///
/// # Errors
///
/// Returns 401 for unknown email or wrong password, indistinguishably.
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let auth = AuthService::new(state.pool());
    let user = auth.login(&body.email, &body.password).await?;

    let access_token = state.tokens().issue(&user)?;

    Ok(Json(LoginResponse {
        access_token,
        user: UserProfile::from(&user),
    }))
}

/// Return the authenticated caller's profile.
///
/// # Route
///
/// `GET /auth/me`
///
/// # Errors
///
/// Returns 401 without a valid bearer token.
#[instrument(skip(state))]
pub async fn me(
    RequireAuth(current): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>> {
    let auth = AuthService::new(state.pool());
    let user = auth.get_user(current.id).await?;

    Ok(Json(UserProfile::from(&user)))
}

/// Initiate Google OAuth login.
///
/// Issues a signed state parameter and redirects to Google's consent page.
///
/// # Route
///
/// `GET /auth/google`
///
/// # Errors
///
/// Returns 500 if the state parameter cannot be signed.
#[instrument(skip(state))]
pub async fn google(State(state): State<AppState>) -> Result<Redirect> {
    let oauth_state = state.tokens().issue_oauth_state()?;
    let redirect_uri = format!("{}/auth/google/callback", state.config().base_url);

    let auth_url = state.google().authorization_url(&redirect_uri, &oauth_state);

    Ok(Redirect::to(&auth_url))
}

/// Handle the Google OAuth callback.
///
/// Validates the state parameter, exchanges the authorization code, resolves
/// the Google profile to a local user, and redirects to the frontend with a
/// bearer token and the profile in the query string.
///
/// # Route
///
/// `GET /auth/google/callback`
#[instrument(skip(state, query))]
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let frontend = &state.config().frontend_url;

    // Check for OAuth errors from Google
    if let Some(error) = query.error {
        tracing::warn!("Google OAuth error: {error}");
        return Redirect::to(&format!("{frontend}/login?error=google_denied")).into_response();
    }

    // Verify we have an authorization code
    let Some(code) = query.code else {
        tracing::warn!("Google OAuth callback missing code");
        return Redirect::to(&format!("{frontend}/login?error=missing_code")).into_response();
    };

    // Verify the state parameter (CSRF protection)
    let Some(returned_state) = query.state else {
        tracing::warn!("Google OAuth callback missing state");
        return Redirect::to(&format!("{frontend}/login?error=missing_state")).into_response();
    };

    if state.tokens().verify_oauth_state(&returned_state).is_err() {
        tracing::warn!("Google OAuth state mismatch");
        return Redirect::to(&format!("{frontend}/login?error=invalid_state")).into_response();
    }

    // Exchange the code (must use the same redirect URI as the authorization request)
    let redirect_uri = format!("{}/auth/google/callback", state.config().base_url);
    let access_token = match state.google().exchange_code(&code, &redirect_uri).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to exchange Google OAuth code: {e}");
            return Redirect::to(&format!("{frontend}/login?error=token_exchange"))
                .into_response();
        }
    };

    let profile = match state.google().fetch_profile(&access_token).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("Failed to fetch Google profile: {e}");
            return Redirect::to(&format!("{frontend}/login?error=profile_fetch"))
                .into_response();
        }
    };

    let auth = AuthService::new(state.pool());
    let user = match auth.login_with_google(&profile).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Failed to resolve Google user: {e}");
            return Redirect::to(&format!("{frontend}/login?error=login_failed")).into_response();
        }
    };

    let token = match state.tokens().issue(&user) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to issue token: {e}");
            return Redirect::to(&format!("{frontend}/login?error=login_failed")).into_response();
        }
    };

    tracing::info!(user_id = %user.id, "Google login completed");

    // Hand the token and profile to the SPA exactly the way it expects them
    let user_json =
        serde_json::to_string(&UserProfile::from(&user)).unwrap_or_else(|_| "{}".to_string());
    let redirect = format!(
        "{frontend}/auth-callback?token={}&user={}",
        urlencoding::encode(&token),
        urlencoding::encode(&user_json)
    );

    Redirect::to(&redirect).into_response()
}
