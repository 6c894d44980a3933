//! Google OAuth client.
//!
//! Hand-rolled authorization-code flow over `reqwest`:
//!
//! 1. Generate the authorization URL with [`GoogleClient::authorization_url`]
//! 2. Redirect the user to Google's consent page
//! 3. Google redirects back with an authorization code
//! 4. Exchange it with [`GoogleClient::exchange_code`]
//! 5. Fetch the profile with [`GoogleClient::fetch_profile`]

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::config::GoogleConfig;
use crate::services::auth::AuthError;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Token response from Google's token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// The subset of the Google userinfo profile this system uses.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    /// Stable Google account id.
    pub id: String,
    /// Account email.
    pub email: String,
    /// Display name, when Google provides one.
    pub name: Option<String>,
}

/// Client for Google's OAuth 2.0 endpoints.
#[derive(Clone)]
pub struct GoogleClient {
    inner: Arc<GoogleClientInner>,
}

struct GoogleClientInner {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
}

impl GoogleClient {
    /// Create a new Google OAuth client.
    #[must_use]
    pub fn new(config: &GoogleConfig) -> Self {
        Self {
            inner: Arc::new(GoogleClientInner {
                client: reqwest::Client::new(),
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.expose_secret().to_string(),
            }),
        }
    }

    /// Generate the authorization URL for Google login.
    ///
    /// # Arguments
    ///
    /// * `redirect_uri` - The callback URL to redirect to after consent
    /// * `state` - Signed state parameter, verified on callback
    #[must_use]
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{AUTH_ENDPOINT}?\
            client_id={}&\
            response_type=code&\
            scope=openid%20email%20profile&\
            redirect_uri={}&\
            state={}",
            urlencoding::encode(&self.inner.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(state)
        )
    }

    /// Exchange an authorization code for an access token.
    ///
    /// # Arguments
    ///
    /// * `code` - The authorization code from the OAuth callback
    /// * `redirect_uri` - The same redirect URI used in the authorization request
    ///
    /// # Errors
    ///
    /// Returns `AuthError::OAuth` if the token exchange fails.
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<String, AuthError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", &self.inner.client_id),
            ("client_secret", &self.inner.client_secret),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];

        let response = self
            .inner
            .client
            .post(TOKEN_ENDPOINT)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::OAuth(format!("token exchange failed: {e}")))?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AuthError::OAuth(format!("token exchange failed: {text}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::OAuth(format!("invalid token response: {e}")))?;

        Ok(token.access_token)
    }

    /// Fetch the user profile for an access token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::OAuth` if the userinfo request fails.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<GoogleProfile, AuthError> {
        let response = self
            .inner
            .client
            .get(USERINFO_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::OAuth(format!("userinfo request failed: {e}")))?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AuthError::OAuth(format!("userinfo request failed: {text}")));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::OAuth(format!("invalid userinfo response: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn client() -> GoogleClient {
        GoogleClient::new(&GoogleConfig {
            client_id: "test-client".to_string(),
            client_secret: SecretString::from("shh"),
        })
    }

    #[test]
    fn test_authorization_url_encodes_params() {
        let url = client().authorization_url("http://localhost:3000/auth/google/callback", "st&te");

        assert!(url.starts_with(AUTH_ENDPOINT));
        assert!(url.contains("client_id=test-client"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fauth%2Fgoogle%2Fcallback"));
        assert!(url.contains("state=st%26te"));
        assert!(url.contains("scope=openid%20email%20profile"));
    }

    #[test]
    fn test_profile_deserializes_without_name() {
        let profile: GoogleProfile =
            serde_json::from_str(r#"{"id":"sub-1","email":"a@b.c"}"#).unwrap();
        assert_eq!(profile.id, "sub-1");
        assert!(profile.name.is_none());
    }
}
