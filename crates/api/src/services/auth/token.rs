//! Bearer-token issuance and verification.
//!
//! Tokens are HS256 JWTs valid for 24 hours. The same signing key also backs
//! the short-lived OAuth state parameter, which stands in for a session-stored
//! CSRF nonce since this API keeps no server-side sessions.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ecomshop_core::UserId;

use super::AuthError;
use crate::models::user::User;

/// Access-token lifetime.
const TOKEN_TTL_HOURS: i64 = 24;

/// OAuth state lifetime - long enough to complete the Google redirect.
const STATE_TTL_MINUTES: i64 = 10;

/// Subject used for OAuth state tokens, distinguishing them from access tokens.
const STATE_SUBJECT: &str = "oauth-state";

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id, stringified.
    pub sub: String,
    /// User email at issuance time.
    pub email: String,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

impl Claims {
    /// The user id carried by the token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the subject is not a numeric id
    /// (e.g., an OAuth state token presented as an access token).
    pub fn user_id(&self) -> Result<UserId, AuthError> {
        self.sub
            .parse::<i32>()
            .map(UserId::new)
            .map_err(|_| AuthError::InvalidToken)
    }
}

/// JWT claims for the OAuth state parameter.
#[derive(Debug, Serialize, Deserialize)]
struct StateClaims {
    sub: String,
    jti: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies signed bearer tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    /// Create a token service from the configured signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Issue an access token for a user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenSigning` if signing fails.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Verify an access token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for malformed, expired, or
    /// wrongly-signed tokens.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }

    /// Issue a short-lived OAuth state parameter.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenSigning` if signing fails.
    pub fn issue_oauth_state(&self) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = StateClaims {
            sub: STATE_SUBJECT.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(STATE_TTL_MINUTES)).timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Verify an OAuth state parameter returned by the callback.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::OAuth` if the state is missing, expired, or was
    /// not issued by this service.
    pub fn verify_oauth_state(&self, state: &str) -> Result<(), AuthError> {
        let data = decode::<StateClaims>(state, &self.decoding, &Validation::default())
            .map_err(|_| AuthError::OAuth("invalid state parameter".to_string()))?;

        if data.claims.sub != STATE_SUBJECT {
            return Err(AuthError::OAuth("invalid state parameter".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ecomshop_core::Email;

    fn service() -> TokenService {
        TokenService::new(&SecretString::from("kX9$mP2@vQ7!wL4#nR8&tY1*zF5^cH3j"))
    }

    fn sample_user() -> User {
        User {
            id: UserId::new(42),
            username: "alice".to_string(),
            email: Email::parse("alice@example.com").unwrap(),
            google_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let tokens = service();
        let token = tokens.issue(&sample_user()).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.user_id().unwrap(), UserId::new(42));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(matches!(
            service().verify("not-a-token"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let token = service().issue(&sample_user()).unwrap();
        let other = TokenService::new(&SecretString::from("qW3#eR5%tY7&uI9(oP1)aS2@dF4$gH6^"));

        assert!(matches!(other.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_verify_rejects_expired() {
        let tokens = service();
        let now = Utc::now();
        let claims = Claims {
            sub: "42".to_string(),
            email: "alice@example.com".to_string(),
            iat: (now - Duration::hours(3)).timestamp(),
            exp: (now - Duration::hours(2)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &tokens.encoding).unwrap();

        assert!(matches!(tokens.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_oauth_state_roundtrip() {
        let tokens = service();
        let state = tokens.issue_oauth_state().unwrap();
        assert!(tokens.verify_oauth_state(&state).is_ok());
    }

    #[test]
    fn test_access_token_is_not_a_valid_state() {
        let tokens = service();
        let token = tokens.issue(&sample_user()).unwrap();
        assert!(matches!(
            tokens.verify_oauth_state(&token),
            Err(AuthError::OAuth(_))
        ));
    }

    #[test]
    fn test_state_is_not_a_valid_access_token() {
        let tokens = service();
        let state = tokens.issue_oauth_state().unwrap();
        let claims = tokens.verify(&state).unwrap();
        assert!(matches!(claims.user_id(), Err(AuthError::InvalidToken)));
    }
}
