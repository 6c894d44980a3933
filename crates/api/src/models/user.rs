//! User domain types.
//!
//! The domain [`User`] carries everything the backend knows about an account;
//! the serializable [`UserProfile`] is what goes over the wire and never
//! includes credential material.

use chrono::{DateTime, Utc};
use serde::Serialize;

use ecomshop_core::{Email, UserId};

/// A storefront user (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name chosen at signup (or derived from the Google profile).
    pub username: String,
    /// User's email address.
    pub email: Email,
    /// Google account id, set for federated logins.
    pub google_id: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Public profile shape returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            google_id: user.google_id.clone(),
        }
    }
}
