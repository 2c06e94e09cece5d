//! Account and Token Types

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};

use crate::types::responses::TokenResponse;

/// An access token with its expiry.
#[derive(Clone)]
pub struct AccessToken {
    token: SecretString,
    /// Expiry instant.
    pub expires_on: DateTime<Utc>,
    /// Scopes the token was granted.
    pub scopes: Vec<String>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, expires_on: DateTime<Utc>, scopes: Vec<String>) -> Self {
        Self {
            token: SecretString::new(token.into()),
            expires_on,
            scopes,
        }
    }

    /// The raw token value.
    pub fn expose(&self) -> &str {
        self.token.expose_secret()
    }

    /// Whether the token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_on
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_on", &self.expires_on)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Token set persisted through the cache collaborator.
#[derive(Clone, Debug)]
pub struct StoredTokens {
    pub access_token: AccessToken,
    pub refresh_token: Option<SecretString>,
    pub id_token: Option<String>,
}

impl StoredTokens {
    pub(crate) fn from_token_response(response: &TokenResponse) -> Self {
        let scopes: Vec<String> = response
            .scope
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let expires_on =
            Utc::now() + Duration::seconds(response.expires_in.unwrap_or(3600) as i64);
        Self {
            access_token: AccessToken::new(response.access_token.clone(), expires_on, scopes),
            refresh_token: response
                .refresh_token
                .clone()
                .map(SecretString::new),
            id_token: response.id_token.clone(),
        }
    }
}

/// Signed-in account handed back to the caller after a completed flow.
#[derive(Clone, Debug)]
pub struct UserAccountResult {
    /// Username the flow was performed for.
    pub username: String,
    /// Raw ID token, when issued. Treated as opaque here.
    pub id_token: Option<String>,
    /// Granted scopes.
    pub scopes: Vec<String>,
    access_token: AccessToken,
}

impl UserAccountResult {
    pub(crate) fn from_token_response(username: &str, response: &TokenResponse) -> Self {
        let scopes: Vec<String> = response
            .scope
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let expires_on =
            Utc::now() + Duration::seconds(response.expires_in.unwrap_or(3600) as i64);
        Self {
            username: username.to_string(),
            id_token: response.id_token.clone(),
            scopes: scopes.clone(),
            access_token: AccessToken::new(response.access_token.clone(), expires_on, scopes),
        }
    }

    /// Rebuild an account from a cached token set.
    pub(crate) fn from_stored(username: &str, tokens: &StoredTokens) -> Self {
        Self {
            username: username.to_string(),
            id_token: tokens.id_token.clone(),
            scopes: tokens.access_token.scopes.clone(),
            access_token: tokens.access_token.clone(),
        }
    }

    /// The account's access token.
    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }
}
