//! Device Auth (PKeyAuth) Challenge Handling
//!
//! The service can interleave a device-level proof-of-possession challenge
//! into any endpoint via a `WWW-Authenticate: PKeyAuth …` header. The request
//! error handler detects it and asks a [`DeviceAuthHandler`] to produce the
//! `Authorization` header for the single resend.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::{NativeAuthError, ProtocolError};

/// Scheme name in the `WWW-Authenticate` header.
pub const PKEY_AUTH_SCHEME: &str = "PKeyAuth";

/// Check whether a `WWW-Authenticate` value carries a PKeyAuth challenge.
pub fn is_pkey_auth_challenge(www_authenticate: &str) -> bool {
    www_authenticate.contains(PKEY_AUTH_SCHEME)
}

/// Parse the comma-separated `Key="Value"` parameters of a PKeyAuth challenge.
///
/// Commas inside quoted values (e.g. a `CertAuthorities` distinguished-name
/// list) do not terminate a parameter.
pub(crate) fn parse_challenge_params(www_authenticate: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    let rest = www_authenticate
        .trim_start()
        .strip_prefix(PKEY_AUTH_SCHEME)
        .unwrap_or(www_authenticate);

    let mut part = String::new();
    let mut in_quotes = false;
    for ch in rest.chars().chain(std::iter::once(',')) {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                part.push(ch);
            }
            ',' if !in_quotes => {
                if let Some((key, value)) = part.split_once('=') {
                    params.insert(
                        key.trim().to_string(),
                        value.trim().trim_matches('"').to_string(),
                    );
                }
                part.clear();
            }
            _ => part.push(ch),
        }
    }
    params
}

/// Produces the `Authorization` header answering a PKeyAuth challenge.
#[async_trait]
pub trait DeviceAuthHandler: Send + Sync {
    /// Respond to the challenge found in `www_authenticate`, issued for
    /// `request_url`.
    async fn respond(
        &self,
        www_authenticate: &str,
        request_url: &str,
    ) -> Result<String, NativeAuthError>;
}

/// Default handler for devices without a registered certificate: echoes the
/// challenge context and version so the server can complete the handshake.
#[derive(Default)]
pub struct DefaultDeviceAuthHandler;

impl DefaultDeviceAuthHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DeviceAuthHandler for DefaultDeviceAuthHandler {
    async fn respond(
        &self,
        www_authenticate: &str,
        _request_url: &str,
    ) -> Result<String, NativeAuthError> {
        let params = parse_challenge_params(www_authenticate);
        let context = params.get("Context").ok_or_else(|| {
            NativeAuthError::Protocol(ProtocolError::InvalidResponse {
                message: "PKeyAuth challenge missing Context".to_string(),
            })
        })?;
        let version = params.get("Version").ok_or_else(|| {
            NativeAuthError::Protocol(ProtocolError::InvalidResponse {
                message: "PKeyAuth challenge missing Version".to_string(),
            })
        })?;

        Ok(format!(
            "{PKEY_AUTH_SCHEME} Context=\"{context}\", Version=\"{version}\""
        ))
    }
}

/// Mock device auth handler for testing.
#[derive(Default)]
pub struct MockDeviceAuthHandler {
    challenges: std::sync::Mutex<Vec<String>>,
    response: std::sync::Mutex<Option<String>>,
}

impl MockDeviceAuthHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Authorization header the mock returns.
    pub fn set_response(&self, header: impl Into<String>) -> &Self {
        *self.response.lock().unwrap() = Some(header.into());
        self
    }

    /// Challenges seen so far.
    pub fn challenges(&self) -> Vec<String> {
        self.challenges.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeviceAuthHandler for MockDeviceAuthHandler {
    async fn respond(
        &self,
        www_authenticate: &str,
        _request_url: &str,
    ) -> Result<String, NativeAuthError> {
        self.challenges
            .lock()
            .unwrap()
            .push(www_authenticate.to_string());
        Ok(self
            .response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| format!("{PKEY_AUTH_SCHEME} Context=\"mock\", Version=\"1.0\"")))
    }
}
