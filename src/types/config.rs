//! Configuration Types
//!
//! Client configuration for the native auth integration.

use std::time::Duration;
use url::Url;

use crate::error::{ConfigurationError, NativeAuthError};

/// Default number of resends for 5xx responses.
pub const DEFAULT_RETRY_COUNT: u32 = 1;

/// Default wait between retried requests.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Challenge types this client is able to satisfy natively.
///
/// `redirect` is always advertised alongside the configured capabilities so
/// the server can signal browser fallback instead of failing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChallengeType {
    /// Out-of-band one-time code (email/SMS).
    Oob,
    /// Password entry.
    Password,
}

impl ChallengeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Oob => "oob",
            Self::Password => "password",
        }
    }
}

/// Native auth client configuration.
#[derive(Clone, Debug)]
pub struct NativeAuthConfig {
    /// Application (client) id.
    pub client_id: String,
    /// Authority base URL, e.g. `https://contoso.ciamlogin.com/contoso.onmicrosoft.com`.
    pub authority: Url,
    /// Challenge types the client can satisfy natively.
    pub challenge_types: Vec<ChallengeType>,
    /// HTTP timeout per request.
    pub timeout: Duration,
    /// 5xx retry budget per request.
    pub retry_count: u32,
    /// Wait between retried requests.
    pub retry_interval: Duration,
}

impl NativeAuthConfig {
    /// Create a configuration with default capabilities and retry policy.
    pub fn new(client_id: impl Into<String>, authority: &str) -> Result<Self, NativeAuthError> {
        let client_id = client_id.into();
        if client_id.is_empty() {
            return Err(ConfigurationError::MissingField {
                field: "client_id".to_string(),
            }
            .into());
        }
        let authority = Url::parse(authority).map_err(|_| ConfigurationError::InvalidAuthority {
            url: authority.to_string(),
        })?;

        Ok(Self {
            client_id,
            authority,
            challenge_types: vec![ChallengeType::Oob, ChallengeType::Password],
            timeout: Duration::from_secs(30),
            retry_count: DEFAULT_RETRY_COUNT,
            retry_interval: DEFAULT_RETRY_INTERVAL,
        })
    }

    /// Absolute URL for an endpoint path such as `/signup/v1.0/start`.
    pub fn endpoint(&self, path: &str) -> Result<Url, NativeAuthError> {
        let base = self.authority.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}")).map_err(|_| {
            ConfigurationError::InvalidAuthority {
                url: format!("{base}{path}"),
            }
            .into()
        })
    }

    /// Space-joined challenge-type capability list, always ending in `redirect`.
    pub fn challenge_types_value(&self) -> String {
        let mut parts: Vec<&str> = self.challenge_types.iter().map(ChallengeType::as_str).collect();
        parts.push("redirect");
        parts.join(" ")
    }
}

/// Fixed endpoint path table. All endpoints are POST.
pub(crate) mod endpoints {
    pub const SIGNUP_START: &str = "/signup/v1.0/start";
    pub const SIGNUP_CHALLENGE: &str = "/signup/v1.0/challenge";
    pub const SIGNUP_CONTINUE: &str = "/signup/v1.0/continue";

    pub const SIGNIN_INITIATE: &str = "/oauth2/v2.0/initiate";
    pub const SIGNIN_CHALLENGE: &str = "/oauth2/v2.0/challenge";
    pub const SIGNIN_TOKEN: &str = "/oauth2/v2.0/token";

    pub const RESET_PASSWORD_START: &str = "/resetpassword/v1.0/start";
    pub const RESET_PASSWORD_CHALLENGE: &str = "/resetpassword/v1.0/challenge";
    pub const RESET_PASSWORD_CONTINUE: &str = "/resetpassword/v1.0/continue";
    pub const RESET_PASSWORD_SUBMIT: &str = "/resetpassword/v1.0/submit";
    pub const RESET_PASSWORD_POLL_COMPLETION: &str = "/resetpassword/v1.0/poll_completion";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config() {
        let config =
            NativeAuthConfig::new("client-1", "https://contoso.ciamlogin.com/contoso").unwrap();
        assert_eq!(config.client_id, "client-1");
        assert_eq!(config.retry_count, DEFAULT_RETRY_COUNT);
    }

    #[test]
    fn test_missing_client_id() {
        let result = NativeAuthConfig::new("", "https://contoso.ciamlogin.com/contoso");
        assert!(matches!(
            result,
            Err(NativeAuthError::Configuration(ConfigurationError::MissingField { .. }))
        ));
    }

    #[test]
    fn test_invalid_authority() {
        let result = NativeAuthConfig::new("client-1", "not a url");
        assert!(matches!(
            result,
            Err(NativeAuthError::Configuration(ConfigurationError::InvalidAuthority { .. }))
        ));
    }

    #[test]
    fn test_endpoint_joining() {
        let config =
            NativeAuthConfig::new("client-1", "https://contoso.ciamlogin.com/contoso/").unwrap();
        let url = config.endpoint(endpoints::SIGNUP_START).unwrap();
        assert_eq!(
            url.as_str(),
            "https://contoso.ciamlogin.com/contoso/signup/v1.0/start"
        );
    }

    #[test]
    fn test_challenge_types_value_always_includes_redirect() {
        let mut config =
            NativeAuthConfig::new("client-1", "https://contoso.ciamlogin.com/contoso").unwrap();
        assert_eq!(config.challenge_types_value(), "oob password redirect");

        config.challenge_types = vec![ChallengeType::Oob];
        assert_eq!(config.challenge_types_value(), "oob redirect");
    }
}
