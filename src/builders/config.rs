//! Configuration Builder
//!
//! Fluent builder for native auth configuration.

use std::time::Duration;

use url::Url;

use crate::error::{ConfigurationError, NativeAuthError};
use crate::types::config::{
    ChallengeType, NativeAuthConfig, DEFAULT_RETRY_COUNT, DEFAULT_RETRY_INTERVAL,
};

/// Native auth configuration builder.
#[derive(Default)]
pub struct NativeAuthConfigBuilder {
    client_id: Option<String>,
    authority: Option<String>,
    challenge_types: Vec<ChallengeType>,
    timeout: Option<Duration>,
    retry_count: Option<u32>,
    retry_interval: Option<Duration>,
}

impl NativeAuthConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set the authority base URL.
    pub fn authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = Some(authority.into());
        self
    }

    /// Set challenge types the client can satisfy natively.
    pub fn challenge_types(mut self, challenge_types: Vec<ChallengeType>) -> Self {
        self.challenge_types = challenge_types;
        self
    }

    /// Add a challenge type.
    pub fn add_challenge_type(mut self, challenge_type: ChallengeType) -> Self {
        self.challenge_types.push(challenge_type);
        self
    }

    /// Set request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the 5xx retry budget per request.
    pub fn retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = Some(retry_count);
        self
    }

    /// Set the wait between retried requests.
    pub fn retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = Some(retry_interval);
        self
    }

    /// Build the native auth configuration.
    pub fn build(self) -> Result<NativeAuthConfig, NativeAuthError> {
        let client_id = self.client_id.filter(|id| !id.is_empty()).ok_or_else(|| {
            NativeAuthError::Configuration(ConfigurationError::MissingField {
                field: "client_id".to_string(),
            })
        })?;

        let authority = self.authority.ok_or_else(|| {
            NativeAuthError::Configuration(ConfigurationError::MissingField {
                field: "authority".to_string(),
            })
        })?;
        let authority = Url::parse(&authority).map_err(|_| {
            NativeAuthError::Configuration(ConfigurationError::InvalidAuthority { url: authority })
        })?;

        let challenge_types = if self.challenge_types.is_empty() {
            vec![ChallengeType::Oob, ChallengeType::Password]
        } else {
            let mut challenge_types = self.challenge_types;
            challenge_types.dedup();
            challenge_types
        };

        Ok(NativeAuthConfig {
            client_id,
            authority,
            challenge_types,
            timeout: self.timeout.unwrap_or(Duration::from_secs(30)),
            retry_count: self.retry_count.unwrap_or(DEFAULT_RETRY_COUNT),
            retry_interval: self.retry_interval.unwrap_or(DEFAULT_RETRY_INTERVAL),
        })
    }
}

/// Create a new native auth configuration builder.
pub fn native_auth_config() -> NativeAuthConfigBuilder {
    NativeAuthConfigBuilder::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_success() {
        let config = NativeAuthConfigBuilder::new()
            .client_id("test-client")
            .authority("https://contoso.ciamlogin.com/contoso.onmicrosoft.com")
            .add_challenge_type(ChallengeType::Oob)
            .retry_count(2)
            .build()
            .unwrap();

        assert_eq!(config.client_id, "test-client");
        assert_eq!(config.challenge_types, vec![ChallengeType::Oob]);
        assert_eq!(config.retry_count, 2);
    }

    #[test]
    fn test_builder_defaults() {
        let config = native_auth_config()
            .client_id("test-client")
            .authority("https://contoso.ciamlogin.com/contoso.onmicrosoft.com")
            .build()
            .unwrap();

        assert_eq!(
            config.challenge_types,
            vec![ChallengeType::Oob, ChallengeType::Password]
        );
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry_interval, DEFAULT_RETRY_INTERVAL);
    }

    #[test]
    fn test_builder_missing_client_id() {
        let result = NativeAuthConfigBuilder::new()
            .authority("https://contoso.ciamlogin.com/contoso.onmicrosoft.com")
            .build();
        assert!(matches!(
            result,
            Err(NativeAuthError::Configuration(ConfigurationError::MissingField { .. }))
        ));
    }

    #[test]
    fn test_builder_invalid_authority() {
        let result = NativeAuthConfigBuilder::new()
            .client_id("test-client")
            .authority("not a url")
            .build();
        assert!(matches!(
            result,
            Err(NativeAuthError::Configuration(ConfigurationError::InvalidAuthority { .. }))
        ));
    }
}
