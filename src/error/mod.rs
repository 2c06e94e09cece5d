//! Native Auth Error Types
//!
//! Internal error hierarchy for the native auth integration. These are the
//! errors produced while building requests, talking to the service and
//! decoding responses. The typed errors handed to application code live in
//! [`public`], and the server's oauth2 error vocabulary in [`codes`].

use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

pub mod codes;
pub mod public;

pub use codes::{classify, ApiErrorResponse, ErrorTag, Oauth2ErrorCode, SubErrorCode};
pub use public::{
    AttributesRequiredError, AttributesRequiredErrorKind, MfaError, MfaErrorKind,
    PasswordRequiredError, PasswordRequiredErrorKind, PublicError, ResendCodeError,
    ResendCodeErrorKind, ResetPasswordStartError, ResetPasswordStartErrorKind,
    SignInAfterPreviousFlowError, SignInAfterPreviousFlowErrorKind, SignInStartError,
    SignInStartErrorKind, SignUpStartError, SignUpStartErrorKind, VerifyCodeError,
    VerifyCodeErrorKind,
};

/// Root error type for the native auth integration.
#[derive(Error, Debug)]
pub enum NativeAuthError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
}

impl NativeAuthError {
    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "NATIVE_AUTH_CONFIG",
            Self::Network(_) => "NATIVE_AUTH_NETWORK",
            Self::Protocol(_) => "NATIVE_AUTH_PROTOCOL",
            Self::Http(_) => "NATIVE_AUTH_HTTP",
        }
    }

    /// Check if the failing operation may be retried by the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_retryable(),
            Self::Http(e) => e.server_unavailable,
            _ => false,
        }
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid authority URL: {url}")]
    InvalidAuthority { url: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Network/transport error.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },
}

impl NetworkError {
    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        true
    }
}

/// Protocol error: request construction, response decoding, local validation.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The outbound request could not be built (bad attributes, bad URL).
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// The response body could not be decoded into the expected shape.
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// The response decoded but failed local validation.
    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

/// HTTP-level error surfaced by the request error handler for status codes
/// outside the success/API-error ranges, or once the retry budget runs out.
#[derive(Debug)]
pub struct HttpError {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Set for 5xx responses after retries are exhausted.
    pub server_unavailable: bool,
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.server_unavailable {
            write!(f, "HTTP {} (server unavailable)", self.status)
        } else {
            write!(f, "HTTP {}", self.status)
        }
    }
}

impl std::error::Error for HttpError {}

/// Result type for native auth operations.
pub type NativeAuthResult<T> = Result<T, NativeAuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = NativeAuthError::Protocol(ProtocolError::InvalidRequest {
            message: "bad attributes".to_string(),
        });
        assert_eq!(err.error_code(), "NATIVE_AUTH_PROTOCOL");
    }

    #[test]
    fn test_is_retryable() {
        assert!(NativeAuthError::Network(NetworkError::Timeout {
            timeout: Duration::from_secs(30)
        })
        .is_retryable());

        assert!(NativeAuthError::Http(HttpError {
            status: 503,
            headers: HashMap::new(),
            server_unavailable: true,
        })
        .is_retryable());

        assert!(!NativeAuthError::Protocol(ProtocolError::InvalidResponse {
            message: "truncated body".to_string()
        })
        .is_retryable());
    }

    #[test]
    fn test_http_error_display() {
        let err = HttpError {
            status: 503,
            headers: HashMap::new(),
            server_unavailable: true,
        };
        assert_eq!(err.to_string(), "HTTP 503 (server unavailable)");

        let err = HttpError {
            status: 404,
            headers: HashMap::new(),
            server_unavailable: false,
        };
        assert_eq!(err.to_string(), "HTTP 404");
    }
}
