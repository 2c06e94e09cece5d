//! Request Providers
//!
//! One provider per flow family. Providers turn flow inputs into ready to
//! send [`ApiRequest`](crate::network::ApiRequest) values: endpoint URL from
//! the configured authority, serialized body, correlation id. The sign-up and
//! reset-password endpoints take JSON bodies, the oauth2 family
//! (initiate/challenge/token) takes form encoding.

pub mod reset_password;
pub mod sign_in;
pub mod sign_up;

pub use reset_password::ResetPasswordRequestProvider;
pub use sign_in::{SignInRequestProvider, TokenRequestInput};
pub use sign_up::SignUpRequestProvider;

use crate::error::{NativeAuthError, ProtocolError};

/// Grant type submitted to the continue/token endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrantType {
    Password,
    OobCode,
    Attributes,
    ContinuationToken,
}

impl GrantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::OobCode => "oob",
            Self::Attributes => "attributes",
            Self::ContinuationToken => "continuation_token",
        }
    }
}

pub(crate) fn invalid_request(message: impl Into<String>) -> NativeAuthError {
    ProtocolError::InvalidRequest {
        message: message.into(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_type_wire_values() {
        assert_eq!(GrantType::Password.as_str(), "password");
        assert_eq!(GrantType::OobCode.as_str(), "oob");
        assert_eq!(GrantType::Attributes.as_str(), "attributes");
        assert_eq!(GrantType::ContinuationToken.as_str(), "continuation_token");
    }
}
