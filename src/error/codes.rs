//! Oauth2 Error-Code Taxonomy
//!
//! Wire-level error vocabulary shared by the native auth endpoints, plus the
//! classification of `(code, suberror)` pairs into abstract outcome tags.
//! Per-flow adapters translating tags into public error kinds live in
//! [`super::public`].

use serde::Deserialize;
use uuid::Uuid;

use crate::types::responses::{AttributeRef, RequiredAttribute};

/// Oauth2 error code returned by the native auth endpoints.
///
/// This is the union of the server literals used across the signup, signin,
/// token and resetpassword families. Unknown literals deserialize to
/// [`Oauth2ErrorCode::Unknown`] rather than failing the decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Oauth2ErrorCode {
    InvalidRequest,
    InvalidClient,
    UnauthorizedClient,
    InvalidGrant,
    ExpiredToken,
    UnsupportedChallengeType,
    UserAlreadyExists,
    UserNotFound,
    InvalidOobValue,
    PasswordTooWeak,
    PasswordTooShort,
    PasswordTooLong,
    PasswordRecentlyUsed,
    PasswordBanned,
    AttributesRequired,
    InvalidAttributes,
    AttributeValidationFailed,
    CredentialRequired,
    VerificationRequired,
    AuthNotSupported,
    MfaRequired,
    #[serde(other)]
    Unknown,
}

/// Sub-error code refining an [`Oauth2ErrorCode`] (typically `invalid_grant`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubErrorCode {
    InvalidOobValue,
    PasswordTooWeak,
    PasswordTooShort,
    PasswordTooLong,
    PasswordInvalid,
    PasswordRecentlyUsed,
    PasswordBanned,
    AttributeValidationFailed,
    MfaRequired,
    #[serde(other)]
    Unknown,
}

impl SubErrorCode {
    /// Whether this suberror denotes a password-strength/policy failure.
    pub fn is_password_error(&self) -> bool {
        matches!(
            self,
            Self::PasswordTooWeak
                | Self::PasswordTooShort
                | Self::PasswordTooLong
                | Self::PasswordInvalid
                | Self::PasswordRecentlyUsed
                | Self::PasswordBanned
        )
    }
}

/// Abstract outcome tag a `(code, suberror)` pair classifies into.
///
/// One shared vocabulary for all endpoints; each flow adapts tags into its own
/// public error-kind enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorTag {
    BrowserRequired,
    UserAlreadyExists,
    UserNotFound,
    InvalidCredentials,
    InvalidCode,
    InvalidPassword,
    InvalidAttributes,
    ExpiredToken,
    MfaRequired,
    General,
}

/// Classify a `(code, suberror)` pair into an [`ErrorTag`].
///
/// Total over both enums: unknown or unmapped codes fall back to
/// [`ErrorTag::General`]. When a suberror refines the meaning (e.g.
/// `invalid_grant` + `invalid_oob_value`), the suberror wins.
pub fn classify(code: Oauth2ErrorCode, suberror: Option<SubErrorCode>) -> ErrorTag {
    // Suberror precedence.
    if let Some(sub) = suberror {
        if sub.is_password_error() {
            return ErrorTag::InvalidPassword;
        }
        match sub {
            SubErrorCode::InvalidOobValue => return ErrorTag::InvalidCode,
            SubErrorCode::AttributeValidationFailed => return ErrorTag::InvalidAttributes,
            SubErrorCode::MfaRequired => return ErrorTag::MfaRequired,
            _ => {}
        }
    }

    match code {
        Oauth2ErrorCode::UnsupportedChallengeType => ErrorTag::BrowserRequired,
        Oauth2ErrorCode::UserAlreadyExists => ErrorTag::UserAlreadyExists,
        Oauth2ErrorCode::UserNotFound => ErrorTag::UserNotFound,
        Oauth2ErrorCode::InvalidGrant => ErrorTag::InvalidCredentials,
        Oauth2ErrorCode::InvalidOobValue => ErrorTag::InvalidCode,
        Oauth2ErrorCode::PasswordTooWeak
        | Oauth2ErrorCode::PasswordTooShort
        | Oauth2ErrorCode::PasswordTooLong
        | Oauth2ErrorCode::PasswordRecentlyUsed
        | Oauth2ErrorCode::PasswordBanned => ErrorTag::InvalidPassword,
        Oauth2ErrorCode::AttributesRequired
        | Oauth2ErrorCode::InvalidAttributes
        | Oauth2ErrorCode::AttributeValidationFailed => ErrorTag::InvalidAttributes,
        Oauth2ErrorCode::ExpiredToken => ErrorTag::ExpiredToken,
        Oauth2ErrorCode::MfaRequired => ErrorTag::MfaRequired,
        Oauth2ErrorCode::InvalidRequest
        | Oauth2ErrorCode::InvalidClient
        | Oauth2ErrorCode::UnauthorizedClient
        | Oauth2ErrorCode::CredentialRequired
        | Oauth2ErrorCode::VerificationRequired
        | Oauth2ErrorCode::AuthNotSupported
        | Oauth2ErrorCode::Unknown => ErrorTag::General,
    }
}

/// Deserialized error body returned by a native auth endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiErrorResponse {
    /// Oauth2 error code.
    pub error: Oauth2ErrorCode,
    /// Sub-error refining the code.
    #[serde(default)]
    pub suberror: Option<SubErrorCode>,
    /// Human-readable description.
    #[serde(default)]
    pub error_description: Option<String>,
    /// Numeric service error codes.
    #[serde(default)]
    pub error_codes: Option<Vec<i64>>,
    /// Documentation URI for the error.
    #[serde(default)]
    pub error_uri: Option<String>,
    /// Continuation token, attached to "required next step" errors.
    #[serde(default)]
    pub continuation_token: Option<String>,
    /// Attributes the flow still needs (attributes_required).
    #[serde(default)]
    pub required_attributes: Option<Vec<RequiredAttribute>>,
    /// Attributes that failed validation (attribute_validation_failed).
    #[serde(default)]
    pub invalid_attributes: Option<Vec<AttributeRef>>,
    /// Attributes pending verification.
    #[serde(default)]
    pub unverified_attributes: Option<Vec<AttributeRef>>,
    /// Correlation id echoed by the service.
    #[serde(default)]
    pub correlation_id: Option<Uuid>,
}

impl ApiErrorResponse {
    /// Classify this error into an abstract tag.
    pub fn tag(&self) -> ErrorTag {
        classify(self.error, self.suberror)
    }

    /// Names of the attributes that failed validation.
    pub fn invalid_attribute_names(&self) -> Vec<String> {
        self.invalid_attributes
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|a| a.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Oauth2ErrorCode::UnsupportedChallengeType, None, ErrorTag::BrowserRequired)]
    #[test_case(Oauth2ErrorCode::UserAlreadyExists, None, ErrorTag::UserAlreadyExists)]
    #[test_case(Oauth2ErrorCode::UserNotFound, None, ErrorTag::UserNotFound)]
    #[test_case(Oauth2ErrorCode::InvalidGrant, None, ErrorTag::InvalidCredentials)]
    #[test_case(Oauth2ErrorCode::ExpiredToken, None, ErrorTag::ExpiredToken)]
    #[test_case(Oauth2ErrorCode::PasswordTooWeak, None, ErrorTag::InvalidPassword)]
    #[test_case(Oauth2ErrorCode::AttributesRequired, None, ErrorTag::InvalidAttributes)]
    #[test_case(Oauth2ErrorCode::InvalidRequest, None, ErrorTag::General)]
    #[test_case(Oauth2ErrorCode::Unknown, None, ErrorTag::General)]
    fn test_classify_bare_codes(code: Oauth2ErrorCode, sub: Option<SubErrorCode>, want: ErrorTag) {
        assert_eq!(classify(code, sub), want);
    }

    #[test_case(SubErrorCode::InvalidOobValue, ErrorTag::InvalidCode)]
    #[test_case(SubErrorCode::PasswordTooWeak, ErrorTag::InvalidPassword)]
    #[test_case(SubErrorCode::PasswordTooShort, ErrorTag::InvalidPassword)]
    #[test_case(SubErrorCode::PasswordTooLong, ErrorTag::InvalidPassword)]
    #[test_case(SubErrorCode::PasswordInvalid, ErrorTag::InvalidPassword)]
    #[test_case(SubErrorCode::PasswordRecentlyUsed, ErrorTag::InvalidPassword)]
    #[test_case(SubErrorCode::PasswordBanned, ErrorTag::InvalidPassword)]
    #[test_case(SubErrorCode::AttributeValidationFailed, ErrorTag::InvalidAttributes)]
    fn test_suberror_takes_precedence(sub: SubErrorCode, want: ErrorTag) {
        // invalid_grant alone would classify as InvalidCredentials.
        assert_eq!(classify(Oauth2ErrorCode::InvalidGrant, Some(sub)), want);
    }

    #[test]
    fn test_unknown_suberror_falls_back_to_code() {
        assert_eq!(
            classify(Oauth2ErrorCode::InvalidGrant, Some(SubErrorCode::Unknown)),
            ErrorTag::InvalidCredentials
        );
    }

    #[test]
    fn test_unknown_code_deserializes() {
        let body = r#"{"error":"some_future_code","error_description":"?"}"#;
        let parsed: ApiErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error, Oauth2ErrorCode::Unknown);
        assert_eq!(parsed.tag(), ErrorTag::General);
    }

    #[test]
    fn test_error_body_with_attributes() {
        let body = r#"{
            "error": "invalid_grant",
            "suberror": "attribute_validation_failed",
            "error_description": "Attribute validation failed",
            "error_codes": [90100],
            "invalid_attributes": [{"name": "last_name"}],
            "continuation_token": "ct-1"
        }"#;
        let parsed: ApiErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.tag(), ErrorTag::InvalidAttributes);
        assert_eq!(parsed.invalid_attribute_names(), vec!["last_name"]);
        assert_eq!(parsed.continuation_token.as_deref(), Some("ct-1"));
    }
}
