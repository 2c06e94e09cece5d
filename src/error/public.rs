//! Public Flow Errors
//!
//! Typed, immutable errors handed to application code, one alias per flow
//! stage. All share the [`PublicError`] carrier; the per-flow kind enums are
//! the thin adapters from the abstract [`ErrorTag`] vocabulary.

use uuid::Uuid;

use super::codes::{ApiErrorResponse, ErrorTag};

/// Canonical error messages.
pub(crate) mod messages {
    pub const BROWSER_REQUIRED: &str =
        "The server requires a browser-based flow to continue. Use the web fallback.";
    pub const UNEXPECTED_RESPONSE_BODY: &str = "Unexpected response body received from the server.";
    pub const FLOW_NOT_COMPLETED: &str = "The operation did not complete. Restart the flow.";
    pub const EMPTY_USERNAME: &str = "The username was empty.";
    pub const EMPTY_CODE: &str = "The submitted code was empty.";
    pub const EMPTY_PASSWORD: &str = "The submitted password was empty.";
    pub const EMPTY_ATTRIBUTES: &str = "No attributes were submitted.";

    /// Message for a delegate missing the optional method an outcome needs.
    pub fn not_implemented(method: &str) -> String {
        format!("{method} not implemented")
    }
}

/// Typed public error for one flow stage.
///
/// Constructed once, immutable, carrying everything a caller needs to present
/// the failure and open a support case (correlation id, service codes, URI).
#[derive(Clone, Debug)]
pub struct PublicError<K> {
    kind: K,
    message: Option<String>,
    correlation_id: Uuid,
    error_codes: Vec<i64>,
    error_uri: Option<String>,
}

impl<K: Copy + PartialEq + std::fmt::Debug> PublicError<K> {
    pub fn new(kind: K, message: Option<String>, correlation_id: Uuid) -> Self {
        Self {
            kind,
            message,
            correlation_id,
            error_codes: Vec::new(),
            error_uri: None,
        }
    }

    /// The flow-stage error kind.
    pub fn kind(&self) -> K {
        self.kind
    }

    /// Best-effort human-readable description.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Correlation id for support diagnostics.
    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    /// Numeric service error codes, when reported.
    pub fn error_codes(&self) -> &[i64] {
        &self.error_codes
    }

    /// Documentation URI, when reported.
    pub fn error_uri(&self) -> Option<&str> {
        self.error_uri.as_deref()
    }
}

impl<K: Copy + PartialEq + std::fmt::Debug + From<ErrorTag>> PublicError<K> {
    /// Generic error with no message.
    pub fn general(correlation_id: Uuid) -> Self {
        Self::new(K::from(ErrorTag::General), None, correlation_id)
    }

    /// Generic error carrying a message.
    pub fn general_with_message(message: impl Into<String>, correlation_id: Uuid) -> Self {
        Self::new(K::from(ErrorTag::General), Some(message.into()), correlation_id)
    }

    /// Browser-fallback error, produced for every `.redirect` validated response.
    pub fn browser_required(correlation_id: Uuid) -> Self {
        Self::new(
            K::from(ErrorTag::BrowserRequired),
            Some(messages::BROWSER_REQUIRED.to_string()),
            correlation_id,
        )
    }

    /// Adapt a server-reported error into this flow's public error.
    pub fn from_api(api_error: &ApiErrorResponse, correlation_id: Uuid) -> Self {
        Self {
            kind: K::from(api_error.tag()),
            message: api_error.error_description.clone(),
            correlation_id: api_error.correlation_id.unwrap_or(correlation_id),
            error_codes: api_error.error_codes.clone().unwrap_or_default(),
            error_uri: api_error.error_uri.clone(),
        }
    }
}

impl<K: Copy + PartialEq + std::fmt::Debug> std::fmt::Display for PublicError<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{:?}: {message}", self.kind),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

macro_rules! error_kind {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => [$($tag:ident),+ $(,)?]),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub enum $name {
            $($variant,)*
            GeneralError,
        }

        impl From<ErrorTag> for $name {
            fn from(tag: ErrorTag) -> Self {
                match tag {
                    $($(ErrorTag::$tag)|+ => Self::$variant,)*
                    _ => Self::GeneralError,
                }
            }
        }
    };
}

error_kind! {
    /// Error kinds for starting a sign-up flow.
    SignUpStartErrorKind {
        BrowserRequired => [BrowserRequired],
        UserAlreadyExists => [UserAlreadyExists],
        InvalidPassword => [InvalidPassword],
        InvalidAttributes => [InvalidAttributes],
    }
}

error_kind! {
    /// Error kinds for starting a sign-in flow.
    SignInStartErrorKind {
        BrowserRequired => [BrowserRequired],
        UserNotFound => [UserNotFound],
        InvalidCredentials => [InvalidCredentials, InvalidPassword],
    }
}

error_kind! {
    /// Error kinds for submitting a one-time code.
    VerifyCodeErrorKind {
        BrowserRequired => [BrowserRequired],
        InvalidCode => [InvalidCode],
    }
}

error_kind! {
    /// Error kinds for submitting a password.
    PasswordRequiredErrorKind {
        BrowserRequired => [BrowserRequired],
        InvalidPassword => [InvalidPassword, InvalidCredentials],
    }
}

error_kind! {
    /// Error kinds for submitting attributes.
    AttributesRequiredErrorKind {
        BrowserRequired => [BrowserRequired],
        InvalidAttributes => [InvalidAttributes],
    }
}

error_kind! {
    /// Error kinds for resending a code.
    ResendCodeErrorKind {
        BrowserRequired => [BrowserRequired],
    }
}

error_kind! {
    /// Error kinds for starting a password-reset flow.
    ResetPasswordStartErrorKind {
        BrowserRequired => [BrowserRequired],
        UserNotFound => [UserNotFound],
    }
}

error_kind! {
    /// Error kinds for the MFA flow.
    MfaErrorKind {
        BrowserRequired => [BrowserRequired],
        InvalidCode => [InvalidCode],
    }
}

error_kind! {
    /// Error kinds for the sign-in handoff after sign-up or password reset.
    SignInAfterPreviousFlowErrorKind {
        BrowserRequired => [BrowserRequired],
    }
}

pub type SignUpStartError = PublicError<SignUpStartErrorKind>;
pub type SignInStartError = PublicError<SignInStartErrorKind>;
pub type VerifyCodeError = PublicError<VerifyCodeErrorKind>;
pub type PasswordRequiredError = PublicError<PasswordRequiredErrorKind>;
pub type AttributesRequiredError = PublicError<AttributesRequiredErrorKind>;
pub type ResendCodeError = PublicError<ResendCodeErrorKind>;
pub type ResetPasswordStartError = PublicError<ResetPasswordStartErrorKind>;
pub type MfaError = PublicError<MfaErrorKind>;
pub type SignInAfterPreviousFlowError = PublicError<SignInAfterPreviousFlowErrorKind>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::codes::{Oauth2ErrorCode, SubErrorCode};

    fn api_error(error: Oauth2ErrorCode, suberror: Option<SubErrorCode>) -> ApiErrorResponse {
        ApiErrorResponse {
            error,
            suberror,
            error_description: Some("description".to_string()),
            error_codes: Some(vec![50011]),
            error_uri: Some("https://login.contoso.com/error?code=50011".to_string()),
            continuation_token: None,
            required_attributes: None,
            invalid_attributes: None,
            unverified_attributes: None,
            correlation_id: None,
        }
    }

    #[test]
    fn test_browser_required_constructor() {
        let correlation_id = Uuid::new_v4();
        let error = SignUpStartError::browser_required(correlation_id);
        assert_eq!(error.kind(), SignUpStartErrorKind::BrowserRequired);
        assert_eq!(error.correlation_id(), correlation_id);
        assert!(error.message().is_some());
    }

    #[test]
    fn test_from_api_carries_details() {
        let error = SignInStartError::from_api(
            &api_error(Oauth2ErrorCode::UserNotFound, None),
            Uuid::new_v4(),
        );
        assert_eq!(error.kind(), SignInStartErrorKind::UserNotFound);
        assert_eq!(error.error_codes(), &[50011]);
        assert!(error.error_uri().is_some());
    }

    #[test]
    fn test_password_suberror_maps_to_invalid_password() {
        let error = SignUpStartError::from_api(
            &api_error(Oauth2ErrorCode::InvalidGrant, Some(SubErrorCode::PasswordBanned)),
            Uuid::new_v4(),
        );
        assert_eq!(error.kind(), SignUpStartErrorKind::InvalidPassword);
    }

    #[test]
    fn test_oob_suberror_maps_to_invalid_code() {
        let error = VerifyCodeError::from_api(
            &api_error(Oauth2ErrorCode::InvalidGrant, Some(SubErrorCode::InvalidOobValue)),
            Uuid::new_v4(),
        );
        assert_eq!(error.kind(), VerifyCodeErrorKind::InvalidCode);
    }

    #[test]
    fn test_unmapped_tag_falls_back_to_general() {
        // user_already_exists has no meaning for resend-code.
        let error = ResendCodeError::from_api(
            &api_error(Oauth2ErrorCode::UserAlreadyExists, None),
            Uuid::new_v4(),
        );
        assert_eq!(error.kind(), ResendCodeErrorKind::GeneralError);
    }

    #[test]
    fn test_not_implemented_message() {
        let message = messages::not_implemented("on_sign_up_code_required");
        assert_eq!(message, "on_sign_up_code_required not implemented");
    }
}
