//! Response Validators
//!
//! Validators sit between the raw endpoint result and the controllers. Each
//! takes the decoded outcome of one endpoint call and produces a closed enum
//! the controller can match exhaustively: a success payload with every
//! required field present, a named next-step error, `Redirect` when the
//! server demands browser fallback, or `UnexpectedError` when the body does
//! not hold together.
//!
//! Two rules apply everywhere:
//! - a `redirect` challenge type wins over everything else in the body;
//! - a success body missing a required field is `UnexpectedError`, kept
//!   distinct from server-reported API errors.

pub mod reset_password;
pub mod sign_in;
pub mod sign_up;

pub use reset_password::{
    ResetPasswordContinueValidatedResponse, ResetPasswordPollValidatedResponse,
    ResetPasswordStartValidatedResponse, ResetPasswordSubmitValidatedResponse,
};
pub use sign_in::{SignInInitiateValidatedResponse, TokenValidatedResponse};
pub use sign_up::{SignUpContinueValidatedResponse, SignUpStartValidatedResponse};

use crate::error::ApiErrorResponse;
use crate::types::responses::{ChallengeResponse, ChallengeTypeIssued, ChannelType};

/// Endpoint result with transport failures already split off: either a decoded
/// success body or a decoded API error body.
pub type EndpointResult<S> = Result<S, ApiErrorResponse>;

/// Validated outcome of a challenge endpoint. The signup, signin and
/// reset-password challenge endpoints share one wire shape, so one validated
/// enum serves all three.
#[derive(Clone, Debug)]
pub enum ChallengeValidatedResponse {
    /// An out-of-band code was sent; the flow now needs it submitted.
    CodeRequired {
        continuation_token: String,
        /// Masked label of the target, e.g. `u**@contoso.com`.
        sent_to: String,
        channel: ChannelType,
        code_length: usize,
        /// Resend interval hint, present on MFA challenges.
        interval: Option<u64>,
    },
    /// The flow now needs the account password.
    PasswordRequired { continuation_token: String },
    /// The server demands browser-based auth for this account.
    Redirect,
    /// Server-reported API error.
    Error(ApiErrorResponse),
    /// Body did not hold together (missing fields, impossible challenge type).
    UnexpectedError(Option<ApiErrorResponse>),
}

/// Validate a challenge endpoint result.
pub fn validate_challenge(result: EndpointResult<ChallengeResponse>) -> ChallengeValidatedResponse {
    let body = match result {
        Ok(body) => body,
        Err(error) => return ChallengeValidatedResponse::Error(error),
    };

    match body.challenge_type {
        Some(ChallengeTypeIssued::Redirect) => ChallengeValidatedResponse::Redirect,
        Some(ChallengeTypeIssued::Oob) => {
            match (
                body.continuation_token,
                body.challenge_target_label,
                body.challenge_channel,
                body.code_length,
            ) {
                (Some(continuation_token), Some(sent_to), Some(channel), Some(code_length)) => {
                    ChallengeValidatedResponse::CodeRequired {
                        continuation_token,
                        sent_to,
                        channel: channel.to_public(),
                        code_length,
                        interval: body.interval,
                    }
                }
                _ => ChallengeValidatedResponse::UnexpectedError(None),
            }
        }
        Some(ChallengeTypeIssued::Password) => match body.continuation_token {
            Some(continuation_token) => {
                ChallengeValidatedResponse::PasswordRequired { continuation_token }
            }
            None => ChallengeValidatedResponse::UnexpectedError(None),
        },
        Some(ChallengeTypeIssued::Otp) | Some(ChallengeTypeIssued::Unknown) | None => {
            ChallengeValidatedResponse::UnexpectedError(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge_body(json: serde_json::Value) -> ChallengeResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_oob_challenge_requires_all_fields() {
        let validated = validate_challenge(Ok(challenge_body(serde_json::json!({
            "challenge_type": "oob",
            "continuation_token": "ct-2",
            "challenge_target_label": "u**@contoso.com",
            "challenge_channel": "email",
            "code_length": 8
        }))));
        match validated {
            ChallengeValidatedResponse::CodeRequired {
                continuation_token,
                sent_to,
                channel,
                code_length,
                ..
            } => {
                assert_eq!(continuation_token, "ct-2");
                assert_eq!(sent_to, "u**@contoso.com");
                assert_eq!(channel, ChannelType::Email);
                assert_eq!(code_length, 8);
            }
            other => panic!("expected CodeRequired, got {other:?}"),
        }
    }

    #[test]
    fn test_oob_challenge_missing_label_is_unexpected() {
        let validated = validate_challenge(Ok(challenge_body(serde_json::json!({
            "challenge_type": "oob",
            "continuation_token": "ct-2",
            "code_length": 8
        }))));
        assert!(matches!(
            validated,
            ChallengeValidatedResponse::UnexpectedError(None)
        ));
    }

    #[test]
    fn test_password_challenge() {
        let validated = validate_challenge(Ok(challenge_body(serde_json::json!({
            "challenge_type": "password",
            "continuation_token": "ct-3"
        }))));
        assert!(matches!(
            validated,
            ChallengeValidatedResponse::PasswordRequired { continuation_token } if continuation_token == "ct-3"
        ));
    }

    #[test]
    fn test_redirect_wins_over_fields() {
        let validated = validate_challenge(Ok(challenge_body(serde_json::json!({
            "challenge_type": "redirect",
            "continuation_token": "ct-3"
        }))));
        assert!(matches!(validated, ChallengeValidatedResponse::Redirect));
    }

    #[test]
    fn test_unknown_challenge_type_is_unexpected() {
        let validated = validate_challenge(Ok(challenge_body(serde_json::json!({
            "challenge_type": "webauthn",
            "continuation_token": "ct-3"
        }))));
        assert!(matches!(
            validated,
            ChallengeValidatedResponse::UnexpectedError(None)
        ));
    }
}
