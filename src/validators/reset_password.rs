//! Reset-Password Response Validators
//!
//! The challenge endpoint shares [`validate_challenge`](super::validate_challenge)
//! with the other flows.

use crate::error::{ApiErrorResponse, Oauth2ErrorCode, SubErrorCode};
use crate::types::responses::{
    ChallengeTypeIssued, PollStatus, ResetPasswordContinueResponse, ResetPasswordPollResponse,
    ResetPasswordStartResponse, ResetPasswordSubmitResponse,
};
use crate::validators::EndpointResult;

/// Fallback wait between poll_completion calls when the server gives none.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;

/// Validated outcome of `/resetpassword/v1.0/start`.
#[derive(Clone, Debug)]
pub enum ResetPasswordStartValidatedResponse {
    Success { continuation_token: String },
    Redirect,
    Error(ApiErrorResponse),
    UnexpectedError(Option<ApiErrorResponse>),
}

pub fn validate_start(
    result: EndpointResult<ResetPasswordStartResponse>,
) -> ResetPasswordStartValidatedResponse {
    match result {
        Ok(body) => {
            if body.challenge_type == Some(ChallengeTypeIssued::Redirect) {
                return ResetPasswordStartValidatedResponse::Redirect;
            }
            match body.continuation_token {
                Some(continuation_token) => {
                    ResetPasswordStartValidatedResponse::Success { continuation_token }
                }
                None => ResetPasswordStartValidatedResponse::UnexpectedError(None),
            }
        }
        Err(error) => ResetPasswordStartValidatedResponse::Error(error),
    }
}

/// Validated outcome of `/resetpassword/v1.0/continue`.
#[derive(Clone, Debug)]
pub enum ResetPasswordContinueValidatedResponse {
    /// The code was accepted; the token authorizes the password submit step.
    Success { continuation_token: String },
    /// The submitted code was rejected; the flow state stays usable.
    InvalidCode(ApiErrorResponse),
    Error(ApiErrorResponse),
    UnexpectedError(Option<ApiErrorResponse>),
}

pub fn validate_continue(
    result: EndpointResult<ResetPasswordContinueResponse>,
) -> ResetPasswordContinueValidatedResponse {
    let error = match result {
        Ok(body) => {
            return match body.continuation_token {
                Some(continuation_token) => {
                    ResetPasswordContinueValidatedResponse::Success { continuation_token }
                }
                None => ResetPasswordContinueValidatedResponse::UnexpectedError(None),
            }
        }
        Err(error) => error,
    };

    let invalid_code = error.error == Oauth2ErrorCode::InvalidOobValue
        || (error.error == Oauth2ErrorCode::InvalidGrant
            && error.suberror == Some(SubErrorCode::InvalidOobValue));
    if invalid_code {
        return ResetPasswordContinueValidatedResponse::InvalidCode(error);
    }

    ResetPasswordContinueValidatedResponse::Error(error)
}

/// Validated outcome of `/resetpassword/v1.0/submit`.
#[derive(Clone, Debug)]
pub enum ResetPasswordSubmitValidatedResponse {
    /// The new password was accepted; completion is now polled.
    Success {
        continuation_token: String,
        /// Seconds to wait between poll attempts.
        poll_interval: u64,
    },
    /// The new password failed policy validation; the flow state stays
    /// usable for another attempt.
    PasswordError(ApiErrorResponse),
    Error(ApiErrorResponse),
    UnexpectedError(Option<ApiErrorResponse>),
}

pub fn validate_submit(
    result: EndpointResult<ResetPasswordSubmitResponse>,
) -> ResetPasswordSubmitValidatedResponse {
    let error = match result {
        Ok(body) => {
            return match body.continuation_token {
                Some(continuation_token) => ResetPasswordSubmitValidatedResponse::Success {
                    continuation_token,
                    poll_interval: body.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
                },
                None => ResetPasswordSubmitValidatedResponse::UnexpectedError(None),
            }
        }
        Err(error) => error,
    };

    let password_error = matches!(
        error.error,
        Oauth2ErrorCode::PasswordTooWeak
            | Oauth2ErrorCode::PasswordTooShort
            | Oauth2ErrorCode::PasswordTooLong
            | Oauth2ErrorCode::PasswordRecentlyUsed
            | Oauth2ErrorCode::PasswordBanned
    ) || error.suberror.map(|s| s.is_password_error()).unwrap_or(false);
    if password_error {
        return ResetPasswordSubmitValidatedResponse::PasswordError(error);
    }

    ResetPasswordSubmitValidatedResponse::Error(error)
}

/// Validated outcome of `/resetpassword/v1.0/poll_completion`.
#[derive(Clone, Debug)]
pub enum ResetPasswordPollValidatedResponse {
    Success {
        status: PollStatus,
        /// Sign-in-after-reset continuation token, present once succeeded.
        continuation_token: Option<String>,
    },
    Error(ApiErrorResponse),
    UnexpectedError(Option<ApiErrorResponse>),
}

pub fn validate_poll(
    result: EndpointResult<ResetPasswordPollResponse>,
) -> ResetPasswordPollValidatedResponse {
    match result {
        Ok(body) => match body.status {
            PollStatus::Unknown => ResetPasswordPollValidatedResponse::UnexpectedError(None),
            status => ResetPasswordPollValidatedResponse::Success {
                status,
                continuation_token: body.continuation_token,
            },
        },
        Err(error) => ResetPasswordPollValidatedResponse::Error(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(json: serde_json::Value) -> ApiErrorResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_start_success() {
        let body: ResetPasswordStartResponse =
            serde_json::from_value(serde_json::json!({"continuation_token": "ct-1"})).unwrap();
        assert!(matches!(
            validate_start(Ok(body)),
            ResetPasswordStartValidatedResponse::Success { continuation_token } if continuation_token == "ct-1"
        ));
    }

    #[test]
    fn test_continue_invalid_code() {
        let validated = validate_continue(Err(api_error(serde_json::json!({
            "error": "invalid_grant",
            "suberror": "invalid_oob_value"
        }))));
        assert!(matches!(
            validated,
            ResetPasswordContinueValidatedResponse::InvalidCode(_)
        ));
    }

    #[test]
    fn test_submit_success_defaults_poll_interval() {
        let body: ResetPasswordSubmitResponse =
            serde_json::from_value(serde_json::json!({"continuation_token": "ct-2"})).unwrap();
        match validate_submit(Ok(body)) {
            ResetPasswordSubmitValidatedResponse::Success {
                continuation_token,
                poll_interval,
            } => {
                assert_eq!(continuation_token, "ct-2");
                assert_eq!(poll_interval, DEFAULT_POLL_INTERVAL_SECS);
            }
            other => panic!("expected Success, got {other:?}"),
        }
    }

    #[test]
    fn test_submit_password_policy_failure() {
        let validated = validate_submit(Err(api_error(serde_json::json!({
            "error": "invalid_grant",
            "suberror": "password_banned"
        }))));
        assert!(matches!(
            validated,
            ResetPasswordSubmitValidatedResponse::PasswordError(_)
        ));
    }

    #[test]
    fn test_poll_succeeded_with_token() {
        let body: ResetPasswordPollResponse = serde_json::from_value(serde_json::json!({
            "status": "succeeded",
            "continuation_token": "ct-signin"
        }))
        .unwrap();
        match validate_poll(Ok(body)) {
            ResetPasswordPollValidatedResponse::Success {
                status,
                continuation_token,
            } => {
                assert_eq!(status, PollStatus::Succeeded);
                assert_eq!(continuation_token.as_deref(), Some("ct-signin"));
            }
            other => panic!("expected Success, got {other:?}"),
        }
    }

    #[test]
    fn test_poll_unknown_status_is_unexpected() {
        let body: ResetPasswordPollResponse =
            serde_json::from_value(serde_json::json!({"status": "paused"})).unwrap();
        assert!(matches!(
            validate_poll(Ok(body)),
            ResetPasswordPollValidatedResponse::UnexpectedError(None)
        ));
    }
}
