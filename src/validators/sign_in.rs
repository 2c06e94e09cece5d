//! Sign-In and Token Response Validators
//!
//! The challenge endpoint shares [`validate_challenge`](super::validate_challenge)
//! with the other flows.

use crate::error::{ApiErrorResponse, Oauth2ErrorCode, SubErrorCode};
use crate::types::responses::{ChallengeTypeIssued, SignInInitiateResponse, TokenResponse};
use crate::validators::EndpointResult;

/// Validated outcome of `/oauth2/v2.0/initiate`.
#[derive(Clone, Debug)]
pub enum SignInInitiateValidatedResponse {
    Success { continuation_token: String },
    Redirect,
    Error(ApiErrorResponse),
    UnexpectedError(Option<ApiErrorResponse>),
}

pub fn validate_initiate(
    result: EndpointResult<SignInInitiateResponse>,
) -> SignInInitiateValidatedResponse {
    match result {
        Ok(body) => {
            if body.challenge_type == Some(ChallengeTypeIssued::Redirect) {
                return SignInInitiateValidatedResponse::Redirect;
            }
            match body.continuation_token {
                Some(continuation_token) => {
                    SignInInitiateValidatedResponse::Success { continuation_token }
                }
                None => SignInInitiateValidatedResponse::UnexpectedError(None),
            }
        }
        Err(error) => SignInInitiateValidatedResponse::Error(error),
    }
}

/// Validated outcome of `/oauth2/v2.0/token`.
#[derive(Clone, Debug)]
pub enum TokenValidatedResponse {
    Success(TokenResponse),
    /// The account has MFA enforced; the flow must move to the MFA
    /// challenge step with this token.
    MfaRequired {
        continuation_token: String,
        error: ApiErrorResponse,
    },
    Error(ApiErrorResponse),
    UnexpectedError(Option<ApiErrorResponse>),
}

pub fn validate_token(result: EndpointResult<TokenResponse>) -> TokenValidatedResponse {
    let error = match result {
        Ok(body) => return TokenValidatedResponse::Success(body),
        Err(error) => error,
    };

    let mfa_required = error.error == Oauth2ErrorCode::MfaRequired
        || error.suberror == Some(SubErrorCode::MfaRequired);
    if mfa_required {
        return match error.continuation_token.clone() {
            Some(continuation_token) => TokenValidatedResponse::MfaRequired {
                continuation_token,
                error,
            },
            None => TokenValidatedResponse::UnexpectedError(Some(error)),
        };
    }

    TokenValidatedResponse::Error(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorTag;

    fn api_error(json: serde_json::Value) -> ApiErrorResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_initiate_success() {
        let body: SignInInitiateResponse =
            serde_json::from_value(serde_json::json!({"continuation_token": "ct-1"})).unwrap();
        assert!(matches!(
            validate_initiate(Ok(body)),
            SignInInitiateValidatedResponse::Success { continuation_token } if continuation_token == "ct-1"
        ));
    }

    #[test]
    fn test_initiate_redirect() {
        let body: SignInInitiateResponse =
            serde_json::from_value(serde_json::json!({"challenge_type": "redirect"})).unwrap();
        assert!(matches!(
            validate_initiate(Ok(body)),
            SignInInitiateValidatedResponse::Redirect
        ));
    }

    #[test]
    fn test_initiate_user_not_found() {
        let validated = validate_initiate(Err(api_error(serde_json::json!({
            "error": "user_not_found"
        }))));
        match validated {
            SignInInitiateValidatedResponse::Error(error) => {
                assert_eq!(error.tag(), ErrorTag::UserNotFound);
            }
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[test]
    fn test_token_success() {
        let body: TokenResponse = serde_json::from_value(serde_json::json!({
            "access_token": "at",
            "token_type": "Bearer"
        }))
        .unwrap();
        assert!(matches!(
            validate_token(Ok(body)),
            TokenValidatedResponse::Success(_)
        ));
    }

    #[test]
    fn test_token_mfa_required() {
        let validated = validate_token(Err(api_error(serde_json::json!({
            "error": "mfa_required",
            "continuation_token": "ct-mfa"
        }))));
        assert!(matches!(
            validated,
            TokenValidatedResponse::MfaRequired { continuation_token, .. }
                if continuation_token == "ct-mfa"
        ));
    }

    #[test]
    fn test_token_mfa_required_without_token_is_unexpected() {
        let validated = validate_token(Err(api_error(serde_json::json!({
            "error": "mfa_required"
        }))));
        assert!(matches!(
            validated,
            TokenValidatedResponse::UnexpectedError(Some(_))
        ));
    }

    #[test]
    fn test_token_invalid_code() {
        let validated = validate_token(Err(api_error(serde_json::json!({
            "error": "invalid_grant",
            "suberror": "invalid_oob_value"
        }))));
        match validated {
            TokenValidatedResponse::Error(error) => {
                assert_eq!(error.tag(), ErrorTag::InvalidCode);
            }
            other => panic!("expected Error, got {other:?}"),
        }
    }
}
