//! Sign-Up Response Validators

use crate::error::{ApiErrorResponse, Oauth2ErrorCode, SubErrorCode};
use crate::types::responses::{
    ChallengeTypeIssued, RequiredAttribute, SignUpContinueResponse, SignUpStartResponse,
};
use crate::validators::EndpointResult;

/// Validated outcome of `/signup/v1.0/start`.
#[derive(Clone, Debug)]
pub enum SignUpStartValidatedResponse {
    Success {
        continuation_token: String,
    },
    /// One or more submitted attributes failed server-side validation.
    AttributeValidationFailed {
        error: ApiErrorResponse,
        invalid_attributes: Vec<String>,
    },
    Redirect,
    Error(ApiErrorResponse),
    UnexpectedError(Option<ApiErrorResponse>),
}

pub fn validate_start(
    result: EndpointResult<SignUpStartResponse>,
) -> SignUpStartValidatedResponse {
    match result {
        Ok(body) => {
            if body.challenge_type == Some(ChallengeTypeIssued::Redirect) {
                return SignUpStartValidatedResponse::Redirect;
            }
            match body.continuation_token {
                Some(continuation_token) => {
                    SignUpStartValidatedResponse::Success { continuation_token }
                }
                None => SignUpStartValidatedResponse::UnexpectedError(None),
            }
        }
        Err(error) => {
            if is_attribute_validation_failure(&error) {
                let invalid_attributes = error.invalid_attribute_names();
                if invalid_attributes.is_empty() {
                    return SignUpStartValidatedResponse::UnexpectedError(Some(error));
                }
                return SignUpStartValidatedResponse::AttributeValidationFailed {
                    error,
                    invalid_attributes,
                };
            }
            SignUpStartValidatedResponse::Error(error)
        }
    }
}

/// Validated outcome of `/signup/v1.0/continue`.
#[derive(Clone, Debug)]
pub enum SignUpContinueValidatedResponse {
    /// The submitted input was accepted. A continuation token is present
    /// unless this was the final step of the flow.
    Success {
        continuation_token: Option<String>,
    },
    /// The submitted code or password was rejected; the flow state stays
    /// usable for another attempt.
    InvalidUserInput(ApiErrorResponse),
    /// The server wants a fresh credential proof before continuing; the
    /// controller re-enters the challenge step.
    CredentialRequired {
        continuation_token: String,
        error: ApiErrorResponse,
    },
    /// The server needs more profile attributes before the account can be
    /// created.
    AttributesRequired {
        continuation_token: String,
        required_attributes: Vec<RequiredAttribute>,
        error: ApiErrorResponse,
    },
    AttributeValidationFailed {
        error: ApiErrorResponse,
        invalid_attributes: Vec<String>,
    },
    Error(ApiErrorResponse),
    UnexpectedError(Option<ApiErrorResponse>),
}

pub fn validate_continue(
    result: EndpointResult<SignUpContinueResponse>,
) -> SignUpContinueValidatedResponse {
    let error = match result {
        Ok(body) => {
            return SignUpContinueValidatedResponse::Success {
                continuation_token: body.continuation_token,
            }
        }
        Err(error) => error,
    };

    if is_attribute_validation_failure(&error) {
        let invalid_attributes = error.invalid_attribute_names();
        if invalid_attributes.is_empty() {
            return SignUpContinueValidatedResponse::UnexpectedError(Some(error));
        }
        return SignUpContinueValidatedResponse::AttributeValidationFailed {
            error,
            invalid_attributes,
        };
    }

    match error.error {
        Oauth2ErrorCode::CredentialRequired => match error.continuation_token.clone() {
            Some(continuation_token) => SignUpContinueValidatedResponse::CredentialRequired {
                continuation_token,
                error,
            },
            None => SignUpContinueValidatedResponse::UnexpectedError(Some(error)),
        },
        Oauth2ErrorCode::AttributesRequired => {
            match (
                error.continuation_token.clone(),
                error.required_attributes.clone(),
            ) {
                (Some(continuation_token), Some(required_attributes))
                    if !required_attributes.is_empty() =>
                {
                    SignUpContinueValidatedResponse::AttributesRequired {
                        continuation_token,
                        required_attributes,
                        error,
                    }
                }
                _ => SignUpContinueValidatedResponse::UnexpectedError(Some(error)),
            }
        }
        // A flow already past its verification step cannot be asked to verify
        // again; treat it as a broken response.
        Oauth2ErrorCode::VerificationRequired => {
            SignUpContinueValidatedResponse::UnexpectedError(Some(error))
        }
        Oauth2ErrorCode::InvalidOobValue => SignUpContinueValidatedResponse::InvalidUserInput(error),
        Oauth2ErrorCode::PasswordTooWeak
        | Oauth2ErrorCode::PasswordTooShort
        | Oauth2ErrorCode::PasswordTooLong
        | Oauth2ErrorCode::PasswordRecentlyUsed
        | Oauth2ErrorCode::PasswordBanned => SignUpContinueValidatedResponse::InvalidUserInput(error),
        Oauth2ErrorCode::InvalidGrant => {
            let refines_input = matches!(
                error.suberror,
                Some(SubErrorCode::InvalidOobValue)
            ) || error.suberror.map(|s| s.is_password_error()).unwrap_or(false);
            if refines_input {
                SignUpContinueValidatedResponse::InvalidUserInput(error)
            } else {
                SignUpContinueValidatedResponse::Error(error)
            }
        }
        _ => SignUpContinueValidatedResponse::Error(error),
    }
}

fn is_attribute_validation_failure(error: &ApiErrorResponse) -> bool {
    error.error == Oauth2ErrorCode::AttributeValidationFailed
        || error.suberror == Some(SubErrorCode::AttributeValidationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(json: serde_json::Value) -> ApiErrorResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_start_success() {
        let body: SignUpStartResponse =
            serde_json::from_value(serde_json::json!({"continuation_token": "ct-1"})).unwrap();
        assert!(matches!(
            validate_start(Ok(body)),
            SignUpStartValidatedResponse::Success { continuation_token } if continuation_token == "ct-1"
        ));
    }

    #[test]
    fn test_start_redirect() {
        let body: SignUpStartResponse =
            serde_json::from_value(serde_json::json!({"challenge_type": "redirect"})).unwrap();
        assert!(matches!(
            validate_start(Ok(body)),
            SignUpStartValidatedResponse::Redirect
        ));
    }

    #[test]
    fn test_start_missing_token_is_unexpected() {
        let body: SignUpStartResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(matches!(
            validate_start(Ok(body)),
            SignUpStartValidatedResponse::UnexpectedError(None)
        ));
    }

    #[test]
    fn test_start_attribute_validation_failed() {
        let validated = validate_start(Err(api_error(serde_json::json!({
            "error": "attribute_validation_failed",
            "invalid_attributes": [{"name": "city"}, {"name": "last_name"}]
        }))));
        match validated {
            SignUpStartValidatedResponse::AttributeValidationFailed {
                invalid_attributes, ..
            } => assert_eq!(invalid_attributes, vec!["city", "last_name"]),
            other => panic!("expected AttributeValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_start_attribute_validation_without_list_is_unexpected() {
        let validated = validate_start(Err(api_error(
            serde_json::json!({"error": "attribute_validation_failed"}),
        )));
        assert!(matches!(
            validated,
            SignUpStartValidatedResponse::UnexpectedError(Some(_))
        ));
    }

    #[test]
    fn test_continue_final_step_success_without_token() {
        let body: SignUpContinueResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(matches!(
            validate_continue(Ok(body)),
            SignUpContinueValidatedResponse::Success {
                continuation_token: None
            }
        ));
    }

    #[test]
    fn test_continue_invalid_oob() {
        let validated = validate_continue(Err(api_error(serde_json::json!({
            "error": "invalid_grant",
            "suberror": "invalid_oob_value"
        }))));
        assert!(matches!(
            validated,
            SignUpContinueValidatedResponse::InvalidUserInput(_)
        ));
    }

    #[test]
    fn test_continue_credential_required() {
        let validated = validate_continue(Err(api_error(serde_json::json!({
            "error": "credential_required",
            "continuation_token": "ct-5"
        }))));
        assert!(matches!(
            validated,
            SignUpContinueValidatedResponse::CredentialRequired { continuation_token, .. }
                if continuation_token == "ct-5"
        ));
    }

    #[test]
    fn test_continue_credential_required_without_token_is_unexpected() {
        let validated = validate_continue(Err(api_error(
            serde_json::json!({"error": "credential_required"}),
        )));
        assert!(matches!(
            validated,
            SignUpContinueValidatedResponse::UnexpectedError(Some(_))
        ));
    }

    #[test]
    fn test_continue_attributes_required() {
        let validated = validate_continue(Err(api_error(serde_json::json!({
            "error": "attributes_required",
            "continuation_token": "ct-6",
            "required_attributes": [{"name": "last_name", "type": "string", "required": true}]
        }))));
        match validated {
            SignUpContinueValidatedResponse::AttributesRequired {
                continuation_token,
                required_attributes,
                ..
            } => {
                assert_eq!(continuation_token, "ct-6");
                assert_eq!(required_attributes[0].name, "last_name");
            }
            other => panic!("expected AttributesRequired, got {other:?}"),
        }
    }

    #[test]
    fn test_continue_verification_required_is_unexpected() {
        let validated = validate_continue(Err(api_error(
            serde_json::json!({"error": "verification_required"}),
        )));
        assert!(matches!(
            validated,
            SignUpContinueValidatedResponse::UnexpectedError(Some(_))
        ));
    }

    #[test]
    fn test_continue_password_policy_failure_is_invalid_input() {
        let validated = validate_continue(Err(api_error(serde_json::json!({
            "error": "invalid_grant",
            "suberror": "password_too_weak"
        }))));
        assert!(matches!(
            validated,
            SignUpContinueValidatedResponse::InvalidUserInput(_)
        ));
    }
}
