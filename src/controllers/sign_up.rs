//! Sign-Up Controller

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use crate::controllers::sign_in::SignInController;
use crate::controllers::{execute_endpoint, unexpected_message};
use crate::error::public::messages;
use crate::error::{
    AttributesRequiredError, AttributesRequiredErrorKind, PasswordRequiredError,
    PasswordRequiredErrorKind, ResendCodeError, SignUpStartError, VerifyCodeError,
    VerifyCodeErrorKind,
};
use crate::network::providers::{GrantType, SignUpRequestProvider};
use crate::network::ApiClient;
use crate::states::{
    SignInAfterSignUpState, SignUpAttributesRequiredState, SignUpCodeRequiredState,
    SignUpPasswordRequiredState,
};
use crate::telemetry::{ApiId, EventHandle, FlowTelemetry};
use crate::types::responses::{ChannelType, RequiredAttribute};
use crate::types::{RequestContext, SignUpParameters, UserAttributes};
use crate::validators::sign_up::{
    validate_continue, validate_start, SignUpContinueValidatedResponse,
    SignUpStartValidatedResponse,
};
use crate::validators::{validate_challenge, ChallengeValidatedResponse};

/// Outcome of starting a sign-up flow.
pub enum SignUpStartResult {
    /// A one-time code was sent; submit it on the state.
    CodeRequired {
        state: SignUpCodeRequiredState,
        sent_to: String,
        channel: ChannelType,
        code_length: usize,
    },
    /// The server wants a password next.
    PasswordRequired { state: SignUpPasswordRequiredState },
    /// Submitted attributes failed validation; the flow did not start.
    AttributesInvalid { attributes: Vec<String> },
    Error { error: SignUpStartError },
}

/// Outcome of resending the sign-up code.
pub enum SignUpResendCodeResult {
    CodeRequired {
        state: SignUpCodeRequiredState,
        sent_to: String,
        channel: ChannelType,
        code_length: usize,
    },
    Error { error: ResendCodeError },
}

/// Outcome of submitting the sign-up one-time code.
pub enum SignUpSubmitCodeResult {
    /// Account created; sign in without re-authenticating via the state.
    Completed { state: SignInAfterSignUpState },
    /// The code was accepted but a password is now required.
    PasswordRequired { state: SignUpPasswordRequiredState },
    /// The code was accepted but profile attributes are still missing.
    AttributesRequired {
        state: SignUpAttributesRequiredState,
        attributes: Vec<RequiredAttribute>,
    },
    /// The code was rejected; retry on the state.
    InvalidCode {
        error: VerifyCodeError,
        state: SignUpCodeRequiredState,
    },
    Error { error: VerifyCodeError },
}

/// Outcome of submitting the sign-up password.
pub enum SignUpSubmitPasswordResult {
    Completed { state: SignInAfterSignUpState },
    AttributesRequired {
        state: SignUpAttributesRequiredState,
        attributes: Vec<RequiredAttribute>,
    },
    /// The password failed policy validation; retry on the state.
    InvalidPassword {
        error: PasswordRequiredError,
        state: SignUpPasswordRequiredState,
    },
    Error { error: PasswordRequiredError },
}

/// Outcome of submitting sign-up attributes.
pub enum SignUpSubmitAttributesResult {
    Completed { state: SignInAfterSignUpState },
    /// More attributes are still required.
    AttributesRequired {
        state: SignUpAttributesRequiredState,
        attributes: Vec<RequiredAttribute>,
    },
    /// The submitted attributes failed validation; retry on the state.
    AttributesInvalid {
        state: SignUpAttributesRequiredState,
        attributes: Vec<String>,
    },
    Error { error: AttributesRequiredError },
}

/// Orchestrates `/signup/v1.0/*` and hands completed flows to the sign-in
/// controller.
pub struct SignUpController {
    api_client: ApiClient,
    provider: SignUpRequestProvider,
    telemetry: Arc<dyn FlowTelemetry>,
    sign_in: Arc<SignInController>,
}

impl SignUpController {
    pub(crate) fn new(
        api_client: ApiClient,
        provider: SignUpRequestProvider,
        telemetry: Arc<dyn FlowTelemetry>,
        sign_in: Arc<SignInController>,
    ) -> Self {
        Self {
            api_client,
            provider,
            telemetry,
            sign_in,
        }
    }

    /// Start a sign-up flow. On success the challenge step runs immediately,
    /// so the outcome already names the first required input.
    pub async fn start(
        self: &Arc<Self>,
        parameters: &SignUpParameters,
    ) -> (SignUpStartResult, EventHandle) {
        let api_id = if parameters.password.is_some() {
            ApiId::SignUpWithPasswordStart
        } else {
            ApiId::SignUpStart
        };
        let event = EventHandle::new(api_id, self.telemetry.clone());
        let context = RequestContext::new(parameters.correlation_id);
        tracing::info!(username = %parameters.username, "starting sign-up flow");

        let request = self.provider.start(
            &parameters.username,
            parameters.password.as_ref(),
            parameters.attributes.as_ref(),
            &context,
        );
        let validated = match execute_endpoint(&self.api_client, request).await {
            Ok(result) => validate_start(result),
            Err(error) => {
                return (
                    SignUpStartResult::Error {
                        error: SignUpStartError::general_with_message(
                            error.to_string(),
                            context.correlation_id,
                        ),
                    },
                    event,
                )
            }
        };

        let result = match validated {
            SignUpStartValidatedResponse::Success { continuation_token } => {
                self.challenge_after_start(continuation_token, &parameters.username, &context)
                    .await
            }
            SignUpStartValidatedResponse::AttributeValidationFailed {
                invalid_attributes, ..
            } => SignUpStartResult::AttributesInvalid {
                attributes: invalid_attributes,
            },
            SignUpStartValidatedResponse::Redirect => SignUpStartResult::Error {
                error: SignUpStartError::browser_required(context.correlation_id),
            },
            SignUpStartValidatedResponse::Error(error) => SignUpStartResult::Error {
                error: SignUpStartError::from_api(&error, context.correlation_id),
            },
            SignUpStartValidatedResponse::UnexpectedError(error) => SignUpStartResult::Error {
                error: SignUpStartError::general_with_message(
                    unexpected_message(error.as_ref()),
                    context.correlation_id,
                ),
            },
        };
        (result, event)
    }

    async fn challenge_after_start(
        self: &Arc<Self>,
        continuation_token: String,
        username: &str,
        context: &RequestContext,
    ) -> SignUpStartResult {
        let request = self.provider.challenge(&continuation_token, context);
        let validated = match execute_endpoint(&self.api_client, request).await {
            Ok(result) => validate_challenge(result),
            Err(error) => {
                return SignUpStartResult::Error {
                    error: SignUpStartError::general_with_message(
                        error.to_string(),
                        context.correlation_id,
                    ),
                }
            }
        };

        match validated {
            ChallengeValidatedResponse::CodeRequired {
                continuation_token,
                sent_to,
                channel,
                code_length,
                ..
            } => SignUpStartResult::CodeRequired {
                state: SignUpCodeRequiredState::new(
                    self.clone(),
                    continuation_token,
                    username.to_string(),
                    context.correlation_id,
                ),
                sent_to,
                channel,
                code_length,
            },
            ChallengeValidatedResponse::PasswordRequired { continuation_token } => {
                SignUpStartResult::PasswordRequired {
                    state: SignUpPasswordRequiredState::new(
                        self.clone(),
                        continuation_token,
                        username.to_string(),
                        context.correlation_id,
                    ),
                }
            }
            ChallengeValidatedResponse::Redirect => SignUpStartResult::Error {
                error: SignUpStartError::browser_required(context.correlation_id),
            },
            ChallengeValidatedResponse::Error(error) => SignUpStartResult::Error {
                error: SignUpStartError::from_api(&error, context.correlation_id),
            },
            ChallengeValidatedResponse::UnexpectedError(error) => SignUpStartResult::Error {
                error: SignUpStartError::general_with_message(
                    unexpected_message(error.as_ref()),
                    context.correlation_id,
                ),
            },
        }
    }

    /// Re-issue the sign-up challenge to get a fresh code.
    pub async fn resend_code(
        self: &Arc<Self>,
        continuation_token: &str,
        username: &str,
        correlation_id: Uuid,
    ) -> (SignUpResendCodeResult, EventHandle) {
        let event = EventHandle::new(ApiId::SignUpResendCode, self.telemetry.clone());
        let context = RequestContext::new(Some(correlation_id));

        let request = self.provider.challenge(continuation_token, &context);
        let validated = match execute_endpoint(&self.api_client, request).await {
            Ok(result) => validate_challenge(result),
            Err(error) => {
                return (
                    SignUpResendCodeResult::Error {
                        error: ResendCodeError::general_with_message(
                            error.to_string(),
                            correlation_id,
                        ),
                    },
                    event,
                )
            }
        };

        let result = match validated {
            ChallengeValidatedResponse::CodeRequired {
                continuation_token,
                sent_to,
                channel,
                code_length,
                ..
            } => SignUpResendCodeResult::CodeRequired {
                state: SignUpCodeRequiredState::new(
                    self.clone(),
                    continuation_token,
                    username.to_string(),
                    correlation_id,
                ),
                sent_to,
                channel,
                code_length,
            },
            ChallengeValidatedResponse::Redirect => SignUpResendCodeResult::Error {
                error: ResendCodeError::browser_required(correlation_id),
            },
            ChallengeValidatedResponse::Error(error) => SignUpResendCodeResult::Error {
                error: ResendCodeError::from_api(&error, correlation_id),
            },
            ChallengeValidatedResponse::PasswordRequired { .. } => SignUpResendCodeResult::Error {
                error: ResendCodeError::general_with_message(
                    messages::UNEXPECTED_RESPONSE_BODY,
                    correlation_id,
                ),
            },
            ChallengeValidatedResponse::UnexpectedError(error) => SignUpResendCodeResult::Error {
                error: ResendCodeError::general_with_message(
                    unexpected_message(error.as_ref()),
                    correlation_id,
                ),
            },
        };
        (result, event)
    }

    /// Submit the one-time code for the sign-up flow.
    pub async fn submit_code(
        self: &Arc<Self>,
        code: &str,
        continuation_token: &str,
        username: &str,
        correlation_id: Uuid,
    ) -> (SignUpSubmitCodeResult, EventHandle) {
        let event = EventHandle::new(ApiId::SignUpSubmitCode, self.telemetry.clone());
        let context = RequestContext::new(Some(correlation_id));

        if code.trim().is_empty() {
            return (
                SignUpSubmitCodeResult::InvalidCode {
                    error: VerifyCodeError::new(
                        VerifyCodeErrorKind::InvalidCode,
                        Some(messages::EMPTY_CODE.to_string()),
                        correlation_id,
                    ),
                    state: SignUpCodeRequiredState::new(
                        self.clone(),
                        continuation_token.to_string(),
                        username.to_string(),
                        correlation_id,
                    ),
                },
                event,
            );
        }

        let request = self.provider.continue_with(
            continuation_token,
            GrantType::OobCode,
            None,
            Some(code),
            None,
            &context,
        );
        let validated = match execute_endpoint(&self.api_client, request).await {
            Ok(result) => validate_continue(result),
            Err(error) => {
                return (
                    SignUpSubmitCodeResult::Error {
                        error: VerifyCodeError::general_with_message(
                            error.to_string(),
                            correlation_id,
                        ),
                    },
                    event,
                )
            }
        };

        let result = match validated {
            SignUpContinueValidatedResponse::Success {
                continuation_token: sign_in_token,
            } => SignUpSubmitCodeResult::Completed {
                state: SignInAfterSignUpState::new(
                    self.sign_in.clone(),
                    sign_in_token,
                    username.to_string(),
                    correlation_id,
                ),
            },
            SignUpContinueValidatedResponse::CredentialRequired {
                continuation_token, ..
            } => {
                // One extra challenge round, no further re-entry.
                self.password_challenge_after_credential_required(
                    continuation_token,
                    username,
                    &context,
                )
                .await
            }
            SignUpContinueValidatedResponse::AttributesRequired {
                continuation_token,
                required_attributes,
                ..
            } => SignUpSubmitCodeResult::AttributesRequired {
                state: SignUpAttributesRequiredState::new(
                    self.clone(),
                    continuation_token,
                    username.to_string(),
                    correlation_id,
                ),
                attributes: required_attributes,
            },
            SignUpContinueValidatedResponse::InvalidUserInput(error) => {
                SignUpSubmitCodeResult::InvalidCode {
                    error: VerifyCodeError::from_api(&error, correlation_id),
                    state: SignUpCodeRequiredState::new(
                        self.clone(),
                        continuation_token.to_string(),
                        username.to_string(),
                        correlation_id,
                    ),
                }
            }
            SignUpContinueValidatedResponse::AttributeValidationFailed { error, .. } => {
                SignUpSubmitCodeResult::Error {
                    error: VerifyCodeError::from_api(&error, correlation_id),
                }
            }
            SignUpContinueValidatedResponse::Error(error) => SignUpSubmitCodeResult::Error {
                error: VerifyCodeError::from_api(&error, correlation_id),
            },
            SignUpContinueValidatedResponse::UnexpectedError(error) => {
                SignUpSubmitCodeResult::Error {
                    error: VerifyCodeError::general_with_message(
                        unexpected_message(error.as_ref()),
                        correlation_id,
                    ),
                }
            }
        };
        (result, event)
    }

    async fn password_challenge_after_credential_required(
        self: &Arc<Self>,
        continuation_token: String,
        username: &str,
        context: &RequestContext,
    ) -> SignUpSubmitCodeResult {
        let request = self.provider.challenge(&continuation_token, context);
        let validated = match execute_endpoint(&self.api_client, request).await {
            Ok(result) => validate_challenge(result),
            Err(error) => {
                return SignUpSubmitCodeResult::Error {
                    error: VerifyCodeError::general_with_message(
                        error.to_string(),
                        context.correlation_id,
                    ),
                }
            }
        };

        match validated {
            ChallengeValidatedResponse::PasswordRequired { continuation_token } => {
                SignUpSubmitCodeResult::PasswordRequired {
                    state: SignUpPasswordRequiredState::new(
                        self.clone(),
                        continuation_token,
                        username.to_string(),
                        context.correlation_id,
                    ),
                }
            }
            ChallengeValidatedResponse::Redirect => SignUpSubmitCodeResult::Error {
                error: VerifyCodeError::browser_required(context.correlation_id),
            },
            ChallengeValidatedResponse::Error(error) => SignUpSubmitCodeResult::Error {
                error: VerifyCodeError::from_api(&error, context.correlation_id),
            },
            // The code was already verified; a second code challenge makes no
            // sense here.
            ChallengeValidatedResponse::CodeRequired { .. } => SignUpSubmitCodeResult::Error {
                error: VerifyCodeError::general_with_message(
                    messages::UNEXPECTED_RESPONSE_BODY,
                    context.correlation_id,
                ),
            },
            ChallengeValidatedResponse::UnexpectedError(error) => SignUpSubmitCodeResult::Error {
                error: VerifyCodeError::general_with_message(
                    unexpected_message(error.as_ref()),
                    context.correlation_id,
                ),
            },
        }
    }

    /// Submit the password for the sign-up flow.
    pub async fn submit_password(
        self: &Arc<Self>,
        password: &SecretString,
        continuation_token: &str,
        username: &str,
        correlation_id: Uuid,
    ) -> (SignUpSubmitPasswordResult, EventHandle) {
        let event = EventHandle::new(ApiId::SignUpSubmitPassword, self.telemetry.clone());
        let context = RequestContext::new(Some(correlation_id));

        if password.expose_secret().is_empty() {
            return (
                SignUpSubmitPasswordResult::InvalidPassword {
                    error: PasswordRequiredError::new(
                        PasswordRequiredErrorKind::InvalidPassword,
                        Some(messages::EMPTY_PASSWORD.to_string()),
                        correlation_id,
                    ),
                    state: SignUpPasswordRequiredState::new(
                        self.clone(),
                        continuation_token.to_string(),
                        username.to_string(),
                        correlation_id,
                    ),
                },
                event,
            );
        }

        let request = self.provider.continue_with(
            continuation_token,
            GrantType::Password,
            Some(password),
            None,
            None,
            &context,
        );
        let validated = match execute_endpoint(&self.api_client, request).await {
            Ok(result) => validate_continue(result),
            Err(error) => {
                return (
                    SignUpSubmitPasswordResult::Error {
                        error: PasswordRequiredError::general_with_message(
                            error.to_string(),
                            correlation_id,
                        ),
                    },
                    event,
                )
            }
        };

        let result = match validated {
            SignUpContinueValidatedResponse::Success {
                continuation_token: sign_in_token,
            } => SignUpSubmitPasswordResult::Completed {
                state: SignInAfterSignUpState::new(
                    self.sign_in.clone(),
                    sign_in_token,
                    username.to_string(),
                    correlation_id,
                ),
            },
            SignUpContinueValidatedResponse::AttributesRequired {
                continuation_token,
                required_attributes,
                ..
            } => SignUpSubmitPasswordResult::AttributesRequired {
                state: SignUpAttributesRequiredState::new(
                    self.clone(),
                    continuation_token,
                    username.to_string(),
                    correlation_id,
                ),
                attributes: required_attributes,
            },
            SignUpContinueValidatedResponse::InvalidUserInput(error) => {
                SignUpSubmitPasswordResult::InvalidPassword {
                    error: PasswordRequiredError::from_api(&error, correlation_id),
                    state: SignUpPasswordRequiredState::new(
                        self.clone(),
                        continuation_token.to_string(),
                        username.to_string(),
                        correlation_id,
                    ),
                }
            }
            // The password was already supplied on this very call.
            SignUpContinueValidatedResponse::CredentialRequired { error, .. } => {
                SignUpSubmitPasswordResult::Error {
                    error: PasswordRequiredError::from_api(&error, correlation_id),
                }
            }
            SignUpContinueValidatedResponse::AttributeValidationFailed { error, .. } => {
                SignUpSubmitPasswordResult::Error {
                    error: PasswordRequiredError::from_api(&error, correlation_id),
                }
            }
            SignUpContinueValidatedResponse::Error(error) => SignUpSubmitPasswordResult::Error {
                error: PasswordRequiredError::from_api(&error, correlation_id),
            },
            SignUpContinueValidatedResponse::UnexpectedError(error) => {
                SignUpSubmitPasswordResult::Error {
                    error: PasswordRequiredError::general_with_message(
                        unexpected_message(error.as_ref()),
                        correlation_id,
                    ),
                }
            }
        };
        (result, event)
    }

    /// Submit profile attributes for the sign-up flow.
    pub async fn submit_attributes(
        self: &Arc<Self>,
        attributes: &UserAttributes,
        continuation_token: &str,
        username: &str,
        correlation_id: Uuid,
    ) -> (SignUpSubmitAttributesResult, EventHandle) {
        let event = EventHandle::new(ApiId::SignUpSubmitAttributes, self.telemetry.clone());
        let context = RequestContext::new(Some(correlation_id));

        if attributes.is_empty() {
            return (
                SignUpSubmitAttributesResult::Error {
                    error: AttributesRequiredError::new(
                        AttributesRequiredErrorKind::InvalidAttributes,
                        Some(messages::EMPTY_ATTRIBUTES.to_string()),
                        correlation_id,
                    ),
                },
                event,
            );
        }

        let request = self.provider.continue_with(
            continuation_token,
            GrantType::Attributes,
            None,
            None,
            Some(attributes),
            &context,
        );
        let validated = match execute_endpoint(&self.api_client, request).await {
            Ok(result) => validate_continue(result),
            Err(error) => {
                return (
                    SignUpSubmitAttributesResult::Error {
                        error: AttributesRequiredError::general_with_message(
                            error.to_string(),
                            correlation_id,
                        ),
                    },
                    event,
                )
            }
        };

        let result = match validated {
            SignUpContinueValidatedResponse::Success {
                continuation_token: sign_in_token,
            } => SignUpSubmitAttributesResult::Completed {
                state: SignInAfterSignUpState::new(
                    self.sign_in.clone(),
                    sign_in_token,
                    username.to_string(),
                    correlation_id,
                ),
            },
            SignUpContinueValidatedResponse::AttributesRequired {
                continuation_token,
                required_attributes,
                ..
            } => SignUpSubmitAttributesResult::AttributesRequired {
                state: SignUpAttributesRequiredState::new(
                    self.clone(),
                    continuation_token,
                    username.to_string(),
                    correlation_id,
                ),
                attributes: required_attributes,
            },
            SignUpContinueValidatedResponse::AttributeValidationFailed {
                invalid_attributes,
                ..
            } => SignUpSubmitAttributesResult::AttributesInvalid {
                // The original token stays valid for a corrected submission.
                state: SignUpAttributesRequiredState::new(
                    self.clone(),
                    continuation_token.to_string(),
                    username.to_string(),
                    correlation_id,
                ),
                attributes: invalid_attributes,
            },
            SignUpContinueValidatedResponse::InvalidUserInput(error)
            | SignUpContinueValidatedResponse::Error(error) => SignUpSubmitAttributesResult::Error {
                error: AttributesRequiredError::from_api(&error, correlation_id),
            },
            SignUpContinueValidatedResponse::CredentialRequired { error, .. } => {
                SignUpSubmitAttributesResult::Error {
                    error: AttributesRequiredError::from_api(&error, correlation_id),
                }
            }
            SignUpContinueValidatedResponse::UnexpectedError(error) => {
                SignUpSubmitAttributesResult::Error {
                    error: AttributesRequiredError::general_with_message(
                        unexpected_message(error.as_ref()),
                        correlation_id,
                    ),
                }
            }
        };
        (result, event)
    }
}
