//! Reset-Password Controller

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use crate::controllers::sign_in::SignInController;
use crate::controllers::{execute_endpoint, unexpected_message};
use crate::error::public::messages;
use crate::error::{
    PasswordRequiredError, PasswordRequiredErrorKind, ResendCodeError, ResetPasswordStartError,
    VerifyCodeError, VerifyCodeErrorKind,
};
use crate::network::providers::ResetPasswordRequestProvider;
use crate::network::ApiClient;
use crate::states::{
    ResetPasswordCodeRequiredState, ResetPasswordRequiredState, SignInAfterResetPasswordState,
};
use crate::telemetry::{ApiId, EventHandle, FlowTelemetry};
use crate::types::responses::{ChannelType, PollStatus};
use crate::types::{RequestContext, ResetPasswordParameters};
use crate::validators::reset_password::{
    validate_continue, validate_poll, validate_start, validate_submit,
    ResetPasswordContinueValidatedResponse, ResetPasswordPollValidatedResponse,
    ResetPasswordStartValidatedResponse, ResetPasswordSubmitValidatedResponse,
};
use crate::validators::{validate_challenge, ChallengeValidatedResponse};

/// Maximum poll_completion attempts after the new password is submitted.
const MAX_POLL_ATTEMPTS: u32 = 5;

/// Outcome of starting a password-reset flow.
pub enum ResetPasswordStartResult {
    CodeRequired {
        state: ResetPasswordCodeRequiredState,
        sent_to: String,
        channel: ChannelType,
        code_length: usize,
    },
    Error { error: ResetPasswordStartError },
}

/// Outcome of resending the reset code.
pub enum ResetPasswordResendCodeResult {
    CodeRequired {
        state: ResetPasswordCodeRequiredState,
        sent_to: String,
        channel: ChannelType,
        code_length: usize,
    },
    Error { error: ResendCodeError },
}

/// Outcome of submitting the reset code.
pub enum ResetPasswordSubmitCodeResult {
    /// The code was accepted; set the new password on the state.
    PasswordRequired { state: ResetPasswordRequiredState },
    /// The code was rejected; retry on the state.
    InvalidCode {
        error: VerifyCodeError,
        state: ResetPasswordCodeRequiredState,
    },
    Error { error: VerifyCodeError },
}

/// Outcome of submitting the new password.
pub enum ResetPasswordSubmitPasswordResult {
    /// The reset completed; sign in without re-authenticating via the state.
    Completed { state: SignInAfterResetPasswordState },
    /// The new password failed policy validation; retry on the state.
    InvalidPassword {
        error: PasswordRequiredError,
        state: ResetPasswordRequiredState,
    },
    Error { error: PasswordRequiredError },
}

/// Orchestrates `/resetpassword/v1.0/*` including the bounded completion
/// poll, and hands completed flows to the sign-in controller.
pub struct ResetPasswordController {
    api_client: ApiClient,
    provider: ResetPasswordRequestProvider,
    telemetry: Arc<dyn FlowTelemetry>,
    sign_in: Arc<SignInController>,
}

impl ResetPasswordController {
    pub(crate) fn new(
        api_client: ApiClient,
        provider: ResetPasswordRequestProvider,
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

    /// Start a password-reset flow. The challenge step runs immediately after
    /// start, so a successful outcome already has the code on its way.
    pub async fn start(
        self: &Arc<Self>,
        parameters: &ResetPasswordParameters,
    ) -> (ResetPasswordStartResult, EventHandle) {
        let event = EventHandle::new(ApiId::ResetPasswordStart, self.telemetry.clone());
        let context = RequestContext::new(parameters.correlation_id);
        tracing::info!(username = %parameters.username, "starting password-reset flow");

        let request = self.provider.start(&parameters.username, &context);
        let validated = match execute_endpoint(&self.api_client, request).await {
            Ok(result) => validate_start(result),
            Err(error) => {
                return (
                    ResetPasswordStartResult::Error {
                        error: ResetPasswordStartError::general_with_message(
                            error.to_string(),
                            context.correlation_id,
                        ),
                    },
                    event,
                )
            }
        };

        let result = match validated {
            ResetPasswordStartValidatedResponse::Success { continuation_token } => {
                self.challenge_after_start(continuation_token, &parameters.username, &context)
                    .await
            }
            ResetPasswordStartValidatedResponse::Redirect => ResetPasswordStartResult::Error {
                error: ResetPasswordStartError::browser_required(context.correlation_id),
            },
            ResetPasswordStartValidatedResponse::Error(error) => ResetPasswordStartResult::Error {
                error: ResetPasswordStartError::from_api(&error, context.correlation_id),
            },
            ResetPasswordStartValidatedResponse::UnexpectedError(error) => {
                ResetPasswordStartResult::Error {
                    error: ResetPasswordStartError::general_with_message(
                        unexpected_message(error.as_ref()),
                        context.correlation_id,
                    ),
                }
            }
        };
        (result, event)
    }

    async fn challenge_after_start(
        self: &Arc<Self>,
        continuation_token: String,
        username: &str,
        context: &RequestContext,
    ) -> ResetPasswordStartResult {
        let request = self.provider.challenge(&continuation_token, context);
        let validated = match execute_endpoint(&self.api_client, request).await {
            Ok(result) => validate_challenge(result),
            Err(error) => {
                return ResetPasswordStartResult::Error {
                    error: ResetPasswordStartError::general_with_message(
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
            } => ResetPasswordStartResult::CodeRequired {
                state: ResetPasswordCodeRequiredState::new(
                    self.clone(),
                    continuation_token,
                    username.to_string(),
                    context.correlation_id,
                ),
                sent_to,
                channel,
                code_length,
            },
            ChallengeValidatedResponse::Redirect => ResetPasswordStartResult::Error {
                error: ResetPasswordStartError::browser_required(context.correlation_id),
            },
            ChallengeValidatedResponse::Error(error) => ResetPasswordStartResult::Error {
                error: ResetPasswordStartError::from_api(&error, context.correlation_id),
            },
            // Password reset is verified by code only.
            ChallengeValidatedResponse::PasswordRequired { .. }
            | ChallengeValidatedResponse::UnexpectedError(_) => ResetPasswordStartResult::Error {
                error: ResetPasswordStartError::general_with_message(
                    messages::UNEXPECTED_RESPONSE_BODY,
                    context.correlation_id,
                ),
            },
        }
    }

    /// Re-issue the reset challenge to get a fresh code.
    pub async fn resend_code(
        self: &Arc<Self>,
        continuation_token: &str,
        username: &str,
        correlation_id: Uuid,
    ) -> (ResetPasswordResendCodeResult, EventHandle) {
        let event = EventHandle::new(ApiId::ResetPasswordResendCode, self.telemetry.clone());
        let context = RequestContext::new(Some(correlation_id));

        let request = self.provider.challenge(continuation_token, &context);
        let validated = match execute_endpoint(&self.api_client, request).await {
            Ok(result) => validate_challenge(result),
            Err(error) => {
                return (
                    ResetPasswordResendCodeResult::Error {
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
            } => ResetPasswordResendCodeResult::CodeRequired {
                state: ResetPasswordCodeRequiredState::new(
                    self.clone(),
                    continuation_token,
                    username.to_string(),
                    correlation_id,
                ),
                sent_to,
                channel,
                code_length,
            },
            ChallengeValidatedResponse::Redirect => ResetPasswordResendCodeResult::Error {
                error: ResendCodeError::browser_required(correlation_id),
            },
            ChallengeValidatedResponse::Error(error) => ResetPasswordResendCodeResult::Error {
                error: ResendCodeError::from_api(&error, correlation_id),
            },
            ChallengeValidatedResponse::PasswordRequired { .. }
            | ChallengeValidatedResponse::UnexpectedError(_) => {
                ResetPasswordResendCodeResult::Error {
                    error: ResendCodeError::general_with_message(
                        messages::UNEXPECTED_RESPONSE_BODY,
                        correlation_id,
                    ),
                }
            }
        };
        (result, event)
    }

    /// Submit the one-time code for the reset flow.
    pub async fn submit_code(
        self: &Arc<Self>,
        code: &str,
        continuation_token: &str,
        username: &str,
        correlation_id: Uuid,
    ) -> (ResetPasswordSubmitCodeResult, EventHandle) {
        let event = EventHandle::new(ApiId::ResetPasswordSubmitCode, self.telemetry.clone());
        let context = RequestContext::new(Some(correlation_id));

        if code.trim().is_empty() {
            return (
                ResetPasswordSubmitCodeResult::InvalidCode {
                    error: VerifyCodeError::new(
                        VerifyCodeErrorKind::InvalidCode,
                        Some(messages::EMPTY_CODE.to_string()),
                        correlation_id,
                    ),
                    state: ResetPasswordCodeRequiredState::new(
                        self.clone(),
                        continuation_token.to_string(),
                        username.to_string(),
                        correlation_id,
                    ),
                },
                event,
            );
        }

        let request = self
            .provider
            .continue_with_code(continuation_token, code, &context);
        let validated = match execute_endpoint(&self.api_client, request).await {
            Ok(result) => validate_continue(result),
            Err(error) => {
                return (
                    ResetPasswordSubmitCodeResult::Error {
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
            ResetPasswordContinueValidatedResponse::Success { continuation_token } => {
                ResetPasswordSubmitCodeResult::PasswordRequired {
                    state: ResetPasswordRequiredState::new(
                        self.clone(),
                        continuation_token,
                        username.to_string(),
                        correlation_id,
                    ),
                }
            }
            ResetPasswordContinueValidatedResponse::InvalidCode(error) => {
                ResetPasswordSubmitCodeResult::InvalidCode {
                    error: VerifyCodeError::from_api(&error, correlation_id),
                    state: ResetPasswordCodeRequiredState::new(
                        self.clone(),
                        continuation_token.to_string(),
                        username.to_string(),
                        correlation_id,
                    ),
                }
            }
            ResetPasswordContinueValidatedResponse::Error(error) => {
                ResetPasswordSubmitCodeResult::Error {
                    error: VerifyCodeError::from_api(&error, correlation_id),
                }
            }
            ResetPasswordContinueValidatedResponse::UnexpectedError(error) => {
                ResetPasswordSubmitCodeResult::Error {
                    error: VerifyCodeError::general_with_message(
                        unexpected_message(error.as_ref()),
                        correlation_id,
                    ),
                }
            }
        };
        (result, event)
    }

    /// Submit the new password and poll until the reset completes.
    pub async fn submit_password(
        self: &Arc<Self>,
        new_password: &SecretString,
        continuation_token: &str,
        username: &str,
        correlation_id: Uuid,
    ) -> (ResetPasswordSubmitPasswordResult, EventHandle) {
        let event = EventHandle::new(ApiId::ResetPasswordSubmit, self.telemetry.clone());
        let context = RequestContext::new(Some(correlation_id));

        if new_password.expose_secret().is_empty() {
            return (
                ResetPasswordSubmitPasswordResult::InvalidPassword {
                    error: PasswordRequiredError::new(
                        PasswordRequiredErrorKind::InvalidPassword,
                        Some(messages::EMPTY_PASSWORD.to_string()),
                        correlation_id,
                    ),
                    state: ResetPasswordRequiredState::new(
                        self.clone(),
                        continuation_token.to_string(),
                        username.to_string(),
                        correlation_id,
                    ),
                },
                event,
            );
        }

        let request = self
            .provider
            .submit(continuation_token, new_password, &context);
        let validated = match execute_endpoint(&self.api_client, request).await {
            Ok(result) => validate_submit(result),
            Err(error) => {
                return (
                    ResetPasswordSubmitPasswordResult::Error {
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
            ResetPasswordSubmitValidatedResponse::Success {
                continuation_token,
                poll_interval,
            } => {
                self.poll_completion(continuation_token, poll_interval, username, &context)
                    .await
            }
            ResetPasswordSubmitValidatedResponse::PasswordError(error) => {
                ResetPasswordSubmitPasswordResult::InvalidPassword {
                    error: PasswordRequiredError::from_api(&error, correlation_id),
                    state: ResetPasswordRequiredState::new(
                        self.clone(),
                        continuation_token.to_string(),
                        username.to_string(),
                        correlation_id,
                    ),
                }
            }
            ResetPasswordSubmitValidatedResponse::Error(error) => {
                ResetPasswordSubmitPasswordResult::Error {
                    error: PasswordRequiredError::from_api(&error, correlation_id),
                }
            }
            ResetPasswordSubmitValidatedResponse::UnexpectedError(error) => {
                ResetPasswordSubmitPasswordResult::Error {
                    error: PasswordRequiredError::general_with_message(
                        unexpected_message(error.as_ref()),
                        correlation_id,
                    ),
                }
            }
        };
        (result, event)
    }

    /// Poll `/poll_completion` until the reset succeeds, fails, or the
    /// attempt budget runs out. Waits the server-provided interval before
    /// every attempt.
    async fn poll_completion(
        self: &Arc<Self>,
        mut continuation_token: String,
        poll_interval: u64,
        username: &str,
        context: &RequestContext,
    ) -> ResetPasswordSubmitPasswordResult {
        for attempt in 1..=MAX_POLL_ATTEMPTS {
            tokio::time::sleep(Duration::from_secs(poll_interval)).await;

            let request = self.provider.poll_completion(&continuation_token, context);
            let validated = match execute_endpoint(&self.api_client, request).await {
                Ok(result) => validate_poll(result),
                Err(error) => {
                    return ResetPasswordSubmitPasswordResult::Error {
                        error: PasswordRequiredError::general_with_message(
                            error.to_string(),
                            context.correlation_id,
                        ),
                    }
                }
            };

            match validated {
                ResetPasswordPollValidatedResponse::Success {
                    status: PollStatus::Succeeded,
                    continuation_token: sign_in_token,
                } => {
                    return ResetPasswordSubmitPasswordResult::Completed {
                        state: SignInAfterResetPasswordState::new(
                            self.sign_in.clone(),
                            sign_in_token,
                            username.to_string(),
                            context.correlation_id,
                        ),
                    }
                }
                ResetPasswordPollValidatedResponse::Success {
                    status: PollStatus::Failed,
                    ..
                } => {
                    return ResetPasswordSubmitPasswordResult::Error {
                        error: PasswordRequiredError::general_with_message(
                            "Password reset failed on the server.",
                            context.correlation_id,
                        ),
                    }
                }
                ResetPasswordPollValidatedResponse::Success {
                    continuation_token: next_token,
                    ..
                } => {
                    tracing::debug!(attempt, "password reset still in progress");
                    if let Some(next_token) = next_token {
                        continuation_token = next_token;
                    }
                }
                ResetPasswordPollValidatedResponse::Error(error) => {
                    return ResetPasswordSubmitPasswordResult::Error {
                        error: PasswordRequiredError::from_api(&error, context.correlation_id),
                    }
                }
                ResetPasswordPollValidatedResponse::UnexpectedError(error) => {
                    return ResetPasswordSubmitPasswordResult::Error {
                        error: PasswordRequiredError::general_with_message(
                            unexpected_message(error.as_ref()),
                            context.correlation_id,
                        ),
                    }
                }
            }
        }

        ResetPasswordSubmitPasswordResult::Error {
            error: PasswordRequiredError::general_with_message(
                messages::FLOW_NOT_COMPLETED,
                context.correlation_id,
            ),
        }
    }
}
