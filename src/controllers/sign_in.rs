//! Sign-In Controller

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use crate::cache::TokenCache;
use crate::controllers::mfa::MfaController;
use crate::controllers::{execute_endpoint, unexpected_message};
use crate::error::public::messages;
use crate::error::{
    NativeAuthError, PasswordRequiredError, PasswordRequiredErrorKind, ResendCodeError,
    SignInAfterPreviousFlowError, SignInStartError, VerifyCodeError, VerifyCodeErrorKind,
};
use crate::network::providers::{GrantType, SignInRequestProvider, TokenRequestInput};
use crate::network::ApiClient;
use crate::states::{MfaRequiredState, SignInCodeRequiredState, SignInPasswordRequiredState};
use crate::telemetry::{ApiId, EventHandle, FlowTelemetry};
use crate::types::responses::{ChannelType, TokenResponse};
use crate::types::{RequestContext, SignInParameters, StoredTokens, UserAccountResult};
use crate::validators::sign_in::{
    validate_initiate, validate_token, SignInInitiateValidatedResponse, TokenValidatedResponse,
};
use crate::validators::{validate_challenge, ChallengeValidatedResponse};

/// Persist a successful token response and build the account result.
pub(crate) async fn persist_tokens(
    cache: &Arc<dyn TokenCache>,
    username: &str,
    response: &TokenResponse,
) -> Result<UserAccountResult, NativeAuthError> {
    cache
        .store(username, StoredTokens::from_token_response(response))
        .await?;
    Ok(UserAccountResult::from_token_response(username, response))
}

/// Outcome of starting a sign-in flow.
pub enum SignInStartResult {
    CodeRequired {
        state: SignInCodeRequiredState,
        sent_to: String,
        channel: ChannelType,
        code_length: usize,
    },
    PasswordRequired { state: SignInPasswordRequiredState },
    /// Password variant completed in one round trip.
    Completed { account: UserAccountResult },
    /// The account has MFA enforced; continue on the state.
    AwaitingMfa { state: MfaRequiredState },
    Error { error: SignInStartError },
}

/// Outcome of resending the sign-in code.
pub enum SignInResendCodeResult {
    CodeRequired {
        state: SignInCodeRequiredState,
        sent_to: String,
        channel: ChannelType,
        code_length: usize,
    },
    Error { error: ResendCodeError },
}

/// Outcome of submitting the sign-in one-time code.
pub enum SignInSubmitCodeResult {
    Completed { account: UserAccountResult },
    /// The code was rejected; retry on the state.
    InvalidCode {
        error: VerifyCodeError,
        state: SignInCodeRequiredState,
    },
    Error { error: VerifyCodeError },
}

/// Outcome of submitting the sign-in password.
pub enum SignInSubmitPasswordResult {
    Completed { account: UserAccountResult },
    AwaitingMfa { state: MfaRequiredState },
    /// The password was rejected; retry on the state.
    InvalidPassword {
        error: PasswordRequiredError,
        state: SignInPasswordRequiredState,
    },
    Error { error: PasswordRequiredError },
}

/// Outcome of the sign-in handoff after sign-up or password reset.
pub enum SignInAfterPreviousFlowResult {
    Completed { account: UserAccountResult },
    Error { error: SignInAfterPreviousFlowError },
}

/// Orchestrates `/oauth2/v2.0/*` for interactive sign-in and for the
/// continuation-token handoff from completed sign-up/reset flows.
pub struct SignInController {
    api_client: ApiClient,
    provider: SignInRequestProvider,
    telemetry: Arc<dyn FlowTelemetry>,
    cache: Arc<dyn TokenCache>,
    mfa: Arc<MfaController>,
}

impl SignInController {
    pub(crate) fn new(
        api_client: ApiClient,
        provider: SignInRequestProvider,
        telemetry: Arc<dyn FlowTelemetry>,
        cache: Arc<dyn TokenCache>,
        mfa: Arc<MfaController>,
    ) -> Self {
        Self {
            api_client,
            provider,
            telemetry,
            cache,
            mfa,
        }
    }

    /// Start a sign-in flow. Initiate runs first; the challenge step follows
    /// immediately, and the password variant goes all the way to the token
    /// endpoint when the server asks for a password.
    pub async fn start(
        self: &Arc<Self>,
        parameters: &SignInParameters,
    ) -> (SignInStartResult, EventHandle) {
        let api_id = if parameters.password.is_some() {
            ApiId::SignInWithPasswordStart
        } else {
            ApiId::SignInWithCodeStart
        };
        let event = EventHandle::new(api_id, self.telemetry.clone());
        let context = RequestContext::new(parameters.correlation_id);
        tracing::info!(username = %parameters.username, "starting sign-in flow");

        let request = self.provider.initiate(&parameters.username, &context);
        let validated = match execute_endpoint(&self.api_client, request).await {
            Ok(result) => validate_initiate(result),
            Err(error) => {
                return (
                    SignInStartResult::Error {
                        error: SignInStartError::general_with_message(
                            error.to_string(),
                            context.correlation_id,
                        ),
                    },
                    event,
                )
            }
        };

        let result = match validated {
            SignInInitiateValidatedResponse::Success { continuation_token } => {
                self.challenge_after_initiate(continuation_token, parameters, &context)
                    .await
            }
            SignInInitiateValidatedResponse::Redirect => SignInStartResult::Error {
                error: SignInStartError::browser_required(context.correlation_id),
            },
            SignInInitiateValidatedResponse::Error(error) => SignInStartResult::Error {
                error: SignInStartError::from_api(&error, context.correlation_id),
            },
            SignInInitiateValidatedResponse::UnexpectedError(error) => SignInStartResult::Error {
                error: SignInStartError::general_with_message(
                    unexpected_message(error.as_ref()),
                    context.correlation_id,
                ),
            },
        };
        (result, event)
    }

    async fn challenge_after_initiate(
        self: &Arc<Self>,
        continuation_token: String,
        parameters: &SignInParameters,
        context: &RequestContext,
    ) -> SignInStartResult {
        let request = self.provider.challenge(&continuation_token, context);
        let validated = match execute_endpoint(&self.api_client, request).await {
            Ok(result) => validate_challenge(result),
            Err(error) => {
                return SignInStartResult::Error {
                    error: SignInStartError::general_with_message(
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
            } => SignInStartResult::CodeRequired {
                state: SignInCodeRequiredState::new(
                    self.clone(),
                    continuation_token,
                    parameters.username.clone(),
                    parameters.scopes.clone(),
                    context.correlation_id,
                ),
                sent_to,
                channel,
                code_length,
            },
            ChallengeValidatedResponse::PasswordRequired { continuation_token } => {
                match &parameters.password {
                    Some(password) => {
                        self.token_with_password(
                            password,
                            &continuation_token,
                            &parameters.username,
                            &parameters.scopes,
                            context,
                        )
                        .await
                    }
                    None => SignInStartResult::PasswordRequired {
                        state: SignInPasswordRequiredState::new(
                            self.clone(),
                            continuation_token,
                            parameters.username.clone(),
                            parameters.scopes.clone(),
                            context.correlation_id,
                        ),
                    },
                }
            }
            ChallengeValidatedResponse::Redirect => SignInStartResult::Error {
                error: SignInStartError::browser_required(context.correlation_id),
            },
            ChallengeValidatedResponse::Error(error) => SignInStartResult::Error {
                error: SignInStartError::from_api(&error, context.correlation_id),
            },
            ChallengeValidatedResponse::UnexpectedError(error) => SignInStartResult::Error {
                error: SignInStartError::general_with_message(
                    unexpected_message(error.as_ref()),
                    context.correlation_id,
                ),
            },
        }
    }

    async fn token_with_password(
        self: &Arc<Self>,
        password: &SecretString,
        continuation_token: &str,
        username: &str,
        scopes: &[String],
        context: &RequestContext,
    ) -> SignInStartResult {
        let request = self.provider.token(
            TokenRequestInput {
                continuation_token,
                grant_type: Some(GrantType::Password),
                username: Some(username),
                password: Some(password),
                scopes,
                ..Default::default()
            },
            context,
        );
        let validated = match execute_endpoint(&self.api_client, request).await {
            Ok(result) => validate_token(result),
            Err(error) => {
                return SignInStartResult::Error {
                    error: SignInStartError::general_with_message(
                        error.to_string(),
                        context.correlation_id,
                    ),
                }
            }
        };

        match validated {
            TokenValidatedResponse::Success(response) => {
                match persist_tokens(&self.cache, username, &response).await {
                    Ok(account) => SignInStartResult::Completed { account },
                    Err(error) => SignInStartResult::Error {
                        error: SignInStartError::general_with_message(
                            error.to_string(),
                            context.correlation_id,
                        ),
                    },
                }
            }
            TokenValidatedResponse::MfaRequired {
                continuation_token, ..
            } => SignInStartResult::AwaitingMfa {
                state: MfaRequiredState::new(
                    self.mfa.clone(),
                    continuation_token,
                    username.to_string(),
                    scopes.to_vec(),
                    context.correlation_id,
                ),
            },
            TokenValidatedResponse::Error(error) => SignInStartResult::Error {
                error: SignInStartError::from_api(&error, context.correlation_id),
            },
            TokenValidatedResponse::UnexpectedError(error) => SignInStartResult::Error {
                error: SignInStartError::general_with_message(
                    unexpected_message(error.as_ref()),
                    context.correlation_id,
                ),
            },
        }
    }

    /// Re-issue the sign-in challenge to get a fresh code.
    pub async fn resend_code(
        self: &Arc<Self>,
        continuation_token: &str,
        username: &str,
        scopes: &[String],
        correlation_id: Uuid,
    ) -> (SignInResendCodeResult, EventHandle) {
        let event = EventHandle::new(ApiId::SignInResendCode, self.telemetry.clone());
        let context = RequestContext::new(Some(correlation_id));

        let request = self.provider.challenge(continuation_token, &context);
        let validated = match execute_endpoint(&self.api_client, request).await {
            Ok(result) => validate_challenge(result),
            Err(error) => {
                return (
                    SignInResendCodeResult::Error {
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
            } => SignInResendCodeResult::CodeRequired {
                state: SignInCodeRequiredState::new(
                    self.clone(),
                    continuation_token,
                    username.to_string(),
                    scopes.to_vec(),
                    correlation_id,
                ),
                sent_to,
                channel,
                code_length,
            },
            ChallengeValidatedResponse::Redirect => SignInResendCodeResult::Error {
                error: ResendCodeError::browser_required(correlation_id),
            },
            ChallengeValidatedResponse::Error(error) => SignInResendCodeResult::Error {
                error: ResendCodeError::from_api(&error, correlation_id),
            },
            ChallengeValidatedResponse::PasswordRequired { .. }
            | ChallengeValidatedResponse::UnexpectedError(_) => SignInResendCodeResult::Error {
                error: ResendCodeError::general_with_message(
                    messages::UNEXPECTED_RESPONSE_BODY,
                    correlation_id,
                ),
            },
        };
        (result, event)
    }

    /// Submit the one-time code for the sign-in flow.
    pub async fn submit_code(
        self: &Arc<Self>,
        code: &str,
        continuation_token: &str,
        username: &str,
        scopes: &[String],
        correlation_id: Uuid,
    ) -> (SignInSubmitCodeResult, EventHandle) {
        let event = EventHandle::new(ApiId::SignInSubmitCode, self.telemetry.clone());
        let context = RequestContext::new(Some(correlation_id));

        if code.trim().is_empty() {
            return (
                SignInSubmitCodeResult::InvalidCode {
                    error: VerifyCodeError::new(
                        VerifyCodeErrorKind::InvalidCode,
                        Some(messages::EMPTY_CODE.to_string()),
                        correlation_id,
                    ),
                    state: SignInCodeRequiredState::new(
                        self.clone(),
                        continuation_token.to_string(),
                        username.to_string(),
                        scopes.to_vec(),
                        correlation_id,
                    ),
                },
                event,
            );
        }

        let request = self.provider.token(
            TokenRequestInput {
                continuation_token,
                grant_type: Some(GrantType::OobCode),
                oob: Some(code),
                scopes,
                ..Default::default()
            },
            &context,
        );
        let validated = match execute_endpoint(&self.api_client, request).await {
            Ok(result) => validate_token(result),
            Err(error) => {
                return (
                    SignInSubmitCodeResult::Error {
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
            TokenValidatedResponse::Success(response) => {
                match persist_tokens(&self.cache, username, &response).await {
                    Ok(account) => SignInSubmitCodeResult::Completed { account },
                    Err(error) => SignInSubmitCodeResult::Error {
                        error: VerifyCodeError::general_with_message(
                            error.to_string(),
                            correlation_id,
                        ),
                    },
                }
            }
            TokenValidatedResponse::Error(error) => {
                let public = VerifyCodeError::from_api(&error, correlation_id);
                if public.kind() == VerifyCodeErrorKind::InvalidCode {
                    SignInSubmitCodeResult::InvalidCode {
                        error: public,
                        state: SignInCodeRequiredState::new(
                            self.clone(),
                            continuation_token.to_string(),
                            username.to_string(),
                            scopes.to_vec(),
                            correlation_id,
                        ),
                    }
                } else {
                    SignInSubmitCodeResult::Error { error: public }
                }
            }
            TokenValidatedResponse::MfaRequired { error, .. } => SignInSubmitCodeResult::Error {
                error: VerifyCodeError::from_api(&error, correlation_id),
            },
            TokenValidatedResponse::UnexpectedError(error) => SignInSubmitCodeResult::Error {
                error: VerifyCodeError::general_with_message(
                    unexpected_message(error.as_ref()),
                    correlation_id,
                ),
            },
        };
        (result, event)
    }

    /// Submit the password for the sign-in flow.
    pub async fn submit_password(
        self: &Arc<Self>,
        password: &SecretString,
        continuation_token: &str,
        username: &str,
        scopes: &[String],
        correlation_id: Uuid,
    ) -> (SignInSubmitPasswordResult, EventHandle) {
        let event = EventHandle::new(ApiId::SignInSubmitPassword, self.telemetry.clone());
        let context = RequestContext::new(Some(correlation_id));

        if password.expose_secret().is_empty() {
            return (
                SignInSubmitPasswordResult::InvalidPassword {
                    error: PasswordRequiredError::new(
                        PasswordRequiredErrorKind::InvalidPassword,
                        Some(messages::EMPTY_PASSWORD.to_string()),
                        correlation_id,
                    ),
                    state: SignInPasswordRequiredState::new(
                        self.clone(),
                        continuation_token.to_string(),
                        username.to_string(),
                        scopes.to_vec(),
                        correlation_id,
                    ),
                },
                event,
            );
        }

        let request = self.provider.token(
            TokenRequestInput {
                continuation_token,
                grant_type: Some(GrantType::Password),
                username: Some(username),
                password: Some(password),
                scopes,
                ..Default::default()
            },
            &context,
        );
        let validated = match execute_endpoint(&self.api_client, request).await {
            Ok(result) => validate_token(result),
            Err(error) => {
                return (
                    SignInSubmitPasswordResult::Error {
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
            TokenValidatedResponse::Success(response) => {
                match persist_tokens(&self.cache, username, &response).await {
                    Ok(account) => SignInSubmitPasswordResult::Completed { account },
                    Err(error) => SignInSubmitPasswordResult::Error {
                        error: PasswordRequiredError::general_with_message(
                            error.to_string(),
                            correlation_id,
                        ),
                    },
                }
            }
            TokenValidatedResponse::MfaRequired {
                continuation_token, ..
            } => SignInSubmitPasswordResult::AwaitingMfa {
                state: MfaRequiredState::new(
                    self.mfa.clone(),
                    continuation_token,
                    username.to_string(),
                    scopes.to_vec(),
                    correlation_id,
                ),
            },
            TokenValidatedResponse::Error(error) => {
                let public = PasswordRequiredError::from_api(&error, correlation_id);
                if public.kind() == PasswordRequiredErrorKind::InvalidPassword {
                    SignInSubmitPasswordResult::InvalidPassword {
                        error: public,
                        state: SignInPasswordRequiredState::new(
                            self.clone(),
                            continuation_token.to_string(),
                            username.to_string(),
                            scopes.to_vec(),
                            correlation_id,
                        ),
                    }
                } else {
                    SignInSubmitPasswordResult::Error { error: public }
                }
            }
            TokenValidatedResponse::UnexpectedError(error) => SignInSubmitPasswordResult::Error {
                error: PasswordRequiredError::general_with_message(
                    unexpected_message(error.as_ref()),
                    correlation_id,
                ),
            },
        };
        (result, event)
    }

    /// Complete sign-in from the continuation token handed back by a finished
    /// sign-up or password-reset flow.
    pub async fn sign_in_after_previous_flow(
        self: &Arc<Self>,
        continuation_token: Option<&str>,
        username: &str,
        scopes: &[String],
        api_id: ApiId,
        correlation_id: Uuid,
    ) -> (SignInAfterPreviousFlowResult, EventHandle) {
        let event = EventHandle::new(api_id, self.telemetry.clone());
        let context = RequestContext::new(Some(correlation_id));

        let Some(continuation_token) = continuation_token else {
            return (
                SignInAfterPreviousFlowResult::Error {
                    error: SignInAfterPreviousFlowError::general_with_message(
                        messages::FLOW_NOT_COMPLETED,
                        correlation_id,
                    ),
                },
                event,
            );
        };

        let request = self.provider.token(
            TokenRequestInput {
                continuation_token,
                grant_type: Some(GrantType::ContinuationToken),
                username: Some(username),
                scopes,
                ..Default::default()
            },
            &context,
        );
        let validated = match execute_endpoint(&self.api_client, request).await {
            Ok(result) => validate_token(result),
            Err(error) => {
                return (
                    SignInAfterPreviousFlowResult::Error {
                        error: SignInAfterPreviousFlowError::general_with_message(
                            error.to_string(),
                            correlation_id,
                        ),
                    },
                    event,
                )
            }
        };

        let result = match validated {
            TokenValidatedResponse::Success(response) => {
                match persist_tokens(&self.cache, username, &response).await {
                    Ok(account) => SignInAfterPreviousFlowResult::Completed { account },
                    Err(error) => SignInAfterPreviousFlowResult::Error {
                        error: SignInAfterPreviousFlowError::general_with_message(
                            error.to_string(),
                            correlation_id,
                        ),
                    },
                }
            }
            // MFA after a just-verified flow is not a continuable state here.
            TokenValidatedResponse::MfaRequired { error, .. } => {
                SignInAfterPreviousFlowResult::Error {
                    error: SignInAfterPreviousFlowError::from_api(&error, correlation_id),
                }
            }
            TokenValidatedResponse::Error(error) => SignInAfterPreviousFlowResult::Error {
                error: SignInAfterPreviousFlowError::from_api(&error, correlation_id),
            },
            TokenValidatedResponse::UnexpectedError(error) => SignInAfterPreviousFlowResult::Error {
                error: SignInAfterPreviousFlowError::general_with_message(
                    unexpected_message(error.as_ref()),
                    correlation_id,
                ),
            },
        };
        (result, event)
    }
}
