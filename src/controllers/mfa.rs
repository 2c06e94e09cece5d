//! MFA Controller
//!
//! Second-factor verification triggered when the token endpoint reports
//! `mfa_required`. Uses the oauth2 challenge/token endpoints with the
//! continuation token carried over from the interrupted sign-in.

use std::sync::Arc;

use uuid::Uuid;

use crate::cache::TokenCache;
use crate::controllers::sign_in::persist_tokens;
use crate::controllers::{execute_endpoint, unexpected_message};
use crate::error::public::messages;
use crate::error::{MfaError, MfaErrorKind};
use crate::network::providers::{GrantType, SignInRequestProvider, TokenRequestInput};
use crate::network::ApiClient;
use crate::states::MfaRequiredState;
use crate::telemetry::{ApiId, EventHandle, FlowTelemetry};
use crate::types::responses::ChannelType;
use crate::types::{RequestContext, UserAccountResult};
use crate::validators::sign_in::{validate_token, TokenValidatedResponse};
use crate::validators::{validate_challenge, ChallengeValidatedResponse};

/// Outcome of requesting an MFA challenge.
pub enum MfaSendChallengeResult {
    /// A code was sent to the default authentication method.
    CodeRequired {
        state: MfaRequiredState,
        sent_to: String,
        channel: ChannelType,
        code_length: usize,
    },
    Error { error: MfaError },
}

/// Outcome of submitting the MFA code.
pub enum MfaSubmitChallengeResult {
    Completed { account: UserAccountResult },
    /// The code was rejected; retry on the state.
    InvalidCode {
        error: MfaError,
        state: MfaRequiredState,
    },
    Error { error: MfaError },
}

pub struct MfaController {
    api_client: ApiClient,
    provider: SignInRequestProvider,
    telemetry: Arc<dyn FlowTelemetry>,
    cache: Arc<dyn TokenCache>,
}

impl MfaController {
    pub(crate) fn new(
        api_client: ApiClient,
        provider: SignInRequestProvider,
        telemetry: Arc<dyn FlowTelemetry>,
        cache: Arc<dyn TokenCache>,
    ) -> Self {
        Self {
            api_client,
            provider,
            telemetry,
            cache,
        }
    }

    /// Request an MFA challenge for the default authentication method.
    pub async fn send_challenge(
        self: &Arc<Self>,
        continuation_token: &str,
        username: &str,
        scopes: &[String],
        correlation_id: Uuid,
    ) -> (MfaSendChallengeResult, EventHandle) {
        let event = EventHandle::new(ApiId::MfaSendChallenge, self.telemetry.clone());
        let context = RequestContext::new(Some(correlation_id));

        let request = self.provider.challenge(continuation_token, &context);
        let validated = match execute_endpoint(&self.api_client, request).await {
            Ok(result) => validate_challenge(result),
            Err(error) => {
                return (
                    MfaSendChallengeResult::Error {
                        error: MfaError::general_with_message(error.to_string(), correlation_id),
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
            } => MfaSendChallengeResult::CodeRequired {
                state: MfaRequiredState::new(
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
            ChallengeValidatedResponse::Redirect => MfaSendChallengeResult::Error {
                error: MfaError::browser_required(correlation_id),
            },
            ChallengeValidatedResponse::Error(error) => MfaSendChallengeResult::Error {
                error: MfaError::from_api(&error, correlation_id),
            },
            // A password challenge cannot satisfy a second factor.
            ChallengeValidatedResponse::PasswordRequired { .. } => MfaSendChallengeResult::Error {
                error: MfaError::general_with_message(
                    messages::UNEXPECTED_RESPONSE_BODY,
                    correlation_id,
                ),
            },
            ChallengeValidatedResponse::UnexpectedError(error) => MfaSendChallengeResult::Error {
                error: MfaError::general_with_message(
                    unexpected_message(error.as_ref()),
                    correlation_id,
                ),
            },
        };
        (result, event)
    }

    /// Submit the MFA code to the token endpoint.
    pub async fn submit_challenge(
        self: &Arc<Self>,
        code: &str,
        continuation_token: &str,
        username: &str,
        scopes: &[String],
        correlation_id: Uuid,
    ) -> (MfaSubmitChallengeResult, EventHandle) {
        let event = EventHandle::new(ApiId::MfaSubmitChallenge, self.telemetry.clone());
        let context = RequestContext::new(Some(correlation_id));

        if code.trim().is_empty() {
            return (
                MfaSubmitChallengeResult::InvalidCode {
                    error: MfaError::new(
                        MfaErrorKind::InvalidCode,
                        Some(messages::EMPTY_CODE.to_string()),
                        correlation_id,
                    ),
                    state: MfaRequiredState::new(
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
                    MfaSubmitChallengeResult::Error {
                        error: MfaError::general_with_message(error.to_string(), correlation_id),
                    },
                    event,
                )
            }
        };

        let result = match validated {
            TokenValidatedResponse::Success(response) => {
                match persist_tokens(&self.cache, username, &response).await {
                    Ok(account) => MfaSubmitChallengeResult::Completed { account },
                    Err(error) => MfaSubmitChallengeResult::Error {
                        error: MfaError::general_with_message(error.to_string(), correlation_id),
                    },
                }
            }
            TokenValidatedResponse::Error(error) => {
                let public = MfaError::from_api(&error, correlation_id);
                if public.kind() == MfaErrorKind::InvalidCode {
                    MfaSubmitChallengeResult::InvalidCode {
                        error: public,
                        state: MfaRequiredState::new(
                            self.clone(),
                            continuation_token.to_string(),
                            username.to_string(),
                            scopes.to_vec(),
                            correlation_id,
                        ),
                    }
                } else {
                    MfaSubmitChallengeResult::Error { error: public }
                }
            }
            // A second mfa_required loop on the same flow is not continuable.
            TokenValidatedResponse::MfaRequired { error, .. } => MfaSubmitChallengeResult::Error {
                error: MfaError::from_api(&error, correlation_id),
            },
            TokenValidatedResponse::UnexpectedError(error) => MfaSubmitChallengeResult::Error {
                error: MfaError::general_with_message(
                    unexpected_message(error.as_ref()),
                    correlation_id,
                ),
            },
        };
        (result, event)
    }
}
