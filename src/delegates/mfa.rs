//! MFA Delegates

use async_trait::async_trait;
use uuid::Uuid;

use crate::controllers::{MfaSendChallengeResult, MfaSubmitChallengeResult};
use crate::delegates::Dispatch;
use crate::error::public::messages;
use crate::error::MfaError;
use crate::states::MfaRequiredState;
use crate::telemetry::EventHandle;
use crate::types::responses::ChannelType;
use crate::types::UserAccountResult;

/// Delegate for requesting an MFA challenge.
#[async_trait]
pub trait MfaSendChallengeDelegate: Send + Sync {
    /// Mandatory error callback.
    async fn on_mfa_send_challenge_error(&self, error: MfaError);

    async fn on_mfa_code_required(
        &self,
        state: MfaRequiredState,
        sent_to: String,
        channel: ChannelType,
        code_length: usize,
    ) -> Dispatch {
        let _ = (state, sent_to, channel, code_length);
        Dispatch::Declined
    }
}

pub(crate) async fn dispatch_send_challenge<D: MfaSendChallengeDelegate + ?Sized>(
    result: MfaSendChallengeResult,
    event: EventHandle,
    delegate: &D,
    correlation_id: Uuid,
) {
    match result {
        MfaSendChallengeResult::CodeRequired {
            state,
            sent_to,
            channel,
            code_length,
        } => {
            match delegate
                .on_mfa_code_required(state, sent_to, channel, code_length)
                .await
            {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_mfa_code_required";
                    event.failure(method);
                    delegate
                        .on_mfa_send_challenge_error(MfaError::general_with_message(
                            messages::not_implemented(method),
                            correlation_id,
                        ))
                        .await;
                }
            }
        }
        MfaSendChallengeResult::Error { error } => {
            event.failure(format!("{:?}", error.kind()));
            delegate.on_mfa_send_challenge_error(error).await;
        }
    }
}

/// Delegate for submitting the MFA code.
#[async_trait]
pub trait MfaSubmitChallengeDelegate: Send + Sync {
    /// Mandatory error callback. A retryable state accompanies invalid-code
    /// errors.
    async fn on_mfa_submit_challenge_error(&self, error: MfaError, state: Option<MfaRequiredState>);

    async fn on_sign_in_completed(&self, account: UserAccountResult) -> Dispatch {
        let _ = account;
        Dispatch::Declined
    }
}

pub(crate) async fn dispatch_submit_challenge<D: MfaSubmitChallengeDelegate + ?Sized>(
    result: MfaSubmitChallengeResult,
    event: EventHandle,
    delegate: &D,
    correlation_id: Uuid,
) {
    match result {
        MfaSubmitChallengeResult::Completed { account } => {
            match delegate.on_sign_in_completed(account).await {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_sign_in_completed";
                    event.failure(method);
                    delegate
                        .on_mfa_submit_challenge_error(
                            MfaError::general_with_message(
                                messages::not_implemented(method),
                                correlation_id,
                            ),
                            None,
                        )
                        .await;
                }
            }
        }
        MfaSubmitChallengeResult::InvalidCode { error, state } => {
            event.failure(format!("{:?}", error.kind()));
            delegate
                .on_mfa_submit_challenge_error(error, Some(state))
                .await;
        }
        MfaSubmitChallengeResult::Error { error } => {
            event.failure(format!("{:?}", error.kind()));
            delegate.on_mfa_submit_challenge_error(error, None).await;
        }
    }
}
