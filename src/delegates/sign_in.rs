//! Sign-In Delegates

use async_trait::async_trait;
use uuid::Uuid;

use crate::controllers::{
    SignInAfterPreviousFlowResult, SignInResendCodeResult, SignInStartResult,
    SignInSubmitCodeResult, SignInSubmitPasswordResult,
};
use crate::delegates::Dispatch;
use crate::error::public::messages;
use crate::error::{
    PasswordRequiredError, ResendCodeError, SignInAfterPreviousFlowError, SignInStartError,
    VerifyCodeError,
};
use crate::states::{MfaRequiredState, SignInCodeRequiredState, SignInPasswordRequiredState};
use crate::telemetry::EventHandle;
use crate::types::responses::ChannelType;
use crate::types::UserAccountResult;

/// Delegate for the start of a sign-in flow.
#[async_trait]
pub trait SignInStartDelegate: Send + Sync {
    /// Mandatory error callback.
    async fn on_sign_in_start_error(&self, error: SignInStartError);

    async fn on_sign_in_code_required(
        &self,
        state: SignInCodeRequiredState,
        sent_to: String,
        channel: ChannelType,
        code_length: usize,
    ) -> Dispatch {
        let _ = (state, sent_to, channel, code_length);
        Dispatch::Declined
    }

    async fn on_sign_in_password_required(&self, state: SignInPasswordRequiredState) -> Dispatch {
        let _ = state;
        Dispatch::Declined
    }

    async fn on_sign_in_completed(&self, account: UserAccountResult) -> Dispatch {
        let _ = account;
        Dispatch::Declined
    }

    async fn on_sign_in_awaiting_mfa(&self, state: MfaRequiredState) -> Dispatch {
        let _ = state;
        Dispatch::Declined
    }
}

pub(crate) async fn dispatch_start<D: SignInStartDelegate + ?Sized>(
    result: SignInStartResult,
    event: EventHandle,
    delegate: &D,
    correlation_id: Uuid,
) {
    let declined = |method: &'static str| {
        SignInStartError::general_with_message(messages::not_implemented(method), correlation_id)
    };
    match result {
        SignInStartResult::CodeRequired {
            state,
            sent_to,
            channel,
            code_length,
        } => {
            match delegate
                .on_sign_in_code_required(state, sent_to, channel, code_length)
                .await
            {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_sign_in_code_required";
                    event.failure(method);
                    delegate.on_sign_in_start_error(declined(method)).await;
                }
            }
        }
        SignInStartResult::PasswordRequired { state } => {
            match delegate.on_sign_in_password_required(state).await {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_sign_in_password_required";
                    event.failure(method);
                    delegate.on_sign_in_start_error(declined(method)).await;
                }
            }
        }
        SignInStartResult::Completed { account } => {
            match delegate.on_sign_in_completed(account).await {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_sign_in_completed";
                    event.failure(method);
                    delegate.on_sign_in_start_error(declined(method)).await;
                }
            }
        }
        SignInStartResult::AwaitingMfa { state } => {
            match delegate.on_sign_in_awaiting_mfa(state).await {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_sign_in_awaiting_mfa";
                    event.failure(method);
                    delegate.on_sign_in_start_error(declined(method)).await;
                }
            }
        }
        SignInStartResult::Error { error } => {
            event.failure(format!("{:?}", error.kind()));
            delegate.on_sign_in_start_error(error).await;
        }
    }
}

/// Delegate for submitting the sign-in one-time code.
#[async_trait]
pub trait SignInVerifyCodeDelegate: Send + Sync {
    /// Mandatory error callback. A retryable state accompanies invalid-code
    /// errors.
    async fn on_sign_in_verify_code_error(
        &self,
        error: VerifyCodeError,
        state: Option<SignInCodeRequiredState>,
    );

    async fn on_sign_in_completed(&self, account: UserAccountResult) -> Dispatch {
        let _ = account;
        Dispatch::Declined
    }
}

pub(crate) async fn dispatch_submit_code<D: SignInVerifyCodeDelegate + ?Sized>(
    result: SignInSubmitCodeResult,
    event: EventHandle,
    delegate: &D,
    correlation_id: Uuid,
) {
    match result {
        SignInSubmitCodeResult::Completed { account } => {
            match delegate.on_sign_in_completed(account).await {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_sign_in_completed";
                    event.failure(method);
                    delegate
                        .on_sign_in_verify_code_error(
                            VerifyCodeError::general_with_message(
                                messages::not_implemented(method),
                                correlation_id,
                            ),
                            None,
                        )
                        .await;
                }
            }
        }
        SignInSubmitCodeResult::InvalidCode { error, state } => {
            event.failure(format!("{:?}", error.kind()));
            delegate
                .on_sign_in_verify_code_error(error, Some(state))
                .await;
        }
        SignInSubmitCodeResult::Error { error } => {
            event.failure(format!("{:?}", error.kind()));
            delegate.on_sign_in_verify_code_error(error, None).await;
        }
    }
}

/// Delegate for submitting the sign-in password.
#[async_trait]
pub trait SignInPasswordRequiredDelegate: Send + Sync {
    /// Mandatory error callback. A retryable state accompanies
    /// invalid-password errors.
    async fn on_sign_in_password_required_error(
        &self,
        error: PasswordRequiredError,
        state: Option<SignInPasswordRequiredState>,
    );

    async fn on_sign_in_completed(&self, account: UserAccountResult) -> Dispatch {
        let _ = account;
        Dispatch::Declined
    }

    async fn on_sign_in_awaiting_mfa(&self, state: MfaRequiredState) -> Dispatch {
        let _ = state;
        Dispatch::Declined
    }
}

pub(crate) async fn dispatch_submit_password<D: SignInPasswordRequiredDelegate + ?Sized>(
    result: SignInSubmitPasswordResult,
    event: EventHandle,
    delegate: &D,
    correlation_id: Uuid,
) {
    match result {
        SignInSubmitPasswordResult::Completed { account } => {
            match delegate.on_sign_in_completed(account).await {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_sign_in_completed";
                    event.failure(method);
                    delegate
                        .on_sign_in_password_required_error(
                            PasswordRequiredError::general_with_message(
                                messages::not_implemented(method),
                                correlation_id,
                            ),
                            None,
                        )
                        .await;
                }
            }
        }
        SignInSubmitPasswordResult::AwaitingMfa { state } => {
            match delegate.on_sign_in_awaiting_mfa(state).await {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_sign_in_awaiting_mfa";
                    event.failure(method);
                    delegate
                        .on_sign_in_password_required_error(
                            PasswordRequiredError::general_with_message(
                                messages::not_implemented(method),
                                correlation_id,
                            ),
                            None,
                        )
                        .await;
                }
            }
        }
        SignInSubmitPasswordResult::InvalidPassword { error, state } => {
            event.failure(format!("{:?}", error.kind()));
            delegate
                .on_sign_in_password_required_error(error, Some(state))
                .await;
        }
        SignInSubmitPasswordResult::Error { error } => {
            event.failure(format!("{:?}", error.kind()));
            delegate
                .on_sign_in_password_required_error(error, None)
                .await;
        }
    }
}

/// Delegate for resending the sign-in code.
#[async_trait]
pub trait SignInResendCodeDelegate: Send + Sync {
    /// Mandatory error callback.
    async fn on_sign_in_resend_code_error(&self, error: ResendCodeError);

    async fn on_sign_in_resend_code_required(
        &self,
        state: SignInCodeRequiredState,
        sent_to: String,
        channel: ChannelType,
        code_length: usize,
    ) -> Dispatch {
        let _ = (state, sent_to, channel, code_length);
        Dispatch::Declined
    }
}

pub(crate) async fn dispatch_resend_code<D: SignInResendCodeDelegate + ?Sized>(
    result: SignInResendCodeResult,
    event: EventHandle,
    delegate: &D,
    correlation_id: Uuid,
) {
    match result {
        SignInResendCodeResult::CodeRequired {
            state,
            sent_to,
            channel,
            code_length,
        } => {
            match delegate
                .on_sign_in_resend_code_required(state, sent_to, channel, code_length)
                .await
            {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_sign_in_resend_code_required";
                    event.failure(method);
                    delegate
                        .on_sign_in_resend_code_error(ResendCodeError::general_with_message(
                            messages::not_implemented(method),
                            correlation_id,
                        ))
                        .await;
                }
            }
        }
        SignInResendCodeResult::Error { error } => {
            event.failure(format!("{:?}", error.kind()));
            delegate.on_sign_in_resend_code_error(error).await;
        }
    }
}

/// Delegate for the sign-in handoff after sign-up or password reset.
#[async_trait]
pub trait SignInAfterPreviousFlowDelegate: Send + Sync {
    /// Mandatory error callback.
    async fn on_sign_in_after_previous_flow_error(&self, error: SignInAfterPreviousFlowError);

    async fn on_sign_in_completed(&self, account: UserAccountResult) -> Dispatch {
        let _ = account;
        Dispatch::Declined
    }
}

pub(crate) async fn dispatch_sign_in_after_previous_flow<
    D: SignInAfterPreviousFlowDelegate + ?Sized,
>(
    result: SignInAfterPreviousFlowResult,
    event: EventHandle,
    delegate: &D,
    correlation_id: Uuid,
) {
    match result {
        SignInAfterPreviousFlowResult::Completed { account } => {
            match delegate.on_sign_in_completed(account).await {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_sign_in_completed";
                    event.failure(method);
                    delegate
                        .on_sign_in_after_previous_flow_error(
                            SignInAfterPreviousFlowError::general_with_message(
                                messages::not_implemented(method),
                                correlation_id,
                            ),
                        )
                        .await;
                }
            }
        }
        SignInAfterPreviousFlowResult::Error { error } => {
            event.failure(format!("{:?}", error.kind()));
            delegate.on_sign_in_after_previous_flow_error(error).await;
        }
    }
}
