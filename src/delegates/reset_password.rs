//! Reset-Password Delegates

use async_trait::async_trait;
use uuid::Uuid;

use crate::controllers::{
    ResetPasswordResendCodeResult, ResetPasswordStartResult, ResetPasswordSubmitCodeResult,
    ResetPasswordSubmitPasswordResult,
};
use crate::delegates::Dispatch;
use crate::error::public::messages;
use crate::error::{
    PasswordRequiredError, ResendCodeError, ResetPasswordStartError, VerifyCodeError,
};
use crate::states::{
    ResetPasswordCodeRequiredState, ResetPasswordRequiredState, SignInAfterResetPasswordState,
};
use crate::telemetry::EventHandle;
use crate::types::responses::ChannelType;

/// Delegate for the start of a password-reset flow.
#[async_trait]
pub trait ResetPasswordStartDelegate: Send + Sync {
    /// Mandatory error callback.
    async fn on_reset_password_start_error(&self, error: ResetPasswordStartError);

    async fn on_reset_password_code_required(
        &self,
        state: ResetPasswordCodeRequiredState,
        sent_to: String,
        channel: ChannelType,
        code_length: usize,
    ) -> Dispatch {
        let _ = (state, sent_to, channel, code_length);
        Dispatch::Declined
    }
}

pub(crate) async fn dispatch_start<D: ResetPasswordStartDelegate + ?Sized>(
    result: ResetPasswordStartResult,
    event: EventHandle,
    delegate: &D,
    correlation_id: Uuid,
) {
    match result {
        ResetPasswordStartResult::CodeRequired {
            state,
            sent_to,
            channel,
            code_length,
        } => {
            match delegate
                .on_reset_password_code_required(state, sent_to, channel, code_length)
                .await
            {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_reset_password_code_required";
                    event.failure(method);
                    delegate
                        .on_reset_password_start_error(
                            ResetPasswordStartError::general_with_message(
                                messages::not_implemented(method),
                                correlation_id,
                            ),
                        )
                        .await;
                }
            }
        }
        ResetPasswordStartResult::Error { error } => {
            event.failure(format!("{:?}", error.kind()));
            delegate.on_reset_password_start_error(error).await;
        }
    }
}

/// Delegate for submitting the reset code.
#[async_trait]
pub trait ResetPasswordVerifyCodeDelegate: Send + Sync {
    /// Mandatory error callback. A retryable state accompanies invalid-code
    /// errors.
    async fn on_reset_password_verify_code_error(
        &self,
        error: VerifyCodeError,
        state: Option<ResetPasswordCodeRequiredState>,
    );

    async fn on_password_required(&self, state: ResetPasswordRequiredState) -> Dispatch {
        let _ = state;
        Dispatch::Declined
    }
}

pub(crate) async fn dispatch_submit_code<D: ResetPasswordVerifyCodeDelegate + ?Sized>(
    result: ResetPasswordSubmitCodeResult,
    event: EventHandle,
    delegate: &D,
    correlation_id: Uuid,
) {
    match result {
        ResetPasswordSubmitCodeResult::PasswordRequired { state } => {
            match delegate.on_password_required(state).await {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_password_required";
                    event.failure(method);
                    delegate
                        .on_reset_password_verify_code_error(
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
        ResetPasswordSubmitCodeResult::InvalidCode { error, state } => {
            event.failure(format!("{:?}", error.kind()));
            delegate
                .on_reset_password_verify_code_error(error, Some(state))
                .await;
        }
        ResetPasswordSubmitCodeResult::Error { error } => {
            event.failure(format!("{:?}", error.kind()));
            delegate
                .on_reset_password_verify_code_error(error, None)
                .await;
        }
    }
}

/// Delegate for resending the reset code.
#[async_trait]
pub trait ResetPasswordResendCodeDelegate: Send + Sync {
    /// Mandatory error callback.
    async fn on_reset_password_resend_code_error(&self, error: ResendCodeError);

    async fn on_reset_password_resend_code_required(
        &self,
        state: ResetPasswordCodeRequiredState,
        sent_to: String,
        channel: ChannelType,
        code_length: usize,
    ) -> Dispatch {
        let _ = (state, sent_to, channel, code_length);
        Dispatch::Declined
    }
}

pub(crate) async fn dispatch_resend_code<D: ResetPasswordResendCodeDelegate + ?Sized>(
    result: ResetPasswordResendCodeResult,
    event: EventHandle,
    delegate: &D,
    correlation_id: Uuid,
) {
    match result {
        ResetPasswordResendCodeResult::CodeRequired {
            state,
            sent_to,
            channel,
            code_length,
        } => {
            match delegate
                .on_reset_password_resend_code_required(state, sent_to, channel, code_length)
                .await
            {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_reset_password_resend_code_required";
                    event.failure(method);
                    delegate
                        .on_reset_password_resend_code_error(
                            ResendCodeError::general_with_message(
                                messages::not_implemented(method),
                                correlation_id,
                            ),
                        )
                        .await;
                }
            }
        }
        ResetPasswordResendCodeResult::Error { error } => {
            event.failure(format!("{:?}", error.kind()));
            delegate.on_reset_password_resend_code_error(error).await;
        }
    }
}

/// Delegate for submitting the new password.
#[async_trait]
pub trait ResetPasswordRequiredDelegate: Send + Sync {
    /// Mandatory error callback. A retryable state accompanies
    /// invalid-password errors.
    async fn on_reset_password_required_error(
        &self,
        error: PasswordRequiredError,
        state: Option<ResetPasswordRequiredState>,
    );

    async fn on_reset_password_completed(&self, state: SignInAfterResetPasswordState) -> Dispatch {
        let _ = state;
        Dispatch::Declined
    }
}

pub(crate) async fn dispatch_submit_password<D: ResetPasswordRequiredDelegate + ?Sized>(
    result: ResetPasswordSubmitPasswordResult,
    event: EventHandle,
    delegate: &D,
    correlation_id: Uuid,
) {
    match result {
        ResetPasswordSubmitPasswordResult::Completed { state } => {
            match delegate.on_reset_password_completed(state).await {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_reset_password_completed";
                    event.failure(method);
                    delegate
                        .on_reset_password_required_error(
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
        ResetPasswordSubmitPasswordResult::InvalidPassword { error, state } => {
            event.failure(format!("{:?}", error.kind()));
            delegate
                .on_reset_password_required_error(error, Some(state))
                .await;
        }
        ResetPasswordSubmitPasswordResult::Error { error } => {
            event.failure(format!("{:?}", error.kind()));
            delegate.on_reset_password_required_error(error, None).await;
        }
    }
}
