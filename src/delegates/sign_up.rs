//! Sign-Up Delegates

use async_trait::async_trait;
use uuid::Uuid;

use crate::controllers::{
    SignUpResendCodeResult, SignUpStartResult, SignUpSubmitAttributesResult,
    SignUpSubmitCodeResult, SignUpSubmitPasswordResult,
};
use crate::delegates::Dispatch;
use crate::error::public::messages;
use crate::error::{
    AttributesRequiredError, PasswordRequiredError, ResendCodeError, SignUpStartError,
    VerifyCodeError,
};
use crate::states::{
    SignInAfterSignUpState, SignUpAttributesRequiredState, SignUpCodeRequiredState,
    SignUpPasswordRequiredState,
};
use crate::telemetry::EventHandle;
use crate::types::responses::{ChannelType, RequiredAttribute};

/// Delegate for the start of a sign-up flow.
#[async_trait]
pub trait SignUpStartDelegate: Send + Sync {
    /// Mandatory error callback.
    async fn on_sign_up_start_error(&self, error: SignUpStartError);

    async fn on_sign_up_code_required(
        &self,
        state: SignUpCodeRequiredState,
        sent_to: String,
        channel: ChannelType,
        code_length: usize,
    ) -> Dispatch {
        let _ = (state, sent_to, channel, code_length);
        Dispatch::Declined
    }

    async fn on_sign_up_password_required(&self, state: SignUpPasswordRequiredState) -> Dispatch {
        let _ = state;
        Dispatch::Declined
    }

    async fn on_sign_up_attributes_invalid(&self, attributes: Vec<String>) -> Dispatch {
        let _ = attributes;
        Dispatch::Declined
    }
}

pub(crate) async fn dispatch_start<D: SignUpStartDelegate + ?Sized>(
    result: SignUpStartResult,
    event: EventHandle,
    delegate: &D,
    correlation_id: Uuid,
) {
    match result {
        SignUpStartResult::CodeRequired {
            state,
            sent_to,
            channel,
            code_length,
        } => {
            match delegate
                .on_sign_up_code_required(state, sent_to, channel, code_length)
                .await
            {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_sign_up_code_required";
                    event.failure(method);
                    delegate
                        .on_sign_up_start_error(SignUpStartError::general_with_message(
                            messages::not_implemented(method),
                            correlation_id,
                        ))
                        .await;
                }
            }
        }
        SignUpStartResult::PasswordRequired { state } => {
            match delegate.on_sign_up_password_required(state).await {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_sign_up_password_required";
                    event.failure(method);
                    delegate
                        .on_sign_up_start_error(SignUpStartError::general_with_message(
                            messages::not_implemented(method),
                            correlation_id,
                        ))
                        .await;
                }
            }
        }
        SignUpStartResult::AttributesInvalid { attributes } => {
            match delegate.on_sign_up_attributes_invalid(attributes).await {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_sign_up_attributes_invalid";
                    event.failure(method);
                    delegate
                        .on_sign_up_start_error(SignUpStartError::general_with_message(
                            messages::not_implemented(method),
                            correlation_id,
                        ))
                        .await;
                }
            }
        }
        SignUpStartResult::Error { error } => {
            event.failure(format!("{:?}", error.kind()));
            delegate.on_sign_up_start_error(error).await;
        }
    }
}

/// Delegate for submitting the sign-up one-time code.
#[async_trait]
pub trait SignUpVerifyCodeDelegate: Send + Sync {
    /// Mandatory error callback. A retryable state accompanies invalid-code
    /// errors.
    async fn on_sign_up_verify_code_error(
        &self,
        error: VerifyCodeError,
        state: Option<SignUpCodeRequiredState>,
    );

    async fn on_sign_up_completed(&self, state: SignInAfterSignUpState) -> Dispatch {
        let _ = state;
        Dispatch::Declined
    }

    async fn on_sign_up_password_required(&self, state: SignUpPasswordRequiredState) -> Dispatch {
        let _ = state;
        Dispatch::Declined
    }

    async fn on_sign_up_attributes_required(
        &self,
        state: SignUpAttributesRequiredState,
        attributes: Vec<RequiredAttribute>,
    ) -> Dispatch {
        let _ = (state, attributes);
        Dispatch::Declined
    }
}

pub(crate) async fn dispatch_submit_code<D: SignUpVerifyCodeDelegate + ?Sized>(
    result: SignUpSubmitCodeResult,
    event: EventHandle,
    delegate: &D,
    correlation_id: Uuid,
) {
    match result {
        SignUpSubmitCodeResult::Completed { state } => {
            match delegate.on_sign_up_completed(state).await {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_sign_up_completed";
                    event.failure(method);
                    delegate
                        .on_sign_up_verify_code_error(
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
        SignUpSubmitCodeResult::PasswordRequired { state } => {
            match delegate.on_sign_up_password_required(state).await {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_sign_up_password_required";
                    event.failure(method);
                    delegate
                        .on_sign_up_verify_code_error(
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
        SignUpSubmitCodeResult::AttributesRequired { state, attributes } => {
            match delegate
                .on_sign_up_attributes_required(state, attributes)
                .await
            {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_sign_up_attributes_required";
                    event.failure(method);
                    delegate
                        .on_sign_up_verify_code_error(
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
        SignUpSubmitCodeResult::InvalidCode { error, state } => {
            event.failure(format!("{:?}", error.kind()));
            delegate
                .on_sign_up_verify_code_error(error, Some(state))
                .await;
        }
        SignUpSubmitCodeResult::Error { error } => {
            event.failure(format!("{:?}", error.kind()));
            delegate.on_sign_up_verify_code_error(error, None).await;
        }
    }
}

/// Delegate for resending the sign-up code.
#[async_trait]
pub trait SignUpResendCodeDelegate: Send + Sync {
    /// Mandatory error callback.
    async fn on_sign_up_resend_code_error(&self, error: ResendCodeError);

    async fn on_sign_up_resend_code_required(
        &self,
        state: SignUpCodeRequiredState,
        sent_to: String,
        channel: ChannelType,
        code_length: usize,
    ) -> Dispatch {
        let _ = (state, sent_to, channel, code_length);
        Dispatch::Declined
    }
}

pub(crate) async fn dispatch_resend_code<D: SignUpResendCodeDelegate + ?Sized>(
    result: SignUpResendCodeResult,
    event: EventHandle,
    delegate: &D,
    correlation_id: Uuid,
) {
    match result {
        SignUpResendCodeResult::CodeRequired {
            state,
            sent_to,
            channel,
            code_length,
        } => {
            match delegate
                .on_sign_up_resend_code_required(state, sent_to, channel, code_length)
                .await
            {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_sign_up_resend_code_required";
                    event.failure(method);
                    delegate
                        .on_sign_up_resend_code_error(ResendCodeError::general_with_message(
                            messages::not_implemented(method),
                            correlation_id,
                        ))
                        .await;
                }
            }
        }
        SignUpResendCodeResult::Error { error } => {
            event.failure(format!("{:?}", error.kind()));
            delegate.on_sign_up_resend_code_error(error).await;
        }
    }
}

/// Delegate for submitting the sign-up password.
#[async_trait]
pub trait SignUpPasswordRequiredDelegate: Send + Sync {
    /// Mandatory error callback. A retryable state accompanies
    /// invalid-password errors.
    async fn on_sign_up_password_required_error(
        &self,
        error: PasswordRequiredError,
        state: Option<SignUpPasswordRequiredState>,
    );

    async fn on_sign_up_completed(&self, state: SignInAfterSignUpState) -> Dispatch {
        let _ = state;
        Dispatch::Declined
    }

    async fn on_sign_up_attributes_required(
        &self,
        state: SignUpAttributesRequiredState,
        attributes: Vec<RequiredAttribute>,
    ) -> Dispatch {
        let _ = (state, attributes);
        Dispatch::Declined
    }
}

pub(crate) async fn dispatch_submit_password<D: SignUpPasswordRequiredDelegate + ?Sized>(
    result: SignUpSubmitPasswordResult,
    event: EventHandle,
    delegate: &D,
    correlation_id: Uuid,
) {
    match result {
        SignUpSubmitPasswordResult::Completed { state } => {
            match delegate.on_sign_up_completed(state).await {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_sign_up_completed";
                    event.failure(method);
                    delegate
                        .on_sign_up_password_required_error(
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
        SignUpSubmitPasswordResult::AttributesRequired { state, attributes } => {
            match delegate
                .on_sign_up_attributes_required(state, attributes)
                .await
            {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_sign_up_attributes_required";
                    event.failure(method);
                    delegate
                        .on_sign_up_password_required_error(
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
        SignUpSubmitPasswordResult::InvalidPassword { error, state } => {
            event.failure(format!("{:?}", error.kind()));
            delegate
                .on_sign_up_password_required_error(error, Some(state))
                .await;
        }
        SignUpSubmitPasswordResult::Error { error } => {
            event.failure(format!("{:?}", error.kind()));
            delegate.on_sign_up_password_required_error(error, None).await;
        }
    }
}

/// Delegate for submitting sign-up attributes.
#[async_trait]
pub trait SignUpAttributesRequiredDelegate: Send + Sync {
    /// Mandatory error callback.
    async fn on_sign_up_attributes_required_error(&self, error: AttributesRequiredError);

    async fn on_sign_up_completed(&self, state: SignInAfterSignUpState) -> Dispatch {
        let _ = state;
        Dispatch::Declined
    }

    async fn on_sign_up_attributes_required(
        &self,
        state: SignUpAttributesRequiredState,
        attributes: Vec<RequiredAttribute>,
    ) -> Dispatch {
        let _ = (state, attributes);
        Dispatch::Declined
    }

    async fn on_sign_up_attributes_invalid(
        &self,
        state: SignUpAttributesRequiredState,
        attributes: Vec<String>,
    ) -> Dispatch {
        let _ = (state, attributes);
        Dispatch::Declined
    }
}

pub(crate) async fn dispatch_submit_attributes<D: SignUpAttributesRequiredDelegate + ?Sized>(
    result: SignUpSubmitAttributesResult,
    event: EventHandle,
    delegate: &D,
    correlation_id: Uuid,
) {
    match result {
        SignUpSubmitAttributesResult::Completed { state } => {
            match delegate.on_sign_up_completed(state).await {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_sign_up_completed";
                    event.failure(method);
                    delegate
                        .on_sign_up_attributes_required_error(
                            AttributesRequiredError::general_with_message(
                                messages::not_implemented(method),
                                correlation_id,
                            ),
                        )
                        .await;
                }
            }
        }
        SignUpSubmitAttributesResult::AttributesRequired { state, attributes } => {
            match delegate
                .on_sign_up_attributes_required(state, attributes)
                .await
            {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_sign_up_attributes_required";
                    event.failure(method);
                    delegate
                        .on_sign_up_attributes_required_error(
                            AttributesRequiredError::general_with_message(
                                messages::not_implemented(method),
                                correlation_id,
                            ),
                        )
                        .await;
                }
            }
        }
        SignUpSubmitAttributesResult::AttributesInvalid { state, attributes } => {
            match delegate
                .on_sign_up_attributes_invalid(state, attributes)
                .await
            {
                Dispatch::Handled => event.success(),
                Dispatch::Declined => {
                    let method = "on_sign_up_attributes_invalid";
                    event.failure(method);
                    delegate
                        .on_sign_up_attributes_required_error(
                            AttributesRequiredError::general_with_message(
                                messages::not_implemented(method),
                                correlation_id,
                            ),
                        )
                        .await;
                }
            }
        }
        SignUpSubmitAttributesResult::Error { error } => {
            event.failure(format!("{:?}", error.kind()));
            delegate.on_sign_up_attributes_required_error(error).await;
        }
    }
}
