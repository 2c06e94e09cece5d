//! Password-Reset Flow States

use std::sync::Arc;

use secrecy::SecretString;
use uuid::Uuid;

use crate::controllers::reset_password::{
    ResetPasswordController, ResetPasswordResendCodeResult, ResetPasswordSubmitCodeResult,
    ResetPasswordSubmitPasswordResult,
};
use crate::delegates::reset_password::{
    dispatch_resend_code, dispatch_submit_code, dispatch_submit_password,
    ResetPasswordRequiredDelegate, ResetPasswordResendCodeDelegate, ResetPasswordVerifyCodeDelegate,
};

/// The password-reset flow is waiting for the one-time code.
pub struct ResetPasswordCodeRequiredState {
    controller: Arc<ResetPasswordController>,
    continuation_token: String,
    username: String,
    correlation_id: Uuid,
}

impl ResetPasswordCodeRequiredState {
    pub(crate) fn new(
        controller: Arc<ResetPasswordController>,
        continuation_token: String,
        username: String,
        correlation_id: Uuid,
    ) -> Self {
        Self {
            controller,
            continuation_token,
            username,
            correlation_id,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    /// Submit the one-time code.
    pub async fn submit_code(self, code: &str) -> ResetPasswordSubmitCodeResult {
        let (result, event) = self
            .controller
            .submit_code(code, &self.continuation_token, &self.username, self.correlation_id)
            .await;
        match &result {
            ResetPasswordSubmitCodeResult::InvalidCode { error, .. } => {
                event.failure(format!("{:?}", error.kind()))
            }
            ResetPasswordSubmitCodeResult::Error { error } => {
                event.failure(format!("{:?}", error.kind()))
            }
            _ => event.success(),
        }
        result
    }

    /// Submit the one-time code, routing the outcome through a delegate.
    pub async fn submit_code_with_delegate<D: ResetPasswordVerifyCodeDelegate + ?Sized>(
        self,
        code: &str,
        delegate: &D,
    ) {
        let correlation_id = self.correlation_id;
        let (result, event) = self
            .controller
            .submit_code(code, &self.continuation_token, &self.username, correlation_id)
            .await;
        dispatch_submit_code(result, event, delegate, correlation_id).await;
    }

    /// Request a fresh code.
    pub async fn resend_code(self) -> ResetPasswordResendCodeResult {
        let (result, event) = self
            .controller
            .resend_code(&self.continuation_token, &self.username, self.correlation_id)
            .await;
        match &result {
            ResetPasswordResendCodeResult::Error { error } => {
                event.failure(format!("{:?}", error.kind()))
            }
            _ => event.success(),
        }
        result
    }

    /// Request a fresh code, routing the outcome through a delegate.
    pub async fn resend_code_with_delegate<D: ResetPasswordResendCodeDelegate + ?Sized>(
        self,
        delegate: &D,
    ) {
        let correlation_id = self.correlation_id;
        let (result, event) = self
            .controller
            .resend_code(&self.continuation_token, &self.username, correlation_id)
            .await;
        dispatch_resend_code(result, event, delegate, correlation_id).await;
    }
}

/// The password-reset flow is waiting for the replacement password.
pub struct ResetPasswordRequiredState {
    controller: Arc<ResetPasswordController>,
    continuation_token: String,
    username: String,
    correlation_id: Uuid,
}

impl ResetPasswordRequiredState {
    pub(crate) fn new(
        controller: Arc<ResetPasswordController>,
        continuation_token: String,
        username: String,
        correlation_id: Uuid,
    ) -> Self {
        Self {
            controller,
            continuation_token,
            username,
            correlation_id,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    /// Submit the replacement password and wait for the server to apply
    /// it. This call does not return until polling resolves one way or
    /// the other.
    pub async fn submit_password(
        self,
        new_password: impl Into<String>,
    ) -> ResetPasswordSubmitPasswordResult {
        let new_password = SecretString::new(new_password.into());
        let (result, event) = self
            .controller
            .submit_password(
                &new_password,
                &self.continuation_token,
                &self.username,
                self.correlation_id,
            )
            .await;
        match &result {
            ResetPasswordSubmitPasswordResult::InvalidPassword { error, .. } => {
                event.failure(format!("{:?}", error.kind()))
            }
            ResetPasswordSubmitPasswordResult::Error { error } => {
                event.failure(format!("{:?}", error.kind()))
            }
            _ => event.success(),
        }
        result
    }

    /// Submit the replacement password, routing the outcome through a
    /// delegate.
    pub async fn submit_password_with_delegate<D: ResetPasswordRequiredDelegate + ?Sized>(
        self,
        new_password: impl Into<String>,
        delegate: &D,
    ) {
        let correlation_id = self.correlation_id;
        let new_password = SecretString::new(new_password.into());
        let (result, event) = self
            .controller
            .submit_password(
                &new_password,
                &self.continuation_token,
                &self.username,
                correlation_id,
            )
            .await;
        dispatch_submit_password(result, event, delegate, correlation_id).await;
    }
}
