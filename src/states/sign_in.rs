//! Sign-In Flow States

use std::sync::Arc;

use secrecy::SecretString;
use uuid::Uuid;

use crate::controllers::sign_in::{
    SignInAfterPreviousFlowResult, SignInController, SignInResendCodeResult,
    SignInSubmitCodeResult, SignInSubmitPasswordResult,
};
use crate::delegates::sign_in::{
    dispatch_resend_code, dispatch_sign_in_after_previous_flow, dispatch_submit_code,
    dispatch_submit_password, SignInAfterPreviousFlowDelegate, SignInPasswordRequiredDelegate,
    SignInResendCodeDelegate, SignInVerifyCodeDelegate,
};
use crate::telemetry::ApiId;

/// The sign-in flow is waiting for the one-time code.
pub struct SignInCodeRequiredState {
    controller: Arc<SignInController>,
    continuation_token: String,
    username: String,
    scopes: Vec<String>,
    correlation_id: Uuid,
}

impl SignInCodeRequiredState {
    pub(crate) fn new(
        controller: Arc<SignInController>,
        continuation_token: String,
        username: String,
        scopes: Vec<String>,
        correlation_id: Uuid,
    ) -> Self {
        Self {
            controller,
            continuation_token,
            username,
            scopes,
            correlation_id,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    /// Submit the one-time code and, on success, complete the sign-in.
    pub async fn submit_code(self, code: &str) -> SignInSubmitCodeResult {
        let (result, event) = self
            .controller
            .submit_code(
                code,
                &self.continuation_token,
                &self.username,
                &self.scopes,
                self.correlation_id,
            )
            .await;
        match &result {
            SignInSubmitCodeResult::InvalidCode { error, .. } => {
                event.failure(format!("{:?}", error.kind()))
            }
            SignInSubmitCodeResult::Error { error } => event.failure(format!("{:?}", error.kind())),
            _ => event.success(),
        }
        result
    }

    /// Submit the one-time code, routing the outcome through a delegate.
    pub async fn submit_code_with_delegate<D: SignInVerifyCodeDelegate + ?Sized>(
        self,
        code: &str,
        delegate: &D,
    ) {
        let correlation_id = self.correlation_id;
        let (result, event) = self
            .controller
            .submit_code(
                code,
                &self.continuation_token,
                &self.username,
                &self.scopes,
                correlation_id,
            )
            .await;
        dispatch_submit_code(result, event, delegate, correlation_id).await;
    }

    /// Request a fresh code.
    pub async fn resend_code(self) -> SignInResendCodeResult {
        let (result, event) = self
            .controller
            .resend_code(
                &self.continuation_token,
                &self.username,
                &self.scopes,
                self.correlation_id,
            )
            .await;
        match &result {
            SignInResendCodeResult::Error { error } => event.failure(format!("{:?}", error.kind())),
            _ => event.success(),
        }
        result
    }

    /// Request a fresh code, routing the outcome through a delegate.
    pub async fn resend_code_with_delegate<D: SignInResendCodeDelegate + ?Sized>(
        self,
        delegate: &D,
    ) {
        let correlation_id = self.correlation_id;
        let (result, event) = self
            .controller
            .resend_code(&self.continuation_token, &self.username, &self.scopes, correlation_id)
            .await;
        dispatch_resend_code(result, event, delegate, correlation_id).await;
    }
}

/// The sign-in flow is waiting for the account password.
pub struct SignInPasswordRequiredState {
    controller: Arc<SignInController>,
    continuation_token: String,
    username: String,
    scopes: Vec<String>,
    correlation_id: Uuid,
}

impl SignInPasswordRequiredState {
    pub(crate) fn new(
        controller: Arc<SignInController>,
        continuation_token: String,
        username: String,
        scopes: Vec<String>,
        correlation_id: Uuid,
    ) -> Self {
        Self {
            controller,
            continuation_token,
            username,
            scopes,
            correlation_id,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    /// Submit the password and, on success, complete the sign-in.
    pub async fn submit_password(self, password: impl Into<String>) -> SignInSubmitPasswordResult {
        let password = SecretString::new(password.into());
        let (result, event) = self
            .controller
            .submit_password(
                &password,
                &self.continuation_token,
                &self.username,
                &self.scopes,
                self.correlation_id,
            )
            .await;
        match &result {
            SignInSubmitPasswordResult::InvalidPassword { error, .. } => {
                event.failure(format!("{:?}", error.kind()))
            }
            SignInSubmitPasswordResult::Error { error } => {
                event.failure(format!("{:?}", error.kind()))
            }
            _ => event.success(),
        }
        result
    }

    /// Submit the password, routing the outcome through a delegate.
    pub async fn submit_password_with_delegate<D: SignInPasswordRequiredDelegate + ?Sized>(
        self,
        password: impl Into<String>,
        delegate: &D,
    ) {
        let correlation_id = self.correlation_id;
        let password = SecretString::new(password.into());
        let (result, event) = self
            .controller
            .submit_password(
                &password,
                &self.continuation_token,
                &self.username,
                &self.scopes,
                correlation_id,
            )
            .await;
        dispatch_submit_password(result, event, delegate, correlation_id).await;
    }
}

/// A completed sign-up can continue straight into a sign-in without
/// re-authenticating, as long as the continuation token is still valid.
pub struct SignInAfterSignUpState {
    controller: Arc<SignInController>,
    continuation_token: Option<String>,
    username: String,
    correlation_id: Uuid,
}

impl SignInAfterSignUpState {
    pub(crate) fn new(
        controller: Arc<SignInController>,
        continuation_token: Option<String>,
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

    /// Sign in with the continuation token issued by the completed flow.
    pub async fn sign_in(self, scopes: Vec<String>) -> SignInAfterPreviousFlowResult {
        let (result, event) = self
            .controller
            .sign_in_after_previous_flow(
                self.continuation_token.as_deref(),
                &self.username,
                &scopes,
                ApiId::SignInAfterSignUp,
                self.correlation_id,
            )
            .await;
        match &result {
            SignInAfterPreviousFlowResult::Error { error } => {
                event.failure(format!("{:?}", error.kind()))
            }
            _ => event.success(),
        }
        result
    }

    /// Sign in, routing the outcome through a delegate.
    pub async fn sign_in_with_delegate<D: SignInAfterPreviousFlowDelegate + ?Sized>(
        self,
        scopes: Vec<String>,
        delegate: &D,
    ) {
        let correlation_id = self.correlation_id;
        let (result, event) = self
            .controller
            .sign_in_after_previous_flow(
                self.continuation_token.as_deref(),
                &self.username,
                &scopes,
                ApiId::SignInAfterSignUp,
                correlation_id,
            )
            .await;
        dispatch_sign_in_after_previous_flow(result, event, delegate, correlation_id).await;
    }
}

/// A completed password reset can continue straight into a sign-in with
/// the new password already proven.
pub struct SignInAfterResetPasswordState {
    controller: Arc<SignInController>,
    continuation_token: Option<String>,
    username: String,
    correlation_id: Uuid,
}

impl SignInAfterResetPasswordState {
    pub(crate) fn new(
        controller: Arc<SignInController>,
        continuation_token: Option<String>,
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

    /// Sign in with the continuation token issued by the completed flow.
    pub async fn sign_in(self, scopes: Vec<String>) -> SignInAfterPreviousFlowResult {
        let (result, event) = self
            .controller
            .sign_in_after_previous_flow(
                self.continuation_token.as_deref(),
                &self.username,
                &scopes,
                ApiId::SignInAfterResetPassword,
                self.correlation_id,
            )
            .await;
        match &result {
            SignInAfterPreviousFlowResult::Error { error } => {
                event.failure(format!("{:?}", error.kind()))
            }
            _ => event.success(),
        }
        result
    }

    /// Sign in, routing the outcome through a delegate.
    pub async fn sign_in_with_delegate<D: SignInAfterPreviousFlowDelegate + ?Sized>(
        self,
        scopes: Vec<String>,
        delegate: &D,
    ) {
        let correlation_id = self.correlation_id;
        let (result, event) = self
            .controller
            .sign_in_after_previous_flow(
                self.continuation_token.as_deref(),
                &self.username,
                &scopes,
                ApiId::SignInAfterResetPassword,
                correlation_id,
            )
            .await;
        dispatch_sign_in_after_previous_flow(result, event, delegate, correlation_id).await;
    }
}
