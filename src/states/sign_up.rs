//! Sign-Up Flow States

use std::sync::Arc;

use secrecy::SecretString;
use uuid::Uuid;

use crate::controllers::sign_up::{
    SignUpController, SignUpResendCodeResult, SignUpSubmitAttributesResult,
    SignUpSubmitCodeResult, SignUpSubmitPasswordResult,
};
use crate::delegates::sign_up::{
    dispatch_resend_code, dispatch_submit_attributes, dispatch_submit_code,
    dispatch_submit_password, SignUpAttributesRequiredDelegate, SignUpPasswordRequiredDelegate,
    SignUpResendCodeDelegate, SignUpVerifyCodeDelegate,
};
use crate::types::UserAttributes;

/// The sign-up flow is waiting for the one-time code.
pub struct SignUpCodeRequiredState {
    controller: Arc<SignUpController>,
    continuation_token: String,
    username: String,
    correlation_id: Uuid,
}

impl SignUpCodeRequiredState {
    pub(crate) fn new(
        controller: Arc<SignUpController>,
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
    pub async fn submit_code(self, code: &str) -> SignUpSubmitCodeResult {
        let (result, event) = self
            .controller
            .submit_code(code, &self.continuation_token, &self.username, self.correlation_id)
            .await;
        match &result {
            SignUpSubmitCodeResult::InvalidCode { error, .. } => {
                event.failure(format!("{:?}", error.kind()))
            }
            SignUpSubmitCodeResult::Error { error } => event.failure(format!("{:?}", error.kind())),
            _ => event.success(),
        }
        result
    }

    /// Submit the one-time code, routing the outcome through a delegate.
    pub async fn submit_code_with_delegate<D: SignUpVerifyCodeDelegate + ?Sized>(
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
    pub async fn resend_code(self) -> SignUpResendCodeResult {
        let (result, event) = self
            .controller
            .resend_code(&self.continuation_token, &self.username, self.correlation_id)
            .await;
        match &result {
            SignUpResendCodeResult::Error { error } => event.failure(format!("{:?}", error.kind())),
            _ => event.success(),
        }
        result
    }

    /// Request a fresh code, routing the outcome through a delegate.
    pub async fn resend_code_with_delegate<D: SignUpResendCodeDelegate + ?Sized>(
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

/// The sign-up flow is waiting for a password.
pub struct SignUpPasswordRequiredState {
    controller: Arc<SignUpController>,
    continuation_token: String,
    username: String,
    correlation_id: Uuid,
}

impl SignUpPasswordRequiredState {
    pub(crate) fn new(
        controller: Arc<SignUpController>,
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

    /// Submit the password.
    pub async fn submit_password(self, password: impl Into<String>) -> SignUpSubmitPasswordResult {
        let password = SecretString::new(password.into());
        let (result, event) = self
            .controller
            .submit_password(
                &password,
                &self.continuation_token,
                &self.username,
                self.correlation_id,
            )
            .await;
        match &result {
            SignUpSubmitPasswordResult::InvalidPassword { error, .. } => {
                event.failure(format!("{:?}", error.kind()))
            }
            SignUpSubmitPasswordResult::Error { error } => {
                event.failure(format!("{:?}", error.kind()))
            }
            _ => event.success(),
        }
        result
    }

    /// Submit the password, routing the outcome through a delegate.
    pub async fn submit_password_with_delegate<D: SignUpPasswordRequiredDelegate + ?Sized>(
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
                correlation_id,
            )
            .await;
        dispatch_submit_password(result, event, delegate, correlation_id).await;
    }
}

/// The sign-up flow is waiting for profile attributes.
pub struct SignUpAttributesRequiredState {
    controller: Arc<SignUpController>,
    continuation_token: String,
    username: String,
    correlation_id: Uuid,
}

impl SignUpAttributesRequiredState {
    pub(crate) fn new(
        controller: Arc<SignUpController>,
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

    /// Submit the requested attributes.
    pub async fn submit_attributes(
        self,
        attributes: UserAttributes,
    ) -> SignUpSubmitAttributesResult {
        let (result, event) = self
            .controller
            .submit_attributes(
                &attributes,
                &self.continuation_token,
                &self.username,
                self.correlation_id,
            )
            .await;
        match &result {
            SignUpSubmitAttributesResult::AttributesInvalid { .. } => {
                event.failure("InvalidAttributes")
            }
            SignUpSubmitAttributesResult::Error { error } => {
                event.failure(format!("{:?}", error.kind()))
            }
            _ => event.success(),
        }
        result
    }

    /// Submit the requested attributes, routing the outcome through a
    /// delegate.
    pub async fn submit_attributes_with_delegate<D: SignUpAttributesRequiredDelegate + ?Sized>(
        self,
        attributes: UserAttributes,
        delegate: &D,
    ) {
        let correlation_id = self.correlation_id;
        let (result, event) = self
            .controller
            .submit_attributes(
                &attributes,
                &self.continuation_token,
                &self.username,
                correlation_id,
            )
            .await;
        dispatch_submit_attributes(result, event, delegate, correlation_id).await;
    }
}
