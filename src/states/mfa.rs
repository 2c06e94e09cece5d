//! Multi-Factor Authentication State

use std::sync::Arc;

use uuid::Uuid;

use crate::controllers::mfa::{MfaController, MfaSendChallengeResult, MfaSubmitChallengeResult};
use crate::delegates::mfa::{
    dispatch_send_challenge, dispatch_submit_challenge, MfaSendChallengeDelegate,
    MfaSubmitChallengeDelegate,
};

/// The sign-in flow needs a second factor before tokens are issued.
///
/// `send_challenge` asks the server to deliver a code to the default
/// authentication method; `submit_challenge` proves it.
pub struct MfaRequiredState {
    controller: Arc<MfaController>,
    continuation_token: String,
    username: String,
    scopes: Vec<String>,
    correlation_id: Uuid,
}

impl MfaRequiredState {
    pub(crate) fn new(
        controller: Arc<MfaController>,
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

    /// Ask the server to deliver a challenge code.
    pub async fn send_challenge(self) -> MfaSendChallengeResult {
        let (result, event) = self
            .controller
            .send_challenge(
                &self.continuation_token,
                &self.username,
                &self.scopes,
                self.correlation_id,
            )
            .await;
        match &result {
            MfaSendChallengeResult::Error { error } => event.failure(format!("{:?}", error.kind())),
            _ => event.success(),
        }
        result
    }

    /// Ask the server to deliver a challenge code, routing the outcome
    /// through a delegate.
    pub async fn send_challenge_with_delegate<D: MfaSendChallengeDelegate + ?Sized>(
        self,
        delegate: &D,
    ) {
        let correlation_id = self.correlation_id;
        let (result, event) = self
            .controller
            .send_challenge(&self.continuation_token, &self.username, &self.scopes, correlation_id)
            .await;
        dispatch_send_challenge(result, event, delegate, correlation_id).await;
    }

    /// Submit the challenge code and, on success, complete the sign-in.
    pub async fn submit_challenge(self, code: &str) -> MfaSubmitChallengeResult {
        let (result, event) = self
            .controller
            .submit_challenge(
                code,
                &self.continuation_token,
                &self.username,
                &self.scopes,
                self.correlation_id,
            )
            .await;
        match &result {
            MfaSubmitChallengeResult::InvalidCode { error, .. } => {
                event.failure(format!("{:?}", error.kind()))
            }
            MfaSubmitChallengeResult::Error { error } => {
                event.failure(format!("{:?}", error.kind()))
            }
            _ => event.success(),
        }
        result
    }

    /// Submit the challenge code, routing the outcome through a delegate.
    pub async fn submit_challenge_with_delegate<D: MfaSubmitChallengeDelegate + ?Sized>(
        self,
        code: &str,
        delegate: &D,
    ) {
        let correlation_id = self.correlation_id;
        let (result, event) = self
            .controller
            .submit_challenge(
                code,
                &self.continuation_token,
                &self.username,
                &self.scopes,
                correlation_id,
            )
            .await;
        dispatch_submit_challenge(result, event, delegate, correlation_id).await;
    }
}
