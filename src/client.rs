//! Native Auth Client
//!
//! High-level client that wires the controllers together and exposes the
//! entry point of each flow. One instance is intended to live for the
//! lifetime of the application.

use std::sync::Arc;

use secrecy::ExposeSecret;
use uuid::Uuid;

use crate::cache::{InMemoryTokenCache, TokenCache};
use crate::controllers::mfa::MfaController;
use crate::controllers::reset_password::ResetPasswordController;
use crate::controllers::sign_in::SignInController;
use crate::controllers::sign_up::SignUpController;
use crate::controllers::{ResetPasswordStartResult, SignInStartResult, SignUpStartResult};
use crate::delegates::reset_password::{dispatch_start as dispatch_reset_password_start, ResetPasswordStartDelegate};
use crate::delegates::sign_in::{dispatch_start as dispatch_sign_in_start, SignInStartDelegate};
use crate::delegates::sign_up::{dispatch_start as dispatch_sign_up_start, SignUpStartDelegate};
use crate::error::public::messages;
use crate::error::{
    NativeAuthError, ResetPasswordStartError, SignInStartError, SignUpStartError,
};
use crate::network::device_auth::{DefaultDeviceAuthHandler, DeviceAuthHandler};
use crate::network::providers::{
    ResetPasswordRequestProvider, SignInRequestProvider, SignUpRequestProvider,
};
use crate::network::transport::{HttpTransport, ReqwestHttpTransport};
use crate::network::ApiClient;
use crate::telemetry::{no_op_telemetry, FlowTelemetry};
use crate::types::{
    NativeAuthConfig, ResetPasswordParameters, SignInParameters, SignUpParameters,
    UserAccountResult,
};

/// Client for browserless sign-up, sign-in and password-reset flows.
pub struct NativeAuthClient {
    config: Arc<NativeAuthConfig>,
    cache: Arc<dyn TokenCache>,
    sign_up: Arc<SignUpController>,
    sign_in: Arc<SignInController>,
    reset_password: Arc<ResetPasswordController>,
}

impl NativeAuthClient {
    /// Create a client with the default transport, device-auth handler and
    /// in-memory token cache.
    pub fn new(config: NativeAuthConfig) -> Result<Self, NativeAuthError> {
        let transport = Arc::new(ReqwestHttpTransport::with_timeout(config.timeout)?);
        Ok(Self::with_components(
            config,
            transport,
            Arc::new(DefaultDeviceAuthHandler::new()),
            Arc::new(InMemoryTokenCache::new()),
            no_op_telemetry(),
        ))
    }

    /// Create a client with custom collaborators.
    pub fn with_components(
        config: NativeAuthConfig,
        transport: Arc<dyn HttpTransport>,
        device_auth: Arc<dyn DeviceAuthHandler>,
        cache: Arc<dyn TokenCache>,
        telemetry: Arc<dyn FlowTelemetry>,
    ) -> Self {
        let config = Arc::new(config);
        let api_client = ApiClient::new(
            transport,
            device_auth,
            config.retry_count,
            config.retry_interval,
        );

        let mfa = Arc::new(MfaController::new(
            api_client.clone(),
            SignInRequestProvider::new(config.clone()),
            telemetry.clone(),
            cache.clone(),
        ));
        let sign_in = Arc::new(SignInController::new(
            api_client.clone(),
            SignInRequestProvider::new(config.clone()),
            telemetry.clone(),
            cache.clone(),
            mfa,
        ));
        let sign_up = Arc::new(SignUpController::new(
            api_client.clone(),
            SignUpRequestProvider::new(config.clone()),
            telemetry.clone(),
            sign_in.clone(),
        ));
        let reset_password = Arc::new(ResetPasswordController::new(
            api_client,
            ResetPasswordRequestProvider::new(config.clone()),
            telemetry,
            sign_in.clone(),
        ));

        Self {
            config,
            cache,
            sign_up,
            sign_in,
            reset_password,
        }
    }

    /// The client configuration.
    pub fn config(&self) -> &NativeAuthConfig {
        &self.config
    }

    /// Start a sign-up flow.
    pub async fn sign_up(&self, parameters: SignUpParameters) -> SignUpStartResult {
        if let Some(error) = invalid_sign_up_input(&parameters) {
            return SignUpStartResult::Error { error };
        }
        let (result, event) = self.sign_up.start(&parameters).await;
        match &result {
            SignUpStartResult::Error { error } => event.failure(format!("{:?}", error.kind())),
            SignUpStartResult::AttributesInvalid { .. } => event.failure("InvalidAttributes"),
            _ => event.success(),
        }
        result
    }

    /// Start a sign-up flow, routing the outcome through a delegate.
    pub async fn sign_up_with_delegate<D: SignUpStartDelegate + ?Sized>(
        &self,
        parameters: SignUpParameters,
        delegate: &D,
    ) {
        let correlation_id = correlation_id_of(parameters.correlation_id);
        if let Some(error) = invalid_sign_up_input(&parameters) {
            delegate.on_sign_up_start_error(error).await;
            return;
        }
        let (result, event) = self.sign_up.start(&parameters).await;
        dispatch_sign_up_start(result, event, delegate, correlation_id).await;
    }

    /// Start a sign-in flow.
    pub async fn sign_in(&self, parameters: SignInParameters) -> SignInStartResult {
        if let Some(error) = invalid_sign_in_input(&parameters) {
            return SignInStartResult::Error { error };
        }
        let (result, event) = self.sign_in.start(&parameters).await;
        match &result {
            SignInStartResult::Error { error } => event.failure(format!("{:?}", error.kind())),
            _ => event.success(),
        }
        result
    }

    /// Start a sign-in flow, routing the outcome through a delegate.
    pub async fn sign_in_with_delegate<D: SignInStartDelegate + ?Sized>(
        &self,
        parameters: SignInParameters,
        delegate: &D,
    ) {
        let correlation_id = correlation_id_of(parameters.correlation_id);
        if let Some(error) = invalid_sign_in_input(&parameters) {
            delegate.on_sign_in_start_error(error).await;
            return;
        }
        let (result, event) = self.sign_in.start(&parameters).await;
        dispatch_sign_in_start(result, event, delegate, correlation_id).await;
    }

    /// Start a password-reset flow.
    pub async fn reset_password(
        &self,
        parameters: ResetPasswordParameters,
    ) -> ResetPasswordStartResult {
        if parameters.username.trim().is_empty() {
            return ResetPasswordStartResult::Error {
                error: ResetPasswordStartError::general_with_message(
                    messages::EMPTY_USERNAME,
                    correlation_id_of(parameters.correlation_id),
                ),
            };
        }
        let (result, event) = self.reset_password.start(&parameters).await;
        match &result {
            ResetPasswordStartResult::Error { error } => {
                event.failure(format!("{:?}", error.kind()))
            }
            _ => event.success(),
        }
        result
    }

    /// Start a password-reset flow, routing the outcome through a delegate.
    pub async fn reset_password_with_delegate<D: ResetPasswordStartDelegate + ?Sized>(
        &self,
        parameters: ResetPasswordParameters,
        delegate: &D,
    ) {
        let correlation_id = correlation_id_of(parameters.correlation_id);
        if parameters.username.trim().is_empty() {
            delegate
                .on_reset_password_start_error(ResetPasswordStartError::general_with_message(
                    messages::EMPTY_USERNAME,
                    correlation_id,
                ))
                .await;
            return;
        }
        let (result, event) = self.reset_password.start(&parameters).await;
        dispatch_reset_password_start(result, event, delegate, correlation_id).await;
    }

    /// Fetch the cached account for a username, if one is signed in.
    pub async fn retrieve_account(
        &self,
        username: &str,
    ) -> Result<Option<UserAccountResult>, NativeAuthError> {
        let tokens = self.cache.retrieve(username).await?;
        Ok(tokens.map(|tokens| UserAccountResult::from_stored(username, &tokens)))
    }

    /// Remove the cached tokens for a username. Returns whether an account
    /// was signed in.
    pub async fn sign_out(&self, username: &str) -> Result<bool, NativeAuthError> {
        self.cache.delete(username).await
    }
}

fn correlation_id_of(correlation_id: Option<Uuid>) -> Uuid {
    correlation_id.unwrap_or_else(Uuid::new_v4)
}

fn invalid_sign_up_input(parameters: &SignUpParameters) -> Option<SignUpStartError> {
    let correlation_id = correlation_id_of(parameters.correlation_id);
    if parameters.username.trim().is_empty() {
        return Some(SignUpStartError::general_with_message(
            messages::EMPTY_USERNAME,
            correlation_id,
        ));
    }
    if let Some(password) = &parameters.password {
        if password.expose_secret().is_empty() {
            return Some(SignUpStartError::general_with_message(
                messages::EMPTY_PASSWORD,
                correlation_id,
            ));
        }
    }
    None
}

fn invalid_sign_in_input(parameters: &SignInParameters) -> Option<SignInStartError> {
    let correlation_id = correlation_id_of(parameters.correlation_id);
    if parameters.username.trim().is_empty() {
        return Some(SignInStartError::general_with_message(
            messages::EMPTY_USERNAME,
            correlation_id,
        ));
    }
    if let Some(password) = &parameters.password {
        if password.expose_secret().is_empty() {
            return Some(SignInStartError::general_with_message(
                messages::EMPTY_PASSWORD,
                correlation_id,
            ));
        }
    }
    None
}
