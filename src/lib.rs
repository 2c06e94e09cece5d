//! Native Auth Integration Module
//!
//! Browserless ("native") authentication client for CIAM tenants: complete
//! sign-up, sign-in and password-reset flows over HTTPS without a browser or
//! embedded web view.
//!
//! # Features
//!
//! - Sign-up with one-time code, password and custom attributes
//! - Sign-in with one-time code or password, including MFA challenges
//! - Self-service password reset with bounded completion polling
//! - Continuation-token handoff from completed sign-up/reset into sign-in
//! - Typed multi-step flow states that make out-of-order calls impossible
//! - Delegate-based outcome routing as an alternative to matching results
//! - Transparent 5xx retry and PKeyAuth device-auth handshake
//!
//! # Example
//!
//! ```rust,ignore
//! use native_auth_integration::{
//!     native_auth_config, NativeAuthClient, SignInParameters, SignInStartResult,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = native_auth_config()
//!         .client_id("my-client-id")
//!         .authority("https://contoso.ciamlogin.com/contoso.onmicrosoft.com")
//!         .build()?;
//!     let client = NativeAuthClient::new(config)?;
//!
//!     let parameters = SignInParameters::new("user@contoso.com").with_password("hunter2");
//!     match client.sign_in(parameters).await {
//!         SignInStartResult::Completed { account } => {
//!             println!("signed in as {}", account.username);
//!         }
//!         SignInStartResult::AwaitingMfa { state } => {
//!             let _ = state.send_challenge().await;
//!         }
//!         other => {
//!             let _ = other;
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The module is organized into several sub-modules:
//!
//! - `types`: configuration, flow parameters, wire responses and accounts
//! - `error`: oauth2 error taxonomy and public per-flow errors
//! - `network`: HTTP transport, request providers and the retrying API client
//! - `validators`: response validation into typed per-endpoint outcomes
//! - `controllers`: flow orchestration across endpoints
//! - `states`: typed multi-step flow states handed to the caller
//! - `delegates`: delegate traits for callback-style outcome routing
//! - `cache`: token cache collaborator
//! - `builders`: fluent configuration builder
//! - `client`: high-level client combining all flows

pub mod builders;
pub mod cache;
pub mod client;
pub mod controllers;
pub mod delegates;
pub mod error;
pub mod network;
pub mod states;
pub mod telemetry;
pub mod types;
pub mod validators;

// Re-export main client
pub use client::NativeAuthClient;

// Re-export builders
pub use builders::{native_auth_config, NativeAuthConfigBuilder};

// Re-export errors
pub use error::{
    ApiErrorResponse, AttributesRequiredError, AttributesRequiredErrorKind, ConfigurationError,
    ErrorTag, HttpError, MfaError, MfaErrorKind, NativeAuthError, NetworkError, Oauth2ErrorCode,
    PasswordRequiredError, PasswordRequiredErrorKind, ProtocolError, ResendCodeError,
    ResendCodeErrorKind, ResetPasswordStartError, ResetPasswordStartErrorKind,
    SignInAfterPreviousFlowError, SignInAfterPreviousFlowErrorKind, SignInStartError,
    SignInStartErrorKind, SignUpStartError, SignUpStartErrorKind, SubErrorCode, VerifyCodeError,
    VerifyCodeErrorKind,
};

// Re-export types
pub use types::{
    // Config
    ChallengeType, NativeAuthConfig,
    // Parameters
    ResetPasswordParameters, SignInParameters, SignUpParameters, UserAttributes,
    // Responses
    ChannelType, RequiredAttribute,
    // Account
    AccessToken, StoredTokens, UserAccountResult,
};

// Re-export flow results
pub use controllers::{
    MfaSendChallengeResult, MfaSubmitChallengeResult, ResetPasswordResendCodeResult,
    ResetPasswordStartResult, ResetPasswordSubmitCodeResult, ResetPasswordSubmitPasswordResult,
    SignInAfterPreviousFlowResult, SignInResendCodeResult, SignInStartResult,
    SignInSubmitCodeResult, SignInSubmitPasswordResult, SignUpResendCodeResult, SignUpStartResult,
    SignUpSubmitAttributesResult, SignUpSubmitCodeResult, SignUpSubmitPasswordResult,
};

// Re-export flow states
pub use states::{
    MfaRequiredState, ResetPasswordCodeRequiredState, ResetPasswordRequiredState,
    SignInAfterResetPasswordState, SignInAfterSignUpState, SignInCodeRequiredState,
    SignInPasswordRequiredState, SignUpAttributesRequiredState, SignUpCodeRequiredState,
    SignUpPasswordRequiredState,
};

// Re-export delegates
pub use delegates::{
    Dispatch, MfaSendChallengeDelegate, MfaSubmitChallengeDelegate, ResetPasswordRequiredDelegate,
    ResetPasswordResendCodeDelegate, ResetPasswordStartDelegate, ResetPasswordVerifyCodeDelegate,
    SignInAfterPreviousFlowDelegate, SignInPasswordRequiredDelegate, SignInResendCodeDelegate,
    SignInStartDelegate, SignInVerifyCodeDelegate, SignUpAttributesRequiredDelegate,
    SignUpPasswordRequiredDelegate, SignUpResendCodeDelegate, SignUpStartDelegate,
    SignUpVerifyCodeDelegate,
};

// Re-export network components
pub use network::{
    ApiClient, ApiFailure, ApiRequest, DefaultDeviceAuthHandler, DeviceAuthHandler, HttpRequest,
    HttpResponse, HttpTransport, MockDeviceAuthHandler, MockHttpTransport, ReqwestHttpTransport,
};

// Re-export cache
pub use cache::{InMemoryTokenCache, TokenCache};

// Re-export telemetry
pub use telemetry::{
    create_in_memory_telemetry, no_op_telemetry, ApiId, FlowTelemetry, InMemoryTelemetry,
    NoOpTelemetry, TelemetryRecord,
};
