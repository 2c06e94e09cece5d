//! Wire Response Payloads
//!
//! Raw deserialized success bodies for each endpoint. Field presence is
//! validated by the response validators, not here.

use std::collections::HashMap;

use serde::Deserialize;

/// Challenge type issued by the server in a response body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeTypeIssued {
    Oob,
    Password,
    Redirect,
    Otp,
    #[serde(other)]
    Unknown,
}

/// Wire channel the one-time code was sent through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeChannel {
    Email,
    Phone,
    #[serde(other)]
    Unknown,
}

/// Public channel type reported on code-required outcomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelType {
    Email,
    Phone,
    Unknown,
}

impl ChallengeChannel {
    pub fn to_public(self) -> ChannelType {
        match self {
            Self::Email => ChannelType::Email,
            Self::Phone => ChannelType::Phone,
            Self::Unknown => ChannelType::Unknown,
        }
    }
}

/// Attribute reference in error payloads (`invalid_attributes` etc.).
#[derive(Clone, Debug, Deserialize)]
pub struct AttributeRef {
    pub name: String,
}

/// An attribute the service still requires, with its constraints.
#[derive(Clone, Debug, Deserialize)]
pub struct RequiredAttribute {
    pub name: String,
    #[serde(rename = "type", default)]
    pub attribute_type: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Option<serde_json::Value>,
}

/// signup/v1.0/start success body.
#[derive(Clone, Debug, Deserialize)]
pub struct SignUpStartResponse {
    #[serde(default)]
    pub challenge_type: Option<ChallengeTypeIssued>,
    #[serde(default)]
    pub continuation_token: Option<String>,
}

/// signup/v1.0/challenge success body. Shared shape with the sign-in and
/// reset-password challenge endpoints.
#[derive(Clone, Debug, Deserialize)]
pub struct ChallengeResponse {
    #[serde(default)]
    pub challenge_type: Option<ChallengeTypeIssued>,
    #[serde(default)]
    pub continuation_token: Option<String>,
    /// Masked display label of the code target, e.g. `u**@contoso.com`.
    #[serde(default)]
    pub challenge_target_label: Option<String>,
    #[serde(default)]
    pub challenge_channel: Option<ChallengeChannel>,
    #[serde(default)]
    pub code_length: Option<usize>,
    /// Interval hint for MFA challenges.
    #[serde(default)]
    pub interval: Option<u64>,
}

/// signup/v1.0/continue success body.
#[derive(Clone, Debug, Deserialize)]
pub struct SignUpContinueResponse {
    #[serde(default)]
    pub continuation_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// oauth2/v2.0/initiate success body.
#[derive(Clone, Debug, Deserialize)]
pub struct SignInInitiateResponse {
    #[serde(default)]
    pub challenge_type: Option<ChallengeTypeIssued>,
    #[serde(default)]
    pub continuation_token: Option<String>,
}

/// oauth2/v2.0/token success body.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// resetpassword/v1.0/start success body.
#[derive(Clone, Debug, Deserialize)]
pub struct ResetPasswordStartResponse {
    #[serde(default)]
    pub challenge_type: Option<ChallengeTypeIssued>,
    #[serde(default)]
    pub continuation_token: Option<String>,
}

/// resetpassword/v1.0/continue success body.
#[derive(Clone, Debug, Deserialize)]
pub struct ResetPasswordContinueResponse {
    #[serde(default)]
    pub continuation_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// resetpassword/v1.0/submit success body.
#[derive(Clone, Debug, Deserialize)]
pub struct ResetPasswordSubmitResponse {
    #[serde(default)]
    pub continuation_token: Option<String>,
    /// Seconds the client should wait between poll_completion calls.
    #[serde(default)]
    pub poll_interval: Option<u64>,
}

/// resetpassword/v1.0/poll_completion status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollStatus {
    NotStarted,
    InProgress,
    Succeeded,
    Failed,
    #[serde(other)]
    Unknown,
}

/// resetpassword/v1.0/poll_completion success body.
#[derive(Clone, Debug, Deserialize)]
pub struct ResetPasswordPollResponse {
    pub status: PollStatus,
    #[serde(default)]
    pub continuation_token: Option<String>,
}
