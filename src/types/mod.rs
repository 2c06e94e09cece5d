//! Native Auth Data Types
//!
//! Configuration, flow parameters, wire payloads and account types.

pub mod account;
pub mod config;
pub mod parameters;
pub mod responses;

pub use account::{AccessToken, StoredTokens, UserAccountResult};
pub use config::{ChallengeType, NativeAuthConfig, DEFAULT_RETRY_COUNT, DEFAULT_RETRY_INTERVAL};
pub use parameters::{
    RequestContext, ResetPasswordParameters, SignInParameters, SignUpParameters, UserAttributes,
};
pub use responses::{
    AttributeRef, ChallengeChannel, ChallengeTypeIssued, ChannelType, PollStatus,
    RequiredAttribute, TokenResponse,
};
