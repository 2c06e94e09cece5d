//! Flow States
//!
//! Immutable hand-back objects representing "the flow now needs X". Each
//! state carries the continuation token, the username and the correlation id
//! of its flow, plus the controller that can advance it. Methods consume the
//! state; the server invalidates a continuation token once used, so a state
//! cannot be replayed.
//!
//! Every operation exists in two flavors: a structured-result method, and a
//! `*_with_delegate` method routing the outcome through a delegate trait.

pub mod mfa;
pub mod reset_password;
pub mod sign_in;
pub mod sign_up;

pub use mfa::MfaRequiredState;
pub use reset_password::{ResetPasswordCodeRequiredState, ResetPasswordRequiredState};
pub use sign_in::{
    SignInAfterResetPasswordState, SignInAfterSignUpState, SignInCodeRequiredState,
    SignInPasswordRequiredState,
};
pub use sign_up::{
    SignUpAttributesRequiredState, SignUpCodeRequiredState, SignUpPasswordRequiredState,
};
