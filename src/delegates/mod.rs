//! Flow Delegates
//!
//! Callback-style consumption of flow outcomes. Each flow stage has a
//! delegate trait with one mandatory error method and optional outcome
//! methods. Optional methods default to returning [`Dispatch::Declined`];
//! when an outcome lands on a declined method, the dispatcher records the
//! operation as failed and routes a "not implemented" error through the
//! mandatory error method, so no outcome is ever silently dropped.

pub mod mfa;
pub mod reset_password;
pub mod sign_in;
pub mod sign_up;

pub use mfa::{MfaSendChallengeDelegate, MfaSubmitChallengeDelegate};
pub use reset_password::{
    ResetPasswordRequiredDelegate, ResetPasswordResendCodeDelegate, ResetPasswordStartDelegate,
    ResetPasswordVerifyCodeDelegate,
};
pub use sign_in::{
    SignInAfterPreviousFlowDelegate, SignInPasswordRequiredDelegate, SignInResendCodeDelegate,
    SignInStartDelegate, SignInVerifyCodeDelegate,
};
pub use sign_up::{
    SignUpAttributesRequiredDelegate, SignUpPasswordRequiredDelegate, SignUpResendCodeDelegate,
    SignUpStartDelegate, SignUpVerifyCodeDelegate,
};

/// Whether a delegate implemented the optional method for an outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// The delegate handled the outcome.
    Handled,
    /// The delegate does not implement the method; the dispatcher falls back
    /// to the mandatory error method.
    Declined,
}
