//! Flow Controllers
//!
//! Controllers orchestrate the request/validate/outcome cycle of each flow.
//! Every public operation returns an `(outcome, EventHandle)` pair: the
//! outcome is a closed enum of next steps, and the telemetry event is
//! completed by whoever consumes the outcome (the delegate dispatcher or the
//! structured-result wrapper on the flow states).

pub mod mfa;
pub mod reset_password;
pub mod sign_in;
pub mod sign_up;

pub use mfa::{MfaController, MfaSendChallengeResult, MfaSubmitChallengeResult};
pub use reset_password::{
    ResetPasswordController, ResetPasswordResendCodeResult, ResetPasswordStartResult,
    ResetPasswordSubmitCodeResult, ResetPasswordSubmitPasswordResult,
};
pub use sign_in::{
    SignInAfterPreviousFlowResult, SignInController, SignInResendCodeResult,
    SignInStartResult, SignInSubmitCodeResult, SignInSubmitPasswordResult,
};
pub use sign_up::{
    SignUpController, SignUpResendCodeResult, SignUpStartResult, SignUpSubmitAttributesResult,
    SignUpSubmitCodeResult, SignUpSubmitPasswordResult,
};

use serde::de::DeserializeOwned;

use crate::error::public::messages;
use crate::error::{ApiErrorResponse, NativeAuthError};
use crate::network::{ApiClient, ApiFailure, ApiRequest};
use crate::validators::EndpointResult;

/// Execute one endpoint call, splitting transport failures from decoded
/// outcomes so the validators only see wire-level results.
pub(crate) async fn execute_endpoint<S: DeserializeOwned>(
    client: &ApiClient,
    request: Result<ApiRequest, NativeAuthError>,
) -> Result<EndpointResult<S>, NativeAuthError> {
    let request = request?;
    match client.execute::<S>(&request).await {
        Ok(body) => Ok(Ok(body)),
        Err(ApiFailure::Api(error)) => Ok(Err(error)),
        Err(ApiFailure::Transport(error)) => Err(error),
    }
}

/// Message for an `UnexpectedError` validated response.
pub(crate) fn unexpected_message(error: Option<&ApiErrorResponse>) -> String {
    error
        .and_then(|e| e.error_description.clone())
        .unwrap_or_else(|| messages::UNEXPECTED_RESPONSE_BODY.to_string())
}
