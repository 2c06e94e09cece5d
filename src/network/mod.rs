//! Network Layer
//!
//! Transport abstraction, request building, and the request error handler
//! sitting between controllers and the wire.

pub mod device_auth;
pub mod error_handler;
pub mod providers;
pub mod transport;

pub use device_auth::{
    is_pkey_auth_challenge, DefaultDeviceAuthHandler, DeviceAuthHandler, MockDeviceAuthHandler,
    PKEY_AUTH_SCHEME,
};
pub use error_handler::ApiClient;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, MockHttpTransport, ReqwestHttpTransport};

use serde::de::DeserializeOwned;

use crate::error::{ApiErrorResponse, NativeAuthError, ProtocolError};

/// Correlation id header attached to every request.
pub const CORRELATION_ID_HEADER: &str = "client-request-id";

/// A built native auth API request, ready to execute.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    /// Absolute endpoint URL.
    pub url: String,
    /// Content type of `body`.
    pub content_type: &'static str,
    /// Encoded request body.
    pub body: String,
    /// Correlation id value for the request headers.
    pub correlation_id: String,
}

/// How an executed request failed, as seen by the validators.
#[derive(Debug)]
pub enum ApiFailure {
    /// The server reported a well-formed oauth2 error body.
    Api(ApiErrorResponse),
    /// Anything else: transport, HTTP-level, or decode failure.
    Transport(NativeAuthError),
}

/// Result of executing a request against one endpoint.
pub type ApiResult<S> = Result<S, ApiFailure>;

/// Decode a completed exchange into the endpoint's success payload or a typed
/// API error. 2xx bodies decode as `S`; 400/401 bodies decode as
/// [`ApiErrorResponse`]; malformed bodies become decode failures.
pub(crate) fn decode_response<S: DeserializeOwned>(response: HttpResponse) -> ApiResult<S> {
    if (200..300).contains(&response.status) {
        serde_json::from_str::<S>(&response.body).map_err(|e| {
            ApiFailure::Transport(NativeAuthError::Protocol(ProtocolError::InvalidResponse {
                message: format!("Failed to decode success body: {e}"),
            }))
        })
    } else {
        match serde_json::from_str::<ApiErrorResponse>(&response.body) {
            Ok(api_error) => Err(ApiFailure::Api(api_error)),
            Err(e) => Err(ApiFailure::Transport(NativeAuthError::Protocol(
                ProtocolError::InvalidResponse {
                    message: format!("Failed to decode error body: {e}"),
                },
            ))),
        }
    }
}
