//! Request Error Handler
//!
//! Executes built requests against the transport, intercepting every
//! completed exchange:
//!
//! - 5xx with retry budget left: wait `retry_interval`, resend the identical
//!   request.
//! - 400/401 with a PKeyAuth `WWW-Authenticate` header: perform the device
//!   auth handshake, attach the resulting `Authorization` header, resend
//!   exactly once.
//! - 400/401 otherwise: hand the response to typed API-error decoding.
//! - any other status: surface a generic HTTP error.
//!
//! Only one retry direction fires per response. Retry state is a counter
//! local to the executing task; nothing is shared across requests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::{HttpError, NativeAuthError};
use crate::network::device_auth::{is_pkey_auth_challenge, DeviceAuthHandler};
use crate::network::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::network::{decode_response, ApiFailure, ApiRequest, ApiResult, CORRELATION_ID_HEADER};

/// Executes [`ApiRequest`]s with retry and device-auth handling.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    device_auth: Arc<dyn DeviceAuthHandler>,
    retry_count: u32,
    retry_interval: Duration,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        device_auth: Arc<dyn DeviceAuthHandler>,
        retry_count: u32,
        retry_interval: Duration,
    ) -> Self {
        Self {
            transport,
            device_auth,
            retry_count,
            retry_interval,
        }
    }

    /// Execute a request and decode the outcome for the endpoint's validator.
    pub async fn execute<S: DeserializeOwned>(&self, request: &ApiRequest) -> ApiResult<S> {
        match self.perform(request).await {
            Ok(response) => decode_response(response),
            Err(error) => Err(ApiFailure::Transport(error)),
        }
    }

    /// Perform a request, applying the retry/device-auth transition table.
    /// Returns responses with 2xx/400/401 status; everything else is an error.
    pub async fn perform(&self, request: &ApiRequest) -> Result<HttpResponse, NativeAuthError> {
        let mut http_request = self.to_http_request(request);
        let mut retries_left = self.retry_count;
        let mut device_auth_done = false;

        loop {
            let response = self.transport.post(http_request.clone()).await?;

            if (500..600).contains(&response.status) {
                if retries_left > 0 {
                    retries_left -= 1;
                    tracing::debug!(
                        status = response.status,
                        retries_left,
                        "retrying request after server error"
                    );
                    tokio::time::sleep(self.retry_interval).await;
                    continue;
                }
                return Err(HttpError {
                    status: response.status,
                    headers: response.headers,
                    server_unavailable: true,
                }
                .into());
            }

            if response.status == 400 || response.status == 401 {
                let challenge = response
                    .header("www-authenticate")
                    .filter(|v| is_pkey_auth_challenge(v))
                    .map(str::to_string);

                if let Some(challenge) = challenge {
                    if !device_auth_done {
                        device_auth_done = true;
                        tracing::debug!("answering device auth challenge");
                        let auth_header =
                            self.device_auth.respond(&challenge, &request.url).await?;
                        http_request
                            .headers
                            .insert("authorization".to_string(), auth_header);
                        continue;
                    }
                }
                return Ok(response);
            }

            if (200..300).contains(&response.status) {
                return Ok(response);
            }

            return Err(HttpError {
                status: response.status,
                headers: response.headers,
                server_unavailable: false,
            }
            .into());
        }
    }

    fn to_http_request(&self, request: &ApiRequest) -> HttpRequest {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), request.content_type.to_string());
        headers.insert("accept".to_string(), "application/json".to_string());
        headers.insert(
            CORRELATION_ID_HEADER.to_string(),
            request.correlation_id.clone(),
        );

        HttpRequest {
            url: request.url.clone(),
            headers,
            body: request.body.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::device_auth::MockDeviceAuthHandler;
    use crate::network::transport::MockHttpTransport;

    fn api_request() -> ApiRequest {
        ApiRequest {
            url: "https://contoso.ciamlogin.com/contoso/signup/v1.0/start".to_string(),
            content_type: "application/json",
            body: r#"{"client_id":"c"}"#.to_string(),
            correlation_id: "corr-1".to_string(),
        }
    }

    fn client(
        transport: Arc<MockHttpTransport>,
        device_auth: Arc<MockDeviceAuthHandler>,
        retry_count: u32,
    ) -> ApiClient {
        ApiClient::new(transport, device_auth, retry_count, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_success_passthrough() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json(200, serde_json::json!({"continuation_token": "ct"}));

        let client = client(transport.clone(), Arc::new(MockDeviceAuthHandler::new()), 2);
        let response = client.perform(&api_request()).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(transport.requests().len(), 1);

        // Correlation id header attached.
        let sent = transport.last_request().unwrap();
        assert_eq!(
            sent.headers.get(CORRELATION_ID_HEADER).map(String::as_str),
            Some("corr-1")
        );
    }

    #[tokio::test]
    async fn test_retries_5xx_until_budget_exhausted() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json(503, serde_json::json!({}));
        transport.queue_json(503, serde_json::json!({}));
        transport.queue_json(503, serde_json::json!({}));

        let client = client(transport.clone(), Arc::new(MockDeviceAuthHandler::new()), 2);
        let result = client.perform(&api_request()).await;

        // Initial attempt plus exactly two resends.
        assert_eq!(transport.requests().len(), 3);
        match result {
            Err(NativeAuthError::Http(e)) => {
                assert_eq!(e.status, 503);
                assert!(e.server_unavailable);
            }
            other => panic!("expected http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_zero_budget_surfaces_immediately() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json(503, serde_json::json!({}));

        let client = client(transport.clone(), Arc::new(MockDeviceAuthHandler::new()), 0);
        let result = client.perform(&api_request()).await;

        assert_eq!(transport.requests().len(), 1);
        assert!(matches!(result, Err(NativeAuthError::Http(_))));
    }

    #[tokio::test]
    async fn test_5xx_then_success() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json(500, serde_json::json!({}));
        transport.queue_json(200, serde_json::json!({"continuation_token": "ct"}));

        let client = client(transport.clone(), Arc::new(MockDeviceAuthHandler::new()), 1);
        let response = client.perform(&api_request()).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_pkey_auth_challenge_resends_once() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(HttpResponse {
            status: 401,
            headers: [(
                "www-authenticate".to_string(),
                "PKeyAuth Context=\"ctx\", Version=\"1.0\"".to_string(),
            )]
            .into_iter()
            .collect(),
            body: String::new(),
        });
        transport.queue_json(200, serde_json::json!({"continuation_token": "ct"}));

        let device_auth = Arc::new(MockDeviceAuthHandler::new());
        // Budget 0: the device-auth resend is independent of the retry budget.
        let client = client(transport.clone(), device_auth.clone(), 0);
        let response = client.perform(&api_request()).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(transport.requests().len(), 2);
        assert_eq!(device_auth.challenges().len(), 1);

        let resend = transport.last_request().unwrap();
        assert!(resend
            .headers
            .get("authorization")
            .unwrap()
            .contains("PKeyAuth"));
    }

    #[tokio::test]
    async fn test_second_pkey_auth_challenge_not_answered() {
        let challenge_response = HttpResponse {
            status: 401,
            headers: [(
                "www-authenticate".to_string(),
                "PKeyAuth Context=\"ctx\", Version=\"1.0\"".to_string(),
            )]
            .into_iter()
            .collect(),
            body: r#"{"error":"invalid_client"}"#.to_string(),
        };
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(challenge_response.clone());
        transport.queue_response(challenge_response);

        let client = client(transport.clone(), Arc::new(MockDeviceAuthHandler::new()), 2);
        let response = client.perform(&api_request()).await.unwrap();

        // Second challenge is returned as-is for API error decoding.
        assert_eq!(response.status, 401);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_plain_400_returned_for_decoding() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json(400, serde_json::json!({"error": "user_already_exists"}));

        let client = client(transport.clone(), Arc::new(MockDeviceAuthHandler::new()), 2);
        let response = client.perform(&api_request()).await.unwrap();
        assert_eq!(response.status, 400);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_unexpected_status_is_http_error() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json(404, serde_json::json!({}));

        let client = client(transport.clone(), Arc::new(MockDeviceAuthHandler::new()), 2);
        let result = client.perform(&api_request()).await;
        match result {
            Err(NativeAuthError::Http(e)) => {
                assert_eq!(e.status, 404);
                assert!(!e.server_unavailable);
            }
            other => panic!("expected http error, got {other:?}"),
        }
    }
}
