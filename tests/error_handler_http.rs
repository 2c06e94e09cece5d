//! Retry and device-auth behavior exercised over a real HTTP stack.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, header_exists, headers, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use native_auth_integration::types::responses::SignUpStartResponse;
use native_auth_integration::{
    ApiClient, ApiFailure, ApiRequest, DefaultDeviceAuthHandler, MockDeviceAuthHandler,
    NativeAuthError, Oauth2ErrorCode, ReqwestHttpTransport,
};

fn api_request(server: &MockServer) -> ApiRequest {
    ApiRequest {
        url: format!("{}/signup/v1.0/start", server.uri()),
        content_type: "application/json",
        body: json!({"client_id": "client-1"}).to_string(),
        correlation_id: "corr-1".to_string(),
    }
}

fn api_client(device_auth: Arc<dyn native_auth_integration::DeviceAuthHandler>) -> ApiClient {
    let transport = Arc::new(
        ReqwestHttpTransport::with_timeout(Duration::from_secs(5)).expect("transport builds"),
    );
    ApiClient::new(transport, device_auth, 1, Duration::from_millis(1))
}

#[tokio::test]
async fn test_retries_server_error_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/signup/v1.0/start"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/signup/v1.0/start"))
        .and(header("client-request-id", "corr-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "continuation_token": "ct-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = api_client(Arc::new(MockDeviceAuthHandler::new()));
    let response: SignUpStartResponse = client
        .execute(&api_request(&server))
        .await
        .expect("retried request succeeds");
    assert_eq!(response.continuation_token.as_deref(), Some("ct-1"));
}

#[tokio::test]
async fn test_retry_budget_exhausted_surfaces_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/signup/v1.0/start"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let client = api_client(Arc::new(MockDeviceAuthHandler::new()));
    let result: Result<SignUpStartResponse, _> = client.execute(&api_request(&server)).await;
    match result {
        Err(ApiFailure::Transport(NativeAuthError::Http(e))) => {
            assert_eq!(e.status, 503);
            assert!(e.server_unavailable);
        }
        other => panic!("expected http error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_device_auth_handshake_resends_with_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/signup/v1.0/start"))
        .respond_with(
            ResponseTemplate::new(401)
                .insert_header("WWW-Authenticate", "PKeyAuth Context=\"ctx-9\", Version=\"1.0\""),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/signup/v1.0/start"))
        // wiremock's `header` matcher splits incoming values on commas, so the
        // comma-containing expected value must be given as its split parts.
        .and(headers(
            "authorization",
            vec!["PKeyAuth Context=\"ctx-9\"", "Version=\"1.0\""],
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "continuation_token": "ct-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    // The default handler echoes the challenge context and version.
    let client = api_client(Arc::new(DefaultDeviceAuthHandler::new()));
    let response: SignUpStartResponse = client
        .execute(&api_request(&server))
        .await
        .expect("handshake resend succeeds");
    assert_eq!(response.continuation_token.as_deref(), Some("ct-1"));
}

#[tokio::test]
async fn test_custom_device_auth_response_is_attached() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/signup/v1.0/start"))
        .respond_with(
            ResponseTemplate::new(401)
                .insert_header("WWW-Authenticate", "PKeyAuth Context=\"ctx-9\", Version=\"1.0\""),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/signup/v1.0/start"))
        .and(header_exists("authorization"))
        .and(header("authorization", "PKeyAuth AuthToken=\"signed\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "continuation_token": "ct-1"
        })))
        .mount(&server)
        .await;

    let device_auth = Arc::new(MockDeviceAuthHandler::new());
    device_auth.set_response("PKeyAuth AuthToken=\"signed\"");

    let client = api_client(device_auth.clone());
    let _: SignUpStartResponse = client
        .execute(&api_request(&server))
        .await
        .expect("handshake resend succeeds");
    assert_eq!(device_auth.challenges().len(), 1);
}

#[tokio::test]
async fn test_api_error_body_is_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/signup/v1.0/start"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "user_already_exists",
            "error_description": "The user already exists."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = api_client(Arc::new(MockDeviceAuthHandler::new()));
    let result: Result<SignUpStartResponse, _> = client.execute(&api_request(&server)).await;
    match result {
        Err(ApiFailure::Api(body)) => {
            assert_eq!(body.error, Oauth2ErrorCode::UserAlreadyExists);
            assert_eq!(
                body.error_description.as_deref(),
                Some("The user already exists.")
            );
        }
        other => panic!("expected api error, got {other:?}"),
    }
}
