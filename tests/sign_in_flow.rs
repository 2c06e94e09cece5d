//! End-to-end sign-in and MFA flow tests against a mock transport.

use std::sync::Arc;

use serde_json::json;

use native_auth_integration::{
    create_in_memory_telemetry, InMemoryTokenCache, MfaSendChallengeResult,
    MfaSubmitChallengeResult, MockDeviceAuthHandler, MockHttpTransport, NativeAuthClient,
    NativeAuthConfig, SignInParameters, SignInStartErrorKind, SignInStartResult,
    SignInSubmitCodeResult,
};

fn client_with(transport: Arc<MockHttpTransport>) -> NativeAuthClient {
    let config = NativeAuthConfig::new(
        "client-1",
        "https://contoso.ciamlogin.com/contoso.onmicrosoft.com",
    )
    .unwrap();
    NativeAuthClient::with_components(
        config,
        transport,
        Arc::new(MockDeviceAuthHandler::new()),
        Arc::new(InMemoryTokenCache::new()),
        create_in_memory_telemetry(),
    )
}

fn token_body(access_token: &str) -> serde_json::Value {
    json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": 3600,
        "refresh_token": "rt-1",
        "id_token": "idt-1",
        "scope": "openid profile"
    })
}

#[tokio::test]
async fn test_sign_in_with_password_completes_and_caches() {
    let transport = Arc::new(MockHttpTransport::new());
    transport
        .queue_json(200, json!({"continuation_token": "ct-1"}))
        .queue_json(
            200,
            json!({"challenge_type": "password", "continuation_token": "ct-2"}),
        )
        .queue_json(200, token_body("at-1"));
    let client = client_with(transport.clone());

    let parameters = SignInParameters::new("user@contoso.com").with_password("hunter2");
    let account = match client.sign_in(parameters).await {
        SignInStartResult::Completed { account } => account,
        _ => panic!("expected completed sign-in"),
    };
    assert_eq!(account.username, "user@contoso.com");

    // The token round trip went to the token endpoint with the password grant.
    let token_request = transport.last_request().unwrap();
    assert!(token_request.url.ends_with("/oauth2/v2.0/token"));
    assert!(token_request.body.contains("grant_type=password"));
    assert!(token_request.body.contains("username=user%40contoso.com"));

    // The account is retrievable from the cache until signed out.
    let cached = client.retrieve_account("user@contoso.com").await.unwrap();
    assert!(cached.is_some());
    assert!(client.sign_out("user@contoso.com").await.unwrap());
    assert!(client
        .retrieve_account("user@contoso.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_sign_in_with_code_flow() {
    let transport = Arc::new(MockHttpTransport::new());
    transport
        .queue_json(200, json!({"continuation_token": "ct-1"}))
        .queue_json(
            200,
            json!({
                "challenge_type": "oob",
                "continuation_token": "ct-2",
                "challenge_target_label": "u**@contoso.com",
                "challenge_channel": "email",
                "code_length": 6
            }),
        )
        .queue_json(200, token_body("at-1"));
    let client = client_with(transport.clone());

    let state = match client.sign_in(SignInParameters::new("user@contoso.com")).await {
        SignInStartResult::CodeRequired { state, code_length, .. } => {
            assert_eq!(code_length, 6);
            state
        }
        _ => panic!("expected code required"),
    };

    match state.submit_code("123456").await {
        SignInSubmitCodeResult::Completed { account } => {
            assert_eq!(account.username, "user@contoso.com");
        }
        _ => panic!("expected completed sign-in"),
    }
    let token_request = transport.last_request().unwrap();
    assert!(token_request.body.contains("grant_type=oob"));
    assert!(token_request.body.contains("oob=123456"));
}

#[tokio::test]
async fn test_sign_in_mfa_round_trip() {
    let transport = Arc::new(MockHttpTransport::new());
    transport
        .queue_json(200, json!({"continuation_token": "ct-1"}))
        .queue_json(
            200,
            json!({"challenge_type": "password", "continuation_token": "ct-2"}),
        )
        .queue_json(
            400,
            json!({
                "error": "invalid_grant",
                "suberror": "mfa_required",
                "continuation_token": "ct-mfa"
            }),
        )
        .queue_json(
            200,
            json!({
                "challenge_type": "oob",
                "continuation_token": "ct-mfa-2",
                "challenge_target_label": "+35***123",
                "challenge_channel": "phone",
                "code_length": 6
            }),
        )
        .queue_json(200, token_body("at-mfa"));
    let client = client_with(transport);

    let parameters = SignInParameters::new("user@contoso.com").with_password("hunter2");
    let mfa_state = match client.sign_in(parameters).await {
        SignInStartResult::AwaitingMfa { state } => state,
        _ => panic!("expected awaiting mfa"),
    };

    let mfa_state = match mfa_state.send_challenge().await {
        MfaSendChallengeResult::CodeRequired { state, sent_to, .. } => {
            assert_eq!(sent_to, "+35***123");
            state
        }
        _ => panic!("expected mfa code required"),
    };

    match mfa_state.submit_challenge("654321").await {
        MfaSubmitChallengeResult::Completed { account } => {
            assert_eq!(account.access_token().expose(), "at-mfa");
        }
        _ => panic!("expected completed mfa sign-in"),
    }
}

#[tokio::test]
async fn test_sign_in_user_not_found() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.queue_json(400, json!({"error": "user_not_found"}));
    let client = client_with(transport);

    match client.sign_in(SignInParameters::new("missing@contoso.com")).await {
        SignInStartResult::Error { error } => {
            assert_eq!(error.kind(), SignInStartErrorKind::UserNotFound);
        }
        _ => panic!("expected error"),
    }
}

#[tokio::test]
async fn test_sign_in_challenge_types_advertised() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.queue_json(400, json!({"error": "user_not_found"}));
    let client = client_with(transport.clone());

    let _ = client.sign_in(SignInParameters::new("user@contoso.com")).await;

    let initiate = transport.last_request().unwrap();
    assert!(initiate.body.contains("challenge_type=oob+password+redirect"));
    assert!(initiate.body.contains("client_id=client-1"));
}
