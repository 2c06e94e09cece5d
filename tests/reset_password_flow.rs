//! End-to-end password-reset flow tests against a mock transport.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use native_auth_integration::{
    create_in_memory_telemetry, InMemoryTokenCache, MockDeviceAuthHandler, MockHttpTransport,
    NativeAuthClient, NativeAuthConfig, PasswordRequiredErrorKind, ResetPasswordParameters,
    ResetPasswordStartErrorKind, ResetPasswordStartResult, ResetPasswordSubmitCodeResult,
    ResetPasswordSubmitPasswordResult, SignInAfterPreviousFlowResult,
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

fn oob_challenge_body(continuation_token: &str) -> serde_json::Value {
    json!({
        "challenge_type": "oob",
        "continuation_token": continuation_token,
        "challenge_target_label": "u**@contoso.com",
        "challenge_channel": "email",
        "code_length": 8
    })
}

async fn code_required_state(
    client: &NativeAuthClient,
) -> native_auth_integration::ResetPasswordCodeRequiredState {
    match client
        .reset_password(ResetPasswordParameters::new("user@contoso.com"))
        .await
    {
        ResetPasswordStartResult::CodeRequired { state, .. } => state,
        _ => panic!("expected code required"),
    }
}

#[tokio::test]
async fn test_reset_password_to_signed_in_account() {
    let transport = Arc::new(MockHttpTransport::new());
    transport
        .queue_json(200, json!({"continuation_token": "ct-1"}))
        .queue_json(200, oob_challenge_body("ct-2"))
        .queue_json(200, json!({"continuation_token": "ct-3"}))
        .queue_json(
            200,
            json!({"continuation_token": "ct-4", "poll_interval": 0}),
        )
        .queue_json(
            200,
            json!({"status": "succeeded", "continuation_token": "ct-5"}),
        )
        .queue_json(
            200,
            json!({
                "access_token": "at-1",
                "token_type": "Bearer",
                "expires_in": 3600,
                "scope": "openid"
            }),
        );
    let client = client_with(transport.clone());

    let state = code_required_state(&client).await;
    let password_state = match state.submit_code("12345678").await {
        ResetPasswordSubmitCodeResult::PasswordRequired { state } => state,
        _ => panic!("expected password required"),
    };

    let sign_in_state = match password_state.submit_password("n3w-Passw0rd!").await {
        ResetPasswordSubmitPasswordResult::Completed { state } => state,
        _ => panic!("expected completed reset"),
    };

    match sign_in_state.sign_in(vec![]).await {
        SignInAfterPreviousFlowResult::Completed { account } => {
            assert_eq!(account.username, "user@contoso.com");
        }
        _ => panic!("expected completed sign-in"),
    }

    let urls: Vec<String> = transport.requests().iter().map(|r| r.url.clone()).collect();
    assert!(urls[3].ends_with("/resetpassword/v1.0/submit"));
    assert!(urls[4].ends_with("/resetpassword/v1.0/poll_completion"));
    assert!(urls[5].ends_with("/oauth2/v2.0/token"));
}

#[tokio::test]
async fn test_reset_password_polls_through_in_progress() {
    let transport = Arc::new(MockHttpTransport::new());
    transport
        .queue_json(200, json!({"continuation_token": "ct-1"}))
        .queue_json(200, oob_challenge_body("ct-2"))
        .queue_json(200, json!({"continuation_token": "ct-3"}))
        .queue_json(
            200,
            json!({"continuation_token": "ct-4", "poll_interval": 0}),
        )
        .queue_json(200, json!({"status": "in_progress"}))
        .queue_json(200, json!({"status": "succeeded"}));
    let client = client_with(transport.clone());

    let state = code_required_state(&client).await;
    let password_state = match state.submit_code("12345678").await {
        ResetPasswordSubmitCodeResult::PasswordRequired { state } => state,
        _ => panic!("expected password required"),
    };

    match password_state.submit_password("n3w-Passw0rd!").await {
        ResetPasswordSubmitPasswordResult::Completed { .. } => {}
        _ => panic!("expected completed reset"),
    }
    // start, challenge, continue, submit, two polls
    assert_eq!(transport.requests().len(), 6);
}

#[tokio::test]
async fn test_reset_password_poll_failed() {
    let transport = Arc::new(MockHttpTransport::new());
    transport
        .queue_json(200, json!({"continuation_token": "ct-1"}))
        .queue_json(200, oob_challenge_body("ct-2"))
        .queue_json(200, json!({"continuation_token": "ct-3"}))
        .queue_json(
            200,
            json!({"continuation_token": "ct-4", "poll_interval": 0}),
        )
        .queue_json(200, json!({"status": "failed"}));
    let client = client_with(transport);

    let state = code_required_state(&client).await;
    let password_state = match state.submit_code("12345678").await {
        ResetPasswordSubmitCodeResult::PasswordRequired { state } => state,
        _ => panic!("expected password required"),
    };

    match password_state.submit_password("n3w-Passw0rd!").await {
        ResetPasswordSubmitPasswordResult::Error { error } => {
            assert_eq!(error.kind(), PasswordRequiredErrorKind::GeneralError);
        }
        _ => panic!("expected error"),
    }
}

#[tokio::test]
async fn test_reset_password_weak_password_retries_on_state() {
    let transport = Arc::new(MockHttpTransport::new());
    transport
        .queue_json(200, json!({"continuation_token": "ct-1"}))
        .queue_json(200, oob_challenge_body("ct-2"))
        .queue_json(200, json!({"continuation_token": "ct-3"}))
        .queue_json(
            400,
            json!({"error": "invalid_grant", "suberror": "password_too_weak"}),
        );
    let client = client_with(transport);

    let state = code_required_state(&client).await;
    let password_state = match state.submit_code("12345678").await {
        ResetPasswordSubmitCodeResult::PasswordRequired { state } => state,
        _ => panic!("expected password required"),
    };

    match password_state.submit_password("weak").await {
        ResetPasswordSubmitPasswordResult::InvalidPassword { error, .. } => {
            assert_eq!(error.kind(), PasswordRequiredErrorKind::InvalidPassword);
        }
        _ => panic!("expected invalid password"),
    }
}

#[tokio::test]
async fn test_reset_password_user_not_found() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.queue_json(400, json!({"error": "user_not_found"}));
    let client = client_with(transport);

    match client
        .reset_password(ResetPasswordParameters::new("missing@contoso.com"))
        .await
    {
        ResetPasswordStartResult::Error { error } => {
            assert_eq!(error.kind(), ResetPasswordStartErrorKind::UserNotFound);
        }
        _ => panic!("expected error"),
    }
}

#[tokio::test]
async fn test_reset_password_poll_budget_exhausted() {
    let transport = Arc::new(MockHttpTransport::new());
    transport
        .queue_json(200, json!({"continuation_token": "ct-1"}))
        .queue_json(200, oob_challenge_body("ct-2"))
        .queue_json(200, json!({"continuation_token": "ct-3"}))
        .queue_json(
            200,
            json!({"continuation_token": "ct-4", "poll_interval": 0}),
        );
    for _ in 0..5 {
        transport.queue_json(200, json!({"status": "in_progress"}));
    }
    let client = client_with(transport.clone());

    let state = code_required_state(&client).await;
    let password_state = match state.submit_code("12345678").await {
        ResetPasswordSubmitCodeResult::PasswordRequired { state } => state,
        _ => panic!("expected password required"),
    };

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        password_state.submit_password("n3w-Passw0rd!"),
    )
    .await
    .expect("poll loop must terminate");
    match result {
        ResetPasswordSubmitPasswordResult::Error { error } => {
            assert_eq!(error.kind(), PasswordRequiredErrorKind::GeneralError);
        }
        _ => panic!("expected error after exhausted polling"),
    }
    // start, challenge, continue, submit, five polls
    assert_eq!(transport.requests().len(), 9);
}
