//! Reset-Password Request Provider

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::error::NativeAuthError;
use crate::network::providers::{invalid_request, GrantType};
use crate::network::ApiRequest;
use crate::types::config::endpoints;
use crate::types::{NativeAuthConfig, RequestContext};

#[derive(Serialize)]
struct StartBody<'a> {
    client_id: &'a str,
    username: &'a str,
    challenge_type: &'a str,
}

#[derive(Serialize)]
struct ChallengeBody<'a> {
    client_id: &'a str,
    continuation_token: &'a str,
    challenge_type: &'a str,
}

#[derive(Serialize)]
struct ContinueBody<'a> {
    client_id: &'a str,
    continuation_token: &'a str,
    grant_type: &'a str,
    oob: &'a str,
}

#[derive(Serialize)]
struct SubmitBody<'a> {
    client_id: &'a str,
    continuation_token: &'a str,
    new_password: &'a str,
}

#[derive(Serialize)]
struct PollCompletionBody<'a> {
    client_id: &'a str,
    continuation_token: &'a str,
}

/// Builds requests for `/resetpassword/v1.0/*`.
pub struct ResetPasswordRequestProvider {
    config: Arc<NativeAuthConfig>,
}

impl ResetPasswordRequestProvider {
    pub fn new(config: Arc<NativeAuthConfig>) -> Self {
        Self { config }
    }

    pub fn start(
        &self,
        username: &str,
        context: &RequestContext,
    ) -> Result<ApiRequest, NativeAuthError> {
        let challenge_type = self.config.challenge_types_value();
        let body = StartBody {
            client_id: &self.config.client_id,
            username,
            challenge_type: &challenge_type,
        };
        self.json_request(endpoints::RESET_PASSWORD_START, &body, context)
    }

    pub fn challenge(
        &self,
        continuation_token: &str,
        context: &RequestContext,
    ) -> Result<ApiRequest, NativeAuthError> {
        let challenge_type = self.config.challenge_types_value();
        let body = ChallengeBody {
            client_id: &self.config.client_id,
            continuation_token,
            challenge_type: &challenge_type,
        };
        self.json_request(endpoints::RESET_PASSWORD_CHALLENGE, &body, context)
    }

    pub fn continue_with_code(
        &self,
        continuation_token: &str,
        oob: &str,
        context: &RequestContext,
    ) -> Result<ApiRequest, NativeAuthError> {
        let body = ContinueBody {
            client_id: &self.config.client_id,
            continuation_token,
            grant_type: GrantType::OobCode.as_str(),
            oob,
        };
        self.json_request(endpoints::RESET_PASSWORD_CONTINUE, &body, context)
    }

    pub fn submit(
        &self,
        continuation_token: &str,
        new_password: &SecretString,
        context: &RequestContext,
    ) -> Result<ApiRequest, NativeAuthError> {
        let body = SubmitBody {
            client_id: &self.config.client_id,
            continuation_token,
            new_password: new_password.expose_secret(),
        };
        self.json_request(endpoints::RESET_PASSWORD_SUBMIT, &body, context)
    }

    pub fn poll_completion(
        &self,
        continuation_token: &str,
        context: &RequestContext,
    ) -> Result<ApiRequest, NativeAuthError> {
        let body = PollCompletionBody {
            client_id: &self.config.client_id,
            continuation_token,
        };
        self.json_request(endpoints::RESET_PASSWORD_POLL_COMPLETION, &body, context)
    }

    fn json_request<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        context: &RequestContext,
    ) -> Result<ApiRequest, NativeAuthError> {
        let url = self.config.endpoint(path)?;
        let body = serde_json::to_string(body)
            .map_err(|e| invalid_request(format!("failed to serialize request body: {e}")))?;
        Ok(ApiRequest {
            url: url.to_string(),
            content_type: "application/json",
            body,
            correlation_id: context.correlation_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> ResetPasswordRequestProvider {
        let config = NativeAuthConfig::new("client-1", "https://contoso.ciamlogin.com/contoso")
            .unwrap();
        ResetPasswordRequestProvider::new(Arc::new(config))
    }

    #[test]
    fn test_start_request() {
        let request = provider()
            .start("user@contoso.com", &RequestContext::default())
            .unwrap();

        assert_eq!(
            request.url,
            "https://contoso.ciamlogin.com/contoso/resetpassword/v1.0/start"
        );
        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["username"], "user@contoso.com");
        assert_eq!(body["challenge_type"], "oob password redirect");
    }

    #[test]
    fn test_continue_with_code() {
        let request = provider()
            .continue_with_code("ct-1", "123456", &RequestContext::default())
            .unwrap();

        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["grant_type"], "oob");
        assert_eq!(body["oob"], "123456");
    }

    #[test]
    fn test_submit_new_password() {
        let password = SecretString::new("N3w-password".to_string());
        let request = provider()
            .submit("ct-2", &password, &RequestContext::default())
            .unwrap();

        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["new_password"], "N3w-password");
    }
}
