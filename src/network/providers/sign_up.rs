//! Sign-Up Request Provider

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::error::NativeAuthError;
use crate::network::providers::{invalid_request, GrantType};
use crate::network::ApiRequest;
use crate::types::config::endpoints;
use crate::types::{NativeAuthConfig, RequestContext, UserAttributes};

#[derive(Serialize)]
struct StartBody<'a> {
    client_id: &'a str,
    username: &'a str,
    challenge_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attributes: Option<&'a UserAttributes>,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    oob: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attributes: Option<&'a UserAttributes>,
}

/// Builds requests for `/signup/v1.0/*`.
pub struct SignUpRequestProvider {
    config: Arc<NativeAuthConfig>,
}

impl SignUpRequestProvider {
    pub fn new(config: Arc<NativeAuthConfig>) -> Self {
        Self { config }
    }

    pub fn start(
        &self,
        username: &str,
        password: Option<&SecretString>,
        attributes: Option<&UserAttributes>,
        context: &RequestContext,
    ) -> Result<ApiRequest, NativeAuthError> {
        let challenge_type = self.config.challenge_types_value();
        let body = StartBody {
            client_id: &self.config.client_id,
            username,
            challenge_type: &challenge_type,
            password: password.map(ExposeSecret::expose_secret).map(String::as_str),
            attributes,
        };
        self.json_request(endpoints::SIGNUP_START, &body, context)
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
        self.json_request(endpoints::SIGNUP_CHALLENGE, &body, context)
    }

    pub fn continue_with(
        &self,
        continuation_token: &str,
        grant_type: GrantType,
        password: Option<&SecretString>,
        oob: Option<&str>,
        attributes: Option<&UserAttributes>,
        context: &RequestContext,
    ) -> Result<ApiRequest, NativeAuthError> {
        let body = ContinueBody {
            client_id: &self.config.client_id,
            continuation_token,
            grant_type: grant_type.as_str(),
            password: password.map(ExposeSecret::expose_secret).map(String::as_str),
            oob,
            attributes,
        };
        self.json_request(endpoints::SIGNUP_CONTINUE, &body, context)
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

    fn provider() -> SignUpRequestProvider {
        let config = NativeAuthConfig::new("client-1", "https://contoso.ciamlogin.com/contoso")
            .unwrap();
        SignUpRequestProvider::new(Arc::new(config))
    }

    #[test]
    fn test_start_request() {
        let context = RequestContext::default();
        let request = provider()
            .start("user@contoso.com", None, None, &context)
            .unwrap();

        assert_eq!(
            request.url,
            "https://contoso.ciamlogin.com/contoso/signup/v1.0/start"
        );
        assert_eq!(request.content_type, "application/json");

        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["client_id"], "client-1");
        assert_eq!(body["username"], "user@contoso.com");
        assert_eq!(body["challenge_type"], "oob password redirect");
        assert!(body.get("password").is_none());
        assert!(body.get("attributes").is_none());
    }

    #[test]
    fn test_start_request_with_password_and_attributes() {
        let context = RequestContext::default();
        let password = SecretString::new("hunter2".to_string());
        let mut attributes = UserAttributes::new();
        attributes.insert("last_name".to_string(), serde_json::json!("Smith"));

        let request = provider()
            .start("user@contoso.com", Some(&password), Some(&attributes), &context)
            .unwrap();

        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["password"], "hunter2");
        assert_eq!(body["attributes"]["last_name"], "Smith");
    }

    #[test]
    fn test_continue_oob_request() {
        let context = RequestContext::default();
        let request = provider()
            .continue_with("ct-1", GrantType::OobCode, None, Some("123456"), None, &context)
            .unwrap();

        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["grant_type"], "oob");
        assert_eq!(body["oob"], "123456");
        assert_eq!(body["continuation_token"], "ct-1");
    }
}
