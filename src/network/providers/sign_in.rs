//! Sign-In Request Provider
//!
//! The oauth2 endpoints (`initiate`, `challenge`, `token`) take
//! form-urlencoded bodies, unlike the JSON signup/resetpassword families.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use url::form_urlencoded;

use crate::error::NativeAuthError;
use crate::network::providers::GrantType;
use crate::network::ApiRequest;
use crate::types::config::endpoints;
use crate::types::parameters::normalized_scopes;
use crate::types::{NativeAuthConfig, RequestContext};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Inputs for a `/oauth2/v2.0/token` request. One of the credential fields
/// is set depending on the grant type.
#[derive(Default)]
pub struct TokenRequestInput<'a> {
    pub continuation_token: &'a str,
    pub grant_type: Option<GrantType>,
    pub username: Option<&'a str>,
    pub password: Option<&'a SecretString>,
    pub oob: Option<&'a str>,
    pub scopes: &'a [String],
}

/// Builds requests for `/oauth2/v2.0/*`.
pub struct SignInRequestProvider {
    config: Arc<NativeAuthConfig>,
}

impl SignInRequestProvider {
    pub fn new(config: Arc<NativeAuthConfig>) -> Self {
        Self { config }
    }

    pub fn initiate(
        &self,
        username: &str,
        context: &RequestContext,
    ) -> Result<ApiRequest, NativeAuthError> {
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.config.client_id)
            .append_pair("username", username)
            .append_pair("challenge_type", &self.config.challenge_types_value())
            .finish();
        self.form_request(endpoints::SIGNIN_INITIATE, body, context)
    }

    pub fn challenge(
        &self,
        continuation_token: &str,
        context: &RequestContext,
    ) -> Result<ApiRequest, NativeAuthError> {
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.config.client_id)
            .append_pair("continuation_token", continuation_token)
            .append_pair("challenge_type", &self.config.challenge_types_value())
            .finish();
        self.form_request(endpoints::SIGNIN_CHALLENGE, body, context)
    }

    pub fn token(
        &self,
        input: TokenRequestInput<'_>,
        context: &RequestContext,
    ) -> Result<ApiRequest, NativeAuthError> {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer
            .append_pair("client_id", &self.config.client_id)
            .append_pair("continuation_token", input.continuation_token);
        if let Some(grant_type) = input.grant_type {
            serializer.append_pair("grant_type", grant_type.as_str());
        }
        if let Some(username) = input.username {
            serializer.append_pair("username", username);
        }
        if let Some(password) = input.password {
            serializer.append_pair("password", password.expose_secret());
        }
        if let Some(oob) = input.oob {
            serializer.append_pair("oob", oob);
        }
        let scopes = normalized_scopes(input.scopes);
        serializer.append_pair("scope", &scopes.join(" "));
        let body = serializer.finish();
        self.form_request(endpoints::SIGNIN_TOKEN, body, context)
    }

    fn form_request(
        &self,
        path: &str,
        body: String,
        context: &RequestContext,
    ) -> Result<ApiRequest, NativeAuthError> {
        let url = self.config.endpoint(path)?;
        Ok(ApiRequest {
            url: url.to_string(),
            content_type: FORM_CONTENT_TYPE,
            body,
            correlation_id: context.correlation_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> SignInRequestProvider {
        let config = NativeAuthConfig::new("client-1", "https://contoso.ciamlogin.com/contoso")
            .unwrap();
        SignInRequestProvider::new(Arc::new(config))
    }

    #[test]
    fn test_initiate_request() {
        let request = provider()
            .initiate("user@contoso.com", &RequestContext::default())
            .unwrap();

        assert_eq!(
            request.url,
            "https://contoso.ciamlogin.com/contoso/oauth2/v2.0/initiate"
        );
        assert_eq!(request.content_type, FORM_CONTENT_TYPE);
        assert!(request.body.contains("client_id=client-1"));
        assert!(request.body.contains("username=user%40contoso.com"));
        assert!(request.body.contains("challenge_type=oob+password+redirect"));
    }

    #[test]
    fn test_token_password_grant() {
        let password = SecretString::new("hunter2".to_string());
        let scopes = vec!["openid".to_string(), "profile".to_string()];
        let request = provider()
            .token(
                TokenRequestInput {
                    continuation_token: "ct-1",
                    grant_type: Some(GrantType::Password),
                    password: Some(&password),
                    scopes: &scopes,
                    ..Default::default()
                },
                &RequestContext::default(),
            )
            .unwrap();

        assert!(request.body.contains("grant_type=password"));
        assert!(request.body.contains("password=hunter2"));
        assert!(request.body.contains("scope=openid+profile+offline_access"));
        assert!(request.body.contains("continuation_token=ct-1"));
        assert!(!request.body.contains("oob="));
    }

    #[test]
    fn test_token_oob_grant() {
        let request = provider()
            .token(
                TokenRequestInput {
                    continuation_token: "ct-2",
                    grant_type: Some(GrantType::OobCode),
                    oob: Some("123456"),
                    ..Default::default()
                },
                &RequestContext::default(),
            )
            .unwrap();

        assert!(request.body.contains("grant_type=oob"));
        assert!(request.body.contains("oob=123456"));
        // OIDC defaults are always requested.
        assert!(request.body.contains("scope=openid+profile+offline_access"));
    }
}
