//! Flow Parameters
//!
//! Immutable input bundles for the public operations, plus the per-call
//! request context threading the correlation id through a flow.

use std::collections::BTreeMap;

use secrecy::SecretString;
use uuid::Uuid;

/// JSON-compatible user attribute map (e.g. `{"last_name": "Smith"}`).
pub type UserAttributes = BTreeMap<String, serde_json::Value>;

/// Per-call request context. Carries the correlation id attached to every
/// request of one flow step and echoed into public errors.
#[derive(Clone, Copy, Debug)]
pub struct RequestContext {
    /// Correlation id for support diagnostics.
    pub correlation_id: Uuid,
}

impl RequestContext {
    /// Create a context, generating a correlation id when none is supplied.
    pub fn new(correlation_id: Option<Uuid>) -> Self {
        Self {
            correlation_id: correlation_id.unwrap_or_else(Uuid::new_v4),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Parameters for starting a sign-up flow.
#[derive(Clone)]
pub struct SignUpParameters {
    /// Username (email).
    pub username: String,
    /// Password, present for the password variant of sign-up.
    pub password: Option<SecretString>,
    /// Initial user attributes.
    pub attributes: Option<UserAttributes>,
    /// Correlation id override.
    pub correlation_id: Option<Uuid>,
}

impl std::fmt::Debug for SignUpParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpParameters")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("attributes", &self.attributes)
            .field("correlation_id", &self.correlation_id)
            .finish()
    }
}

impl SignUpParameters {
    /// Code-first sign-up for the given username.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: None,
            attributes: None,
            correlation_id: None,
        }
    }

    /// Attach a password (password variant of sign-up).
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::new(password.into()));
        self
    }

    /// Attach initial attributes.
    pub fn with_attributes(mut self, attributes: UserAttributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Set the correlation id.
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

/// Parameters for starting a sign-in flow.
#[derive(Clone)]
pub struct SignInParameters {
    /// Username (email).
    pub username: String,
    /// Password, present for the password variant of sign-in.
    pub password: Option<SecretString>,
    /// Scopes to request on the token.
    pub scopes: Vec<String>,
    /// Correlation id override.
    pub correlation_id: Option<Uuid>,
}

impl std::fmt::Debug for SignInParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInParameters")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("scopes", &self.scopes)
            .field("correlation_id", &self.correlation_id)
            .finish()
    }
}

impl SignInParameters {
    /// Code-first sign-in for the given username.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: None,
            scopes: Vec::new(),
            correlation_id: None,
        }
    }

    /// Attach a password (password variant of sign-in).
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::new(password.into()));
        self
    }

    /// Set the requested scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Set the correlation id.
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

/// Parameters for starting a password-reset flow.
#[derive(Clone, Debug)]
pub struct ResetPasswordParameters {
    /// Username (email).
    pub username: String,
    /// Correlation id override.
    pub correlation_id: Option<Uuid>,
}

impl ResetPasswordParameters {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            correlation_id: None,
        }
    }

    /// Set the correlation id.
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

/// Join requested scopes with the standard OIDC defaults, preserving order
/// and dropping duplicates.
pub(crate) fn normalized_scopes(requested: &[String]) -> Vec<String> {
    let mut scopes: Vec<String> = Vec::new();
    for scope in requested.iter().map(String::as_str).chain(["openid", "profile", "offline_access"]) {
        if !scope.is_empty() && !scopes.iter().any(|s| s == scope) {
            scopes.push(scope.to_string());
        }
    }
    scopes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_generates_correlation_id() {
        let a = RequestContext::new(None);
        let b = RequestContext::new(None);
        assert_ne!(a.correlation_id, b.correlation_id);

        let fixed = Uuid::new_v4();
        let c = RequestContext::new(Some(fixed));
        assert_eq!(c.correlation_id, fixed);
    }

    #[test]
    fn test_sign_up_parameters_redact_password() {
        let params = SignUpParameters::new("user@contoso.com").with_password("hunter2");
        let debug = format!("{params:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_normalized_scopes() {
        let scopes = normalized_scopes(&["api://app/read".to_string(), "openid".to_string()]);
        assert_eq!(
            scopes,
            vec!["api://app/read", "openid", "profile", "offline_access"]
        );
    }

    #[test]
    fn test_normalized_scopes_empty() {
        let scopes = normalized_scopes(&[]);
        assert_eq!(scopes, vec!["openid", "profile", "offline_access"]);
    }
}
