//! HTTP Transport
//!
//! HTTP client interface and implementations for native auth requests.
//! Every native auth endpoint is POST, so the surface is a single `post`.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::error::{NativeAuthError, NetworkError};

/// Outbound HTTP request definition.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// Request URL.
    pub url: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: String,
}

/// HTTP response definition.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, lowercase keys.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    /// Get a header value by (case-insensitive) name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }
}

/// HTTP transport interface (for dependency injection).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an HTTP POST request.
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, NativeAuthError>;
}

/// Default reqwest-based HTTP transport.
pub struct ReqwestHttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestHttpTransport {
    /// Create new transport with a 30s timeout.
    pub fn new() -> Result<Self, NativeAuthError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create transport with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, NativeAuthError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            // Redirect challenge types are conveyed in bodies, never follow 3xx.
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| {
                NativeAuthError::Network(NetworkError::ConnectionFailed {
                    message: e.to_string(),
                })
            })?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl HttpTransport for ReqwestHttpTransport {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, NativeAuthError> {
        let mut builder = self.client.post(&request.url).body(request.body);
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                NativeAuthError::Network(NetworkError::Timeout {
                    timeout: self.timeout,
                })
            } else {
                NativeAuthError::Network(NetworkError::ConnectionFailed {
                    message: e.to_string(),
                })
            }
        })?;

        let status = response.status().as_u16();

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.to_string().to_lowercase(), v.to_string());
            }
        }

        let body = response.text().await.map_err(|e| {
            NativeAuthError::Network(NetworkError::ConnectionFailed {
                message: e.to_string(),
            })
        })?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Mock HTTP transport for testing. Responses are served in FIFO order.
#[derive(Default)]
pub struct MockHttpTransport {
    responses: std::sync::Mutex<VecDeque<HttpResponse>>,
    request_history: std::sync::Mutex<Vec<HttpRequest>>,
}

impl MockHttpTransport {
    /// Create new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response to return.
    pub fn queue_response(&self, response: HttpResponse) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Queue a JSON response.
    pub fn queue_json(&self, status: u16, body: serde_json::Value) -> &Self {
        self.queue_response(HttpResponse {
            status,
            headers: [("content-type".to_string(), "application/json".to_string())]
                .into_iter()
                .collect(),
            body: body.to_string(),
        })
    }

    /// Get request history.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.request_history.lock().unwrap().clone()
    }

    /// Get last request.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.request_history.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, NativeAuthError> {
        self.request_history.lock().unwrap().push(request);

        self.responses.lock().unwrap().pop_front().ok_or_else(|| {
            NativeAuthError::Network(NetworkError::ConnectionFailed {
                message: "No mock response available".to_string(),
            })
        })
    }
}
