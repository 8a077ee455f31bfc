use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode, Url};

use super::error::TransportError;

/// A fully built outbound request. Cheap to clone so every attempt can resend it.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
}

impl ApiRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            headers: HeaderMap::new(),
        }
    }

    /// Attach `Authorization: Bearer <token>`. The header is flagged sensitive.
    pub fn with_bearer(mut self, access_token: &str) -> Result<Self, TransportError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {access_token}"))
            .map_err(|e| TransportError::InvalidRequest(format!("bad access token: {e}")))?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(self)
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
    }
}

/// Status and raw body of an upstream response, whatever the status was.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// One layer of the outbound pipeline.
///
/// Implementations return `Ok` for every HTTP response regardless of status and
/// reserve `Err` for failures to get a response at all. Decorators wrap an
/// `Arc<dyn Sender>` and add behaviour around `send`.
#[async_trait]
pub trait Sender: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<UpstreamResponse, TransportError>;
}
