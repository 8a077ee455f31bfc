use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::error::TransportError;
use super::sender::{ApiRequest, Sender, UpstreamResponse};

/// Innermost layer: puts the request on the wire with a shared reqwest client.
pub struct ReqwestSender {
    client: Client,
}

impl ReqwestSender {
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("toolidol/", env!("CARGO_PKG_VERSION")))
            .timeout(request_timeout)
            .build()
            .context("failed to build HTTP client for the LinkedIn API")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Sender for ReqwestSender {
    async fn send(&self, request: &ApiRequest) -> Result<UpstreamResponse, TransportError> {
        let response = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone())
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        Ok(UpstreamResponse::new(status, body.to_vec()))
    }
}

/// Join `path` onto `base` with exactly one `/` between them and append `query`
/// form-encoded, in order. Path segments already present in `base` are kept.
pub fn build_url(base: &str, path: &str, query: &[(&str, &str)]) -> Result<Url, TransportError> {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let mut url = Url::parse(&joined)
        .map_err(|e| TransportError::InvalidRequest(format!("invalid url '{joined}': {e}")))?;

    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query.iter().copied());
    }

    Ok(url)
}

/// Authenticated JSON GETs through a sender pipeline. The base URL is passed per
/// call so a settings reload takes effect on the next request.
#[derive(Clone)]
pub struct HttpTransport {
    sender: Arc<dyn Sender>,
}

impl HttpTransport {
    pub fn new(sender: Arc<dyn Sender>) -> Self {
        Self { sender }
    }

    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        base_url: &str,
        path: &str,
        access_token: &str,
        query: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> Result<T, TransportError> {
        let url = build_url(base_url, path, query)?;
        let request = ApiRequest::get(url).with_bearer(access_token)?;

        // Dropping the pipeline future aborts the in-flight attempt or backoff sleep.
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(url = %request.url, "upstream request cancelled by caller");
                return Err(TransportError::Cancelled);
            }
            outcome = self.sender.send(&request) => outcome?,
        };

        if !response.status.is_success() {
            return Err(TransportError::Http {
                status: response.status,
            });
        }

        serde_json::from_slice(&response.body).map_err(TransportError::Decode)
    }
}
