use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use tokio::time::Instant;
use tracing::{error, info};

use super::error::TransportError;
use super::sender::{ApiRequest, Sender, UpstreamResponse};

/// Logs method and URL before each attempt and the outcome with elapsed time after it.
pub struct LoggingSender {
    inner: Arc<dyn Sender>,
}

impl LoggingSender {
    pub fn new(inner: Arc<dyn Sender>) -> Self {
        Self { inner }
    }
}

/// Closes the log pair for an attempt whose future is dropped mid-flight.
struct InFlight<'a> {
    url: &'a Url,
    started: Instant,
    finished: bool,
}

impl InFlight<'_> {
    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            info!(
                url = %self.url,
                elapsed_ms = self.elapsed_ms(),
                "HTTP request cancelled"
            );
        }
    }
}

#[async_trait]
impl Sender for LoggingSender {
    async fn send(&self, request: &ApiRequest) -> Result<UpstreamResponse, TransportError> {
        let mut in_flight = InFlight {
            url: &request.url,
            started: Instant::now(),
            finished: false,
        };
        info!(method = %request.method, url = %request.url, "HTTP request");

        let outcome = self.inner.send(request).await;
        in_flight.finished = true;
        let elapsed_ms = in_flight.elapsed_ms();

        match &outcome {
            Ok(response) => info!(
                status = response.status.as_u16(),
                url = %request.url,
                elapsed_ms,
                "HTTP response"
            ),
            Err(err) => error!(
                url = %request.url,
                elapsed_ms,
                error = %err,
                "HTTP request failed"
            ),
        }

        outcome
    }
}
