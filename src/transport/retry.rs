use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::error::{is_retryable_status, TransportError};
use super::sender::{ApiRequest, Sender, UpstreamResponse};

/// Deterministic exponential backoff: after failed attempt `k` wait `base_delay * 2^k`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

pub struct RetryingSender {
    policy: RetryPolicy,
    inner: Arc<dyn Sender>,
}

impl RetryingSender {
    pub fn new(policy: RetryPolicy, inner: Arc<dyn Sender>) -> Self {
        Self { policy, inner }
    }
}

#[async_trait]
impl Sender for RetryingSender {
    async fn send(&self, request: &ApiRequest) -> Result<UpstreamResponse, TransportError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let outcome = self.inner.send(request).await;

            let reason = match &outcome {
                Ok(response) if is_retryable_status(response.status) => {
                    Some(format!("HTTP {}", response.status.as_u16()))
                }
                Err(err) if err.is_transient() => Some(err.to_string()),
                _ => None,
            };
            let Some(reason) = reason else {
                return outcome;
            };

            if attempt >= max_attempts {
                warn!(attempts = attempt, %reason, url = %request.url, "giving up on upstream request");
                return Err(TransportError::RetryExhausted {
                    attempts: attempt,
                    last: reason,
                });
            }

            let delay = self.policy.delay_after(attempt);
            warn!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                %reason,
                url = %request.url,
                "retrying upstream request"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
