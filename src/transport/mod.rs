//! Resilient outbound transport for the LinkedIn REST API.
//!
//! Requests flow through a stack of [`Sender`] layers, outermost first:
//! retry with exponential backoff, the shared circuit breaker, per-attempt
//! logging, and finally reqwest. [`HttpTransport`] builds the authenticated
//! request, honours caller cancellation and decodes the JSON body.

pub mod circuit;
pub mod client;
pub mod error;
pub mod logging;
pub mod retry;
pub mod sender;

use std::sync::Arc;

pub use circuit::{
    CallPermit, CircuitBreaker, CircuitBreakerConfig, CircuitBreakerSender, CircuitSnapshot,
    CircuitState,
};
pub use client::{build_url, HttpTransport, ReqwestSender};
pub use error::{is_retryable_status, TransportError};
pub use logging::LoggingSender;
pub use retry::{RetryPolicy, RetryingSender};
pub use sender::{ApiRequest, Sender, UpstreamResponse};

/// Compose `retry(circuit_breaker(logging(raw)))` around a raw sender.
pub fn resilient_stack(
    raw: Arc<dyn Sender>,
    breaker: Arc<CircuitBreaker>,
    policy: RetryPolicy,
) -> Arc<dyn Sender> {
    let logged: Arc<dyn Sender> = Arc::new(LoggingSender::new(raw));
    let guarded: Arc<dyn Sender> = Arc::new(CircuitBreakerSender::new(breaker, logged));
    Arc::new(RetryingSender::new(policy, guarded))
}
