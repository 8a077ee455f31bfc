//! Process-wide circuit breaker for the LinkedIn API.
//!
//! The breaker counts consecutive retry-eligible failures. Once the threshold is
//! reached it opens and rejects every call without touching the network until the
//! cool-down has elapsed. After that a single trial call is let through: success
//! closes the circuit, failure reopens it for another full cool-down.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{info, warn};

use super::error::{is_retryable_status, TransportError};
use super::sender::{ApiRequest, Sender, UpstreamResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub cool_down: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            cool_down: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitSnapshot {
    pub state: CircuitState,
    pub consecutive_failures: u32,
}

#[derive(Debug)]
struct BreakerInner {
    state: CircuitState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
    trial_in_flight: bool,
    /// Bumped on every open and close; permits from an older generation are stale.
    generation: u64,
}

#[derive(Debug)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(BreakerInner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                opened_at: None,
                trial_in_flight: false,
                generation: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BreakerInner> {
        // State is plain data updated in one step, so a poisoned guard is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    pub fn snapshot(&self) -> CircuitSnapshot {
        let inner = self.lock();
        CircuitSnapshot {
            state: inner.state,
            consecutive_failures: inner.consecutive_failures,
        }
    }

    /// Ask to place a call. Fails with `CircuitOpen` while the breaker is open or
    /// while another half-open trial is still running.
    pub fn try_acquire(&self) -> Result<CallPermit<'_>, TransportError> {
        let mut inner = self.lock();

        match inner.state {
            CircuitState::Closed => Ok(CallPermit::new(self, false, inner.generation)),
            CircuitState::Open => {
                let cooled_down = inner
                    .opened_at
                    .map_or(true, |opened| opened.elapsed() >= self.config.cool_down);
                if !cooled_down {
                    return Err(TransportError::CircuitOpen);
                }
                info!("circuit cool-down elapsed, admitting trial call");
                inner.state = CircuitState::HalfOpen;
                inner.trial_in_flight = true;
                Ok(CallPermit::new(self, true, inner.generation))
            }
            CircuitState::HalfOpen => {
                if inner.trial_in_flight {
                    return Err(TransportError::CircuitOpen);
                }
                inner.trial_in_flight = true;
                Ok(CallPermit::new(self, true, inner.generation))
            }
        }
    }

    fn record_success(&self, trial: bool, generation: u64) {
        let mut inner = self.lock();
        // Late completions from an earlier closed or half-open period do not count.
        if generation != inner.generation {
            return;
        }
        match inner.state {
            CircuitState::Open => {}
            CircuitState::HalfOpen if !trial => {}
            CircuitState::HalfOpen => {
                info!("trial call succeeded, closing circuit");
                Self::close(&mut inner);
            }
            CircuitState::Closed => inner.consecutive_failures = 0,
        }
    }

    fn record_failure(&self, trial: bool, generation: u64) {
        let mut inner = self.lock();
        if generation != inner.generation {
            return;
        }
        match inner.state {
            CircuitState::Open => {}
            CircuitState::HalfOpen if !trial => {}
            CircuitState::HalfOpen => {
                warn!("trial call failed, reopening circuit");
                inner.consecutive_failures += 1;
                self.open(&mut inner);
            }
            CircuitState::Closed => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.config.failure_threshold {
                    warn!(
                        failures = inner.consecutive_failures,
                        cool_down_secs = self.config.cool_down.as_secs(),
                        "failure threshold reached, opening circuit"
                    );
                    self.open(&mut inner);
                }
            }
        }
    }

    fn abandon_trial(&self, generation: u64) {
        let mut inner = self.lock();
        if inner.state == CircuitState::HalfOpen && inner.generation == generation {
            inner.trial_in_flight = false;
        }
    }

    fn open(&self, inner: &mut BreakerInner) {
        inner.state = CircuitState::Open;
        inner.opened_at = Some(Instant::now());
        inner.trial_in_flight = false;
        inner.generation += 1;
    }

    fn close(inner: &mut BreakerInner) {
        inner.state = CircuitState::Closed;
        inner.consecutive_failures = 0;
        inner.opened_at = None;
        inner.trial_in_flight = false;
        inner.generation += 1;
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}

/// Admission to place one call. Settle it with `succeed` or `fail`; a permit that
/// is dropped unsettled (cancelled or non-classifiable call) records nothing.
#[must_use]
pub struct CallPermit<'a> {
    breaker: &'a CircuitBreaker,
    trial: bool,
    generation: u64,
    settled: bool,
}

impl<'a> CallPermit<'a> {
    fn new(breaker: &'a CircuitBreaker, trial: bool, generation: u64) -> Self {
        Self {
            breaker,
            trial,
            generation,
            settled: false,
        }
    }

    pub fn is_trial(&self) -> bool {
        self.trial
    }

    pub fn succeed(mut self) {
        self.settled = true;
        self.breaker.record_success(self.trial, self.generation);
    }

    pub fn fail(mut self) {
        self.settled = true;
        self.breaker.record_failure(self.trial, self.generation);
    }
}

impl Drop for CallPermit<'_> {
    fn drop(&mut self) {
        if !self.settled && self.trial {
            self.breaker.abandon_trial(self.generation);
        }
    }
}

/// Sender layer that consults the breaker before each attempt and reports the outcome.
pub struct CircuitBreakerSender {
    breaker: Arc<CircuitBreaker>,
    inner: Arc<dyn Sender>,
}

impl CircuitBreakerSender {
    pub fn new(breaker: Arc<CircuitBreaker>, inner: Arc<dyn Sender>) -> Self {
        Self { breaker, inner }
    }
}

#[async_trait]
impl Sender for CircuitBreakerSender {
    async fn send(&self, request: &ApiRequest) -> Result<UpstreamResponse, TransportError> {
        let permit = self.breaker.try_acquire()?;
        let outcome = self.inner.send(request).await;

        match &outcome {
            Ok(response) if is_retryable_status(response.status) => permit.fail(),
            Ok(_) => permit.succeed(),
            Err(err) if err.is_transient() => permit.fail(),
            Err(_) => drop(permit),
        }

        outcome
    }
}
