//! Shared test doubles for the outbound pipeline.

#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;
use toolidol::transport::{ApiRequest, Sender, TransportError, UpstreamResponse};

pub type Outcome = Result<UpstreamResponse, TransportError>;

/// Plays back a scripted list of outcomes and records every attempt.
/// Once the script runs out every attempt gets `fallback`.
pub struct ScriptedSender {
    script: Mutex<VecDeque<Outcome>>,
    fallback_body: String,
    attempts: Mutex<Vec<(Instant, ApiRequest)>>,
}

impl ScriptedSender {
    pub fn new(script: Vec<Outcome>) -> Arc<Self> {
        Self::with_fallback(script, r#"{"elements":[]}"#)
    }

    pub fn with_fallback(script: Vec<Outcome>, fallback_body: &str) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback_body: fallback_body.to_string(),
            attempts: Mutex::new(Vec::new()),
        })
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }

    pub fn attempt_times(&self) -> Vec<Instant> {
        self.attempts.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, r)| r.clone())
            .collect()
    }
}

#[async_trait]
impl Sender for ScriptedSender {
    async fn send(&self, request: &ApiRequest) -> Outcome {
        self.attempts
            .lock()
            .unwrap()
            .push((Instant::now(), request.clone()));

        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(ok_json(&self.fallback_body)))
    }
}

/// Never answers; used to exercise cancellation.
pub struct HangingSender;

#[async_trait]
impl Sender for HangingSender {
    async fn send(&self, _request: &ApiRequest) -> Outcome {
        std::future::pending().await
    }
}

pub fn status(code: u16) -> Outcome {
    Ok(UpstreamResponse::new(
        StatusCode::from_u16(code).unwrap(),
        Vec::new(),
    ))
}

pub fn ok_json(body: &str) -> UpstreamResponse {
    UpstreamResponse::new(StatusCode::OK, body.as_bytes().to_vec())
}

pub fn network_error() -> Outcome {
    Err(TransportError::Network("connection reset by peer".to_string()))
}
