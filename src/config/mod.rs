use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::transport::{CircuitBreakerConfig, RetryPolicy};

pub const DEFAULT_API_BASE_URL: &str = "https://api.linkedin.com/v2";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_server: ServerConfig,
    pub linkedin: LinkedInConfig,
    pub resilience: ResilienceConfig,
    pub frontend: FrontendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// The hot-reloadable part of the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedInConfig {
    pub api_base_url: String,
    /// Numeric organization id or a full `urn:li:organization:<id>`.
    pub organization_id: String,
    #[serde(default, skip_serializing)]
    pub access_token: String,
    /// Serve fixed fixtures instead of calling LinkedIn.
    pub mock: bool,
}

impl Default for LinkedInConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            organization_id: String::new(),
            access_token: String::new(),
            mock: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResilienceConfig {
    pub request_timeout_secs: u64,
    pub retry_max_attempts: u32,
    pub retry_base_delay_ms: u64,
    pub circuit_failure_threshold: u32,
    pub circuit_cool_down_secs: u64,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            retry_max_attempts: 5,
            retry_base_delay_ms: 1000,
            circuit_failure_threshold: 5,
            circuit_cool_down_secs: 60,
        }
    }
}

impl ResilienceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_max_attempts.max(1),
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
        }
    }

    pub fn circuit_breaker(&self) -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            failure_threshold: self.circuit_failure_threshold.max(1),
            cool_down: Duration::from_secs(self.circuit_cool_down_secs),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Directory with the built dashboard. Not served when unset.
    pub static_dir: Option<String>,
    /// Origins allowed to call the API from a browser
    pub allowed_origins: Vec<String>,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            static_dir: None,
            allowed_origins: vec!["http://localhost:4200".to_string()],
        }
    }
}

pub(crate) fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        _ => Ok(default),
    }
}

impl LinkedInConfig {
    pub fn from_env() -> Self {
        let api_base_url = std::env::var("LINKEDIN_API_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let mock = std::env::var("LINKEDIN_MOCK")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        Self {
            api_base_url,
            organization_id: std::env::var("LINKEDIN_ORGANIZATION_ID").unwrap_or_default(),
            access_token: std::env::var("LINKEDIN_ACCESS_TOKEN").unwrap_or_default(),
            mock,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_host = std::env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let api_port = env_or("API_PORT", 8080u16)?;

        let defaults = ResilienceConfig::default();
        let resilience = ResilienceConfig {
            request_timeout_secs: env_or(
                "LINKEDIN_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
            retry_max_attempts: env_or("LINKEDIN_RETRY_MAX_ATTEMPTS", defaults.retry_max_attempts)?,
            retry_base_delay_ms: env_or(
                "LINKEDIN_RETRY_BASE_DELAY_MS",
                defaults.retry_base_delay_ms,
            )?,
            circuit_failure_threshold: env_or(
                "LINKEDIN_CIRCUIT_FAILURE_THRESHOLD",
                defaults.circuit_failure_threshold,
            )?,
            circuit_cool_down_secs: env_or(
                "LINKEDIN_CIRCUIT_COOLDOWN_SECS",
                defaults.circuit_cool_down_secs,
            )?,
        };

        let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            Err(_) => FrontendConfig::default().allowed_origins,
        };

        Ok(Config {
            api_server: ServerConfig {
                host: api_host,
                port: api_port,
            },
            linkedin: LinkedInConfig::from_env(),
            resilience,
            frontend: FrontendConfig {
                static_dir: std::env::var("FRONTEND_STATIC_DIR").ok(),
                allowed_origins,
            },
        })
    }
}

/// Shared, swappable LinkedIn settings. Readers take a snapshot per call so a
/// reload flips mock mode, the base URL or credentials without a restart.
#[derive(Debug, Clone, Default)]
pub struct LinkedInSettings {
    inner: Arc<RwLock<LinkedInConfig>>,
}

impl LinkedInSettings {
    pub fn new(config: LinkedInConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    pub async fn current(&self) -> LinkedInConfig {
        self.inner.read().await.clone()
    }

    pub async fn replace(&self, config: LinkedInConfig) {
        *self.inner.write().await = config;
    }

    /// Re-read the LinkedIn section from the process environment and `.env`.
    pub async fn reload_from_env(&self) {
        dotenvy::dotenv_override().ok();
        let fresh = LinkedInConfig::from_env();
        tracing::info!(
            mock = fresh.mock,
            organization_id = %fresh.organization_id,
            "reloaded LinkedIn settings"
        );
        self.replace(fresh).await;
    }
}
