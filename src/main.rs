use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use toolidol::api::{self, AppState};
use toolidol::config::{Config, LinkedInSettings};
use toolidol::linkedin::{ConfiguredIdentity, LinkedInAnalyticsService};
use toolidol::transport::{self, CircuitBreaker, HttpTransport, ReqwestSender};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    let settings = LinkedInSettings::new(config.linkedin.clone());
    if config.linkedin.mock {
        info!("🧪 LinkedIn mock mode enabled - serving fixture data");
    } else {
        info!(
            "🔗 LinkedIn live mode (base: {}, organization: {})",
            config.linkedin.api_base_url, config.linkedin.organization_id
        );
        if config.linkedin.access_token.is_empty() {
            warn!("LINKEDIN_ACCESS_TOKEN is empty - live calls will be rejected upstream");
        }
    }

    // Outbound pipeline: retry -> circuit breaker -> logging -> reqwest
    let breaker = Arc::new(CircuitBreaker::new(config.resilience.circuit_breaker()));
    let raw = Arc::new(ReqwestSender::new(config.resilience.request_timeout())?);
    let sender = transport::resilient_stack(
        raw,
        Arc::clone(&breaker),
        config.resilience.retry_policy(),
    );
    let http = HttpTransport::new(sender);

    let identity = Arc::new(ConfiguredIdentity::new(settings.clone()));
    let analytics = Arc::new(LinkedInAnalyticsService::new(
        http,
        identity,
        settings.clone(),
    ));

    #[cfg(unix)]
    spawn_reload_on_sighup(settings.clone())?;

    let state = Arc::new(AppState { analytics, breaker });
    let app = api::create_api_router(state, &config.frontend);

    if let Some(ref static_dir) = config.frontend.static_dir {
        info!("🎨 Serving dashboard from directory: {}", static_dir);
    }

    let api_addr = format!("{}:{}", config.api_server.host, config.api_server.port);
    let listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind {api_addr}"))?;
    info!("🚀 API server listening on http://{}", api_addr);
    info!(
        "   - Analytics endpoints at http://{}/api/linkedin-analytics/...",
        api_addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Re-read the LinkedIn settings (mock flag, base URL, organization, token) on SIGHUP.
#[cfg(unix)]
fn spawn_reload_on_sighup(settings: LinkedInSettings) -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangups = signal(SignalKind::hangup()).context("failed to install SIGHUP handler")?;
    tokio::spawn(async move {
        while hangups.recv().await.is_some() {
            settings.reload_from_env().await;
        }
    });
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
