use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::FrontendConfig;

use super::analytics::{get_engagement, get_followers, get_page_views};
use super::handlers::{health_check, AppState};

pub fn create_api_router(state: Arc<AppState>, frontend: &FrontendConfig) -> Router {
    let analytics_routes = Router::new()
        .route("/page-views", get(get_page_views))
        .route("/followers", get(get_followers))
        .route("/engagement", get(get_engagement));

    let router = Router::new()
        .route("/health", get(health_check))
        .nest("/api/linkedin-analytics", analytics_routes)
        .with_state(state)
        .layer(cors_layer(&frontend.allowed_origins))
        .layer(TraceLayer::new_for_http());

    match &frontend.static_dir {
        Some(dir) => {
            let index = std::path::Path::new(dir).join("index.html");
            router.fallback_service(ServeDir::new(dir).not_found_service(ServeFile::new(index)))
        }
        None => router,
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{origin}'");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(origins)
}
