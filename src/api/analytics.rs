//! LinkedIn analytics API handlers
//!
//! Each handler owns a cancellation token that fires when axum drops the
//! handler future, which happens when the dashboard disconnects mid-request.

use axum::{extract::State, Json};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::handlers::{upstream_failure, ApiError, AppState};
use crate::linkedin::{EngagementResponse, FollowersResponse, PageViewsResponse};

/// Organization page views
pub async fn get_page_views(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PageViewsResponse>, ApiError> {
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    state
        .analytics
        .page_views(&cancel)
        .await
        .map(Json)
        .map_err(|e| upstream_failure("page views", e))
}

/// Organization follower statistics
pub async fn get_followers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FollowersResponse>, ApiError> {
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    state
        .analytics
        .followers(&cancel)
        .await
        .map(Json)
        .map_err(|e| upstream_failure("followers", e))
}

/// Organization share and engagement statistics
pub async fn get_engagement(
    State(state): State<Arc<AppState>>,
) -> Result<Json<EngagementResponse>, ApiError> {
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    state
        .analytics
        .engagement(&cancel)
        .await
        .map(Json)
        .map_err(|e| upstream_failure("engagement", e))
}
