//! Response shapes for the LinkedIn organization analytics endpoints.
//!
//! Upstream omits fields that have no data instead of sending zero, so every
//! value is optional. Field names follow LinkedIn's camelCase JSON.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Epoch-millisecond window a statistic covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl TimeRange {
    /// The 24 hours ending at `now`.
    pub fn trailing_day(now: DateTime<Utc>) -> Self {
        Self {
            start: Some((now - Duration::days(1)).timestamp_millis()),
            end: Some(now.timestamp_millis()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageViewStats {
    pub page_views: Option<i64>,
    pub unique_page_views: Option<i64>,
    pub time_range: Option<TimeRange>,
    pub organizational_entity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowerStats {
    pub follower_gains: Option<i64>,
    pub follower_losses: Option<i64>,
    pub follower_counts: Option<i64>,
    pub time_range: Option<TimeRange>,
    pub organizational_entity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareStatistics {
    pub share_count: Option<i64>,
    pub impression_count: Option<i64>,
    pub click_count: Option<i64>,
    /// Engagement ratio, e.g. `0.08` for 8%
    pub engagement: Option<f64>,
    pub like_count: Option<i64>,
    pub comment_count: Option<i64>,
    pub share_mentions_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementRecord {
    pub total_share_statistics: Option<ShareStatistics>,
    pub time_range: Option<TimeRange>,
    pub organizational_entity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageViewsResponse {
    #[serde(default)]
    pub elements: Vec<PageViewStats>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FollowersResponse {
    #[serde(default)]
    pub elements: Vec<FollowerStats>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngagementResponse {
    #[serde(default)]
    pub elements: Vec<EngagementRecord>,
}
