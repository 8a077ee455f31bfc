use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::identity::OrganizationIdentity;
use super::models::{
    EngagementRecord, EngagementResponse, FollowerStats, FollowersResponse, PageViewStats,
    PageViewsResponse, ShareStatistics, TimeRange,
};
use crate::config::LinkedInSettings;
use crate::transport::{HttpTransport, TransportError};

/// Organization tagged on mock records.
pub const MOCK_ORGANIZATION_URN: &str = "urn:li:organization:123";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsCategory {
    PageViews,
    Followers,
    Engagement,
}

impl AnalyticsCategory {
    pub fn path(self) -> &'static str {
        match self {
            Self::PageViews => "organizationPageStatistics",
            Self::Followers => "organizationFollowerStatistics",
            Self::Engagement => "organizationalEntityShareStatistics",
        }
    }

    /// Finder name, which is also the name of the parameter carrying the URN.
    fn finder(self) -> &'static str {
        match self {
            Self::PageViews => "organization",
            Self::Followers | Self::Engagement => "organizationalEntity",
        }
    }
}

/// One live analytics request, built fresh per call.
#[derive(Debug, Clone)]
pub struct AnalyticsQuery {
    pub category: AnalyticsCategory,
    pub organization_urn: String,
    pub access_token: String,
}

impl AnalyticsQuery {
    pub fn query_pairs(&self) -> [(&str, &str); 2] {
        let finder = self.category.finder();
        [("q", finder), (finder, self.organization_urn.as_str())]
    }
}

#[async_trait]
pub trait AnalyticsService: Send + Sync {
    async fn page_views(
        &self,
        cancel: &CancellationToken,
    ) -> Result<PageViewsResponse, TransportError>;

    async fn followers(
        &self,
        cancel: &CancellationToken,
    ) -> Result<FollowersResponse, TransportError>;

    async fn engagement(
        &self,
        cancel: &CancellationToken,
    ) -> Result<EngagementResponse, TransportError>;
}

/// Serves mock fixtures or live LinkedIn statistics, decided per call by the
/// current `mock` setting.
pub struct LinkedInAnalyticsService {
    transport: HttpTransport,
    identity: Arc<dyn OrganizationIdentity>,
    settings: LinkedInSettings,
}

impl LinkedInAnalyticsService {
    pub fn new(
        transport: HttpTransport,
        identity: Arc<dyn OrganizationIdentity>,
        settings: LinkedInSettings,
    ) -> Self {
        Self {
            transport,
            identity,
            settings,
        }
    }

    async fn is_mock(&self) -> bool {
        self.settings.current().await.mock
    }

    async fn query(&self, category: AnalyticsCategory) -> AnalyticsQuery {
        AnalyticsQuery {
            category,
            organization_urn: self.identity.organization_urn().await,
            access_token: self.identity.access_token().await,
        }
    }

    async fn fetch_live<T: DeserializeOwned>(
        &self,
        category: AnalyticsCategory,
        cancel: &CancellationToken,
    ) -> Result<T, TransportError> {
        let base_url = self.settings.current().await.api_base_url;
        let query = self.query(category).await;
        debug!(
            ?category,
            base_url = %base_url,
            organization = %query.organization_urn,
            "fetching live LinkedIn statistics"
        );
        self.transport
            .fetch_json(
                &base_url,
                category.path(),
                &query.access_token,
                &query.query_pairs(),
                cancel,
            )
            .await
    }
}

#[async_trait]
impl AnalyticsService for LinkedInAnalyticsService {
    async fn page_views(
        &self,
        cancel: &CancellationToken,
    ) -> Result<PageViewsResponse, TransportError> {
        if self.is_mock().await {
            return Ok(mock_page_views(Utc::now()));
        }
        self.fetch_live(AnalyticsCategory::PageViews, cancel).await
    }

    async fn followers(
        &self,
        cancel: &CancellationToken,
    ) -> Result<FollowersResponse, TransportError> {
        if self.is_mock().await {
            return Ok(mock_followers(Utc::now()));
        }
        self.fetch_live(AnalyticsCategory::Followers, cancel).await
    }

    async fn engagement(
        &self,
        cancel: &CancellationToken,
    ) -> Result<EngagementResponse, TransportError> {
        if self.is_mock().await {
            return Ok(mock_engagement(Utc::now()));
        }
        self.fetch_live(AnalyticsCategory::Engagement, cancel).await
    }
}

pub fn mock_page_views(now: DateTime<Utc>) -> PageViewsResponse {
    PageViewsResponse {
        elements: vec![PageViewStats {
            page_views: Some(123),
            unique_page_views: Some(90),
            time_range: Some(TimeRange::trailing_day(now)),
            organizational_entity: Some(MOCK_ORGANIZATION_URN.to_string()),
        }],
    }
}

pub fn mock_followers(now: DateTime<Utc>) -> FollowersResponse {
    FollowersResponse {
        elements: vec![FollowerStats {
            follower_gains: Some(20),
            follower_losses: Some(5),
            follower_counts: Some(2500),
            time_range: Some(TimeRange::trailing_day(now)),
            organizational_entity: Some(MOCK_ORGANIZATION_URN.to_string()),
        }],
    }
}

pub fn mock_engagement(now: DateTime<Utc>) -> EngagementResponse {
    EngagementResponse {
        elements: vec![EngagementRecord {
            total_share_statistics: Some(ShareStatistics {
                share_count: Some(10),
                impression_count: Some(500),
                click_count: Some(42),
                engagement: Some(0.08),
                like_count: Some(30),
                comment_count: Some(4),
                share_mentions_count: Some(1),
            }),
            time_range: Some(TimeRange::trailing_day(now)),
            organizational_entity: Some(MOCK_ORGANIZATION_URN.to_string()),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 8, 30, 0).unwrap()
    }

    #[test]
    fn category_paths() {
        assert_eq!(
            AnalyticsCategory::PageViews.path(),
            "organizationPageStatistics"
        );
        assert_eq!(
            AnalyticsCategory::Followers.path(),
            "organizationFollowerStatistics"
        );
        assert_eq!(
            AnalyticsCategory::Engagement.path(),
            "organizationalEntityShareStatistics"
        );
    }

    #[test]
    fn page_view_query_uses_organization_finder() {
        let query = AnalyticsQuery {
            category: AnalyticsCategory::PageViews,
            organization_urn: "urn:li:organization:5".to_string(),
            access_token: String::new(),
        };
        assert_eq!(
            query.query_pairs(),
            [("q", "organization"), ("organization", "urn:li:organization:5")]
        );
    }

    #[test]
    fn follower_and_engagement_queries_use_entity_finder() {
        for category in [AnalyticsCategory::Followers, AnalyticsCategory::Engagement] {
            let query = AnalyticsQuery {
                category,
                organization_urn: "urn:li:organization:5".to_string(),
                access_token: String::new(),
            };
            assert_eq!(
                query.query_pairs(),
                [
                    ("q", "organizationalEntity"),
                    ("organizationalEntity", "urn:li:organization:5")
                ]
            );
        }
    }

    #[test]
    fn mock_page_views_fixture() {
        let now = fixed_now();
        let response = mock_page_views(now);

        assert_eq!(response.elements.len(), 1);
        let record = &response.elements[0];
        assert_eq!(record.page_views, Some(123));
        assert_eq!(record.unique_page_views, Some(90));
        assert_eq!(record.time_range, Some(TimeRange::trailing_day(now)));
        assert_eq!(
            record.organizational_entity.as_deref(),
            Some(MOCK_ORGANIZATION_URN)
        );
    }

    #[test]
    fn mock_followers_fixture() {
        let response = mock_followers(fixed_now());

        assert_eq!(response.elements.len(), 1);
        let record = &response.elements[0];
        assert_eq!(record.follower_counts, Some(2500));
        assert_eq!(record.follower_gains, Some(20));
        assert_eq!(record.follower_losses, Some(5));
    }

    #[test]
    fn mock_engagement_fixture() {
        let response = mock_engagement(fixed_now());

        assert_eq!(response.elements.len(), 1);
        let stats = response.elements[0]
            .total_share_statistics
            .as_ref()
            .unwrap();
        assert_eq!(stats.share_count, Some(10));
        assert_eq!(stats.impression_count, Some(500));
        assert_eq!(stats.click_count, Some(42));
        assert_eq!(stats.engagement, Some(0.08));
        assert_eq!(stats.like_count, Some(30));
        assert_eq!(stats.comment_count, Some(4));
        assert_eq!(stats.share_mentions_count, Some(1));
    }

    #[test]
    fn mocks_are_structurally_stable() {
        let a = mock_followers(fixed_now());
        let b = mock_followers(fixed_now() + chrono::Duration::minutes(5));

        assert_eq!(a.elements.len(), b.elements.len());
        assert_eq!(a.elements[0].follower_counts, b.elements[0].follower_counts);
        assert_ne!(a.elements[0].time_range, b.elements[0].time_range);
    }
}
