//! LinkedIn organization analytics: response schema, tenant identity and the
//! mock/live analytics service.

pub mod identity;
pub mod models;
pub mod service;

pub use identity::{resolve_urn, ConfiguredIdentity, OrganizationIdentity};
pub use models::{
    EngagementRecord, EngagementResponse, FollowerStats, FollowersResponse, PageViewStats,
    PageViewsResponse, ShareStatistics, TimeRange,
};
pub use service::{AnalyticsCategory, AnalyticsQuery, AnalyticsService, LinkedInAnalyticsService};
