use async_trait::async_trait;

use crate::config::LinkedInSettings;

pub const ORGANIZATION_URN_PREFIX: &str = "urn:li:organization:";

/// Tenant context for live calls: who we are and which organization we ask about.
#[async_trait]
pub trait OrganizationIdentity: Send + Sync {
    async fn access_token(&self) -> String;
    async fn organization_urn(&self) -> String;
}

/// LinkedIn expects `urn:li:organization:<id>`; identifiers that are already
/// URNs pass through untouched.
pub fn resolve_urn(organization_id: &str) -> String {
    if organization_id.starts_with("urn:") {
        organization_id.to_string()
    } else {
        format!("{ORGANIZATION_URN_PREFIX}{organization_id}")
    }
}

/// Reads the token and organization from the current settings. Missing values
/// come back empty rather than failing.
#[derive(Debug, Clone)]
pub struct ConfiguredIdentity {
    settings: LinkedInSettings,
}

impl ConfiguredIdentity {
    pub fn new(settings: LinkedInSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl OrganizationIdentity for ConfiguredIdentity {
    async fn access_token(&self) -> String {
        self.settings.current().await.access_token
    }

    async fn organization_urn(&self) -> String {
        resolve_urn(&self.settings.current().await.organization_id)
    }
}
