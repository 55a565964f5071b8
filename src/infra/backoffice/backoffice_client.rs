use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::core::errors::HelperError;
use crate::core::opportunities::{BackofficeClient, NewOpportunity};
use crate::core::sites::{SiteRegistry, SiteSpec};
use crate::infra::http::{build_client, ensure_success, read_json};

pub const DEFAULT_BACKOFFICE_URL: &str = "https://spacecat.experiencecloud.live/api/v1";

/// Minimal sites optimizer backoffice client. It only exposes the calls the
/// core layer needs; every request carries the bearer token.
pub struct BackofficeApiClient {
    client: Client,
    base_url: String,
}

impl BackofficeApiClient {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, HelperError> {
        Ok(Self {
            client: build_client(Some(token), timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl BackofficeClient for BackofficeApiClient {
    async fn list_opportunities(
        &self,
        site_id: &str,
        opportunity_type: &str,
    ) -> Result<Value, HelperError> {
        let url = self.url(&format!("/sites/{}/opportunities", site_id));
        tracing::debug!("GET {} (type={})", url, opportunity_type);

        let resp = self
            .client
            .get(&url)
            .query(&[("type", opportunity_type)])
            .send()
            .await?;

        read_json(resp, "Listing opportunities").await
    }

    async fn create_opportunity(
        &self,
        site_id: &str,
        opportunity: &NewOpportunity,
    ) -> Result<Value, HelperError> {
        let url = self.url(&format!("/sites/{}/opportunities", site_id));
        let resp = self.client.post(&url).json(opportunity).send().await?;

        let created: Value = read_json(resp, "Creating opportunity").await?;
        tracing::info!("Successfully cloned opportunity to site {}", site_id);
        Ok(created)
    }

    async fn add_suggestions(
        &self,
        site_id: &str,
        opportunity_id: &str,
        suggestions: &[Value],
    ) -> Result<Value, HelperError> {
        let url = self.url(&format!(
            "/sites/{}/opportunities/{}/suggestions",
            site_id, opportunity_id
        ));
        tracing::debug!(
            "Suggestions payload: {}",
            serde_json::to_string_pretty(suggestions).unwrap_or_default()
        );

        let resp = self.client.post(&url).json(suggestions).send().await?;
        read_json(resp, "Adding suggestions").await
    }
}

#[async_trait]
impl SiteRegistry for BackofficeApiClient {
    async fn find_site_by_base_url(&self, base_url: &str) -> Result<Option<Value>, HelperError> {
        let encoded = STANDARD.encode(base_url.as_bytes());
        let url = self.url(&format!("/sites/by-base-url/{}", encoded));

        let resp = self.client.get(&url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        read_json(resp, "Looking up site").await.map(Some)
    }

    async fn create_site(&self, spec: &SiteSpec) -> Result<Value, HelperError> {
        let resp = self.client.post(self.url("/sites")).json(spec).send().await?;
        let resp = ensure_success(resp, "Creating site").await?;

        // The backoffice has answered creates with an empty body before.
        let text = resp.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| HelperError::remote(format!("Creating site returned invalid JSON: {}", e)))
    }
}
