use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::core::errors::HelperError;
use crate::core::sites::{LabSiteDirectory, LabSiteSheet};
use crate::infra::http::{build_client, read_json};

pub const DEFAULT_LAB_SITES_URL: &str =
    "https://main--wknd-summit2025--adobe.aem.live/lab-337/lab-337-sites.json";

/// Reads the published lab sites sheet. Public, so no token is sent.
pub struct LabSitesClient {
    client: Client,
    sheet_url: String,
}

impl LabSitesClient {
    pub fn new(sheet_url: &str, timeout: Duration) -> Result<Self, HelperError> {
        Ok(Self {
            client: build_client(None, timeout)?,
            sheet_url: sheet_url.to_string(),
        })
    }

    pub async fn fetch_sheet(&self) -> Result<LabSiteSheet, HelperError> {
        tracing::info!("Fetching site data from: {}", self.sheet_url);
        let resp = self.client.get(&self.sheet_url).send().await?;
        read_json(resp, "Fetching lab sites").await
    }
}

#[async_trait]
impl LabSiteDirectory for LabSitesClient {
    async fn base_url_for(&self, site_id: &str) -> Result<Option<String>, HelperError> {
        let base_url = self.fetch_sheet().await?.base_url_for(site_id);
        match &base_url {
            Some(url) => tracing::info!("Found baseURL for site {}: {}", site_id, url),
            None => tracing::warn!("No baseURL found for site {}", site_id),
        }
        Ok(base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_base_url_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lab-337/lab-337-sites.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 2,
                "data": [
                    {"id": "site-a", "baseURL": "https://lab.example/lab-337/000/"},
                    {"id": "site-b", "baseURL": "https://lab.example/lab-337/001/"}
                ]
            })))
            .mount(&server)
            .await;

        let client = LabSitesClient::new(
            &format!("{}/lab-337/lab-337-sites.json", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            client.base_url_for("site-b").await.unwrap(),
            Some("https://lab.example/lab-337/001/".to_string())
        );
        assert_eq!(client.base_url_for("site-z").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unavailable_sheet() {
        let server = MockServer::start().await;
        let client =
            LabSitesClient::new(&format!("{}/missing.json", server.uri()), Duration::from_secs(5))
                .unwrap();

        assert!(matches!(
            client.base_url_for("site-a").await,
            Err(HelperError::NotFound { .. })
        ));
    }
}
