use async_trait::async_trait;
use serde_json::Value;

use super::opportunity_models::{
    ClonedOpportunity, GoogleDocReference, NewOpportunity, OpportunityFile, OpportunityRequest,
    OpportunityResult,
};
use crate::core::errors::HelperError;
use crate::core::sites::LabSiteDirectory;

/// The backoffice calls the opportunity helpers need. The token is owned by
/// the implementation.
#[async_trait]
pub trait BackofficeClient: Send + Sync {
    async fn list_opportunities(
        &self,
        site_id: &str,
        opportunity_type: &str,
    ) -> Result<Value, HelperError>;

    async fn create_opportunity(
        &self,
        site_id: &str,
        opportunity: &NewOpportunity,
    ) -> Result<Value, HelperError>;

    async fn add_suggestions(
        &self,
        site_id: &str,
        opportunity_id: &str,
        suggestions: &[Value],
    ) -> Result<Value, HelperError>;
}

/// Fetches and clones opportunities. Holds no state beyond the client.
pub struct OpportunityService<C: BackofficeClient> {
    client: C,
}

impl<C: BackofficeClient> OpportunityService<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// One read, passed through untouched.
    pub async fn fetch(&self, request: &OpportunityRequest) -> Result<OpportunityResult, HelperError> {
        tracing::info!(
            "Fetching '{}' opportunities for site {}",
            request.opportunity_type,
            request.site_id
        );

        let payload = self
            .client
            .list_opportunities(&request.site_id, &request.opportunity_type)
            .await?;

        Ok(OpportunityResult {
            opportunity_type: request.opportunity_type.clone(),
            payload,
        })
    }

    /// Create the opportunity on `site_id`, then attach the exported
    /// suggestions to it.
    pub async fn clone_opportunity<D: LabSiteDirectory>(
        &self,
        site_id: &str,
        file: OpportunityFile,
        sites: &D,
    ) -> Result<ClonedOpportunity, HelperError> {
        let payload = NewOpportunity::from(&file.opportunity);
        tracing::info!("Cloning opportunity to site {}", site_id);
        tracing::debug!(
            "Payload: {}",
            serde_json::to_string_pretty(&payload).unwrap_or_default()
        );

        let opportunity = self.client.create_opportunity(site_id, &payload).await?;
        let mut result = ClonedOpportunity {
            opportunity,
            suggestions: None,
            google_docs: Vec::new(),
        };

        let opportunity_id = result
            .opportunity
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string);

        let (opportunity_id, mut suggestions) = match (opportunity_id, file.suggestions) {
            (Some(id), Some(suggestions)) => (id, suggestions),
            (None, _) => {
                tracing::warn!("No opportunity ID found in response. Suggestions were not added.");
                return Ok(result);
            }
            (Some(_), None) => {
                tracing::warn!("No suggestions found in the opportunity file.");
                return Ok(result);
            }
        };

        for url in google_doc_urls(&suggestions) {
            let site_base_url = match sites.base_url_for(site_id).await {
                Ok(found) => found,
                Err(e) => {
                    tracing::warn!("Could not look up lab site {}: {}", site_id, e);
                    None
                }
            };
            result.google_docs.push(GoogleDocReference { url, site_base_url });
        }

        for suggestion in suggestions.iter_mut() {
            if let Value::Object(map) = suggestion {
                map.insert(
                    "opportunityId".to_string(),
                    Value::String(opportunity_id.clone()),
                );
            }
        }

        tracing::info!(
            "Adding {} suggestions to opportunity {}",
            suggestions.len(),
            opportunity_id
        );
        let added = self
            .client
            .add_suggestions(site_id, &opportunity_id, &suggestions)
            .await?;
        result.suggestions = Some(added);

        Ok(result)
    }
}

/// Google Docs links found in `data.variations[].variationEditPageUrl`.
fn google_doc_urls(suggestions: &[Value]) -> Vec<String> {
    suggestions
        .iter()
        .filter_map(|s| s.pointer("/data/variations").and_then(Value::as_array))
        .flatten()
        .filter_map(|v| v.get("variationEditPageUrl").and_then(Value::as_str))
        .filter(|url| url.starts_with("https://docs.google.com"))
        .map(str::to_string)
        .collect()
}
