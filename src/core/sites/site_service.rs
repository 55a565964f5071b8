use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::site_models::{ProvisionOutcome, ProvisionPlan, ProvisionReport, SiteSpec};
use crate::core::errors::HelperError;

/// Site lookups and creation on the backoffice.
#[async_trait]
pub trait SiteRegistry: Send + Sync {
    /// `Ok(None)` when no site has this base URL.
    async fn find_site_by_base_url(&self, base_url: &str) -> Result<Option<Value>, HelperError>;
    async fn create_site(&self, spec: &SiteSpec) -> Result<Value, HelperError>;
}

/// Maps lab site ids to their base URLs.
#[async_trait]
pub trait LabSiteDirectory: Send + Sync {
    async fn base_url_for(&self, site_id: &str) -> Result<Option<String>, HelperError>;
}

/// Creates the numbered participant sites, skipping any that already exist.
pub struct SiteProvisioner<R: SiteRegistry> {
    registry: R,
    pause: Duration,
}

impl<R: SiteRegistry> SiteProvisioner<R> {
    pub fn new(registry: R, pause: Duration) -> Self {
        Self { registry, pause }
    }

    /// Walk the plan in order. A failed site is reported and the run moves on.
    pub async fn provision(&self, plan: &ProvisionPlan) -> Vec<ProvisionReport> {
        let mut reports = Vec::new();

        for spec in plan.site_specs() {
            tracing::info!("Processing site {}...", spec.name);
            let outcome = self.provision_one(&spec).await;

            match &outcome {
                ProvisionOutcome::AlreadyExists { id } => tracing::info!(
                    "Skipping site {} as it already exists ({})",
                    spec.name,
                    id.as_deref().unwrap_or("unknown")
                ),
                ProvisionOutcome::Created { id } => tracing::info!(
                    "Successfully created site {} ({})",
                    spec.name,
                    id.as_deref().unwrap_or("unknown")
                ),
                ProvisionOutcome::Failed { reason } => {
                    tracing::error!("Failed to create site {}: {}", spec.name, reason)
                }
            }

            let attempted_create = !matches!(outcome, ProvisionOutcome::AlreadyExists { .. });
            reports.push(ProvisionReport {
                name: spec.name,
                base_url: spec.base_url,
                outcome,
            });

            if attempted_create && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }
        }

        reports
    }

    async fn provision_one(&self, spec: &SiteSpec) -> ProvisionOutcome {
        match self.registry.find_site_by_base_url(&spec.base_url).await {
            Ok(Some(existing)) => {
                return ProvisionOutcome::AlreadyExists {
                    id: site_id(&existing),
                }
            }
            Ok(None) => {}
            Err(e) => {
                return ProvisionOutcome::Failed {
                    reason: format!("lookup failed: {}", e),
                }
            }
        }

        tracing::info!("Creating site {}...", spec.name);
        match self.registry.create_site(spec).await {
            Ok(created) => ProvisionOutcome::Created {
                id: site_id(&created),
            },
            Err(e) => ProvisionOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }
}

fn site_id(site: &Value) -> Option<String> {
    site.get("id").and_then(Value::as_str).map(str::to_string)
}
