use serde::{Deserialize, Serialize};

/// Entry of the published lab sites sheet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LabSite {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "baseURL")]
    pub base_url: Option<String>,
}

/// Shape of `lab-337-sites.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabSiteSheet {
    #[serde(default)]
    pub data: Vec<LabSite>,
}

impl LabSiteSheet {
    pub fn base_url_for(&self, site_id: &str) -> Option<String> {
        self.data
            .iter()
            .find(|site| site.id.as_deref() == Some(site_id))
            .and_then(|site| site.base_url.clone())
    }
}

/// Body for `POST /sites`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSpec {
    pub organization_id: String,
    #[serde(rename = "baseURL")]
    pub base_url: String,
    pub delivery_type: String,
    pub name: String,
}

/// Settings for one provisioning run.
#[derive(Debug, Clone)]
pub struct ProvisionPlan {
    pub first: u32,
    pub last: u32,
    pub organization_id: String,
    pub base_url_prefix: String,
    pub delivery_type: String,
}

impl ProvisionPlan {
    /// Participant sites are numbered `000`..`999` under the lab prefix.
    pub fn site_specs(&self) -> Vec<SiteSpec> {
        let prefix = self.base_url_prefix.trim_end_matches('/');
        (self.first..=self.last)
            .map(|n| {
                let number = format!("{:03}", n);
                SiteSpec {
                    organization_id: self.organization_id.clone(),
                    base_url: format!("{}/{}/", prefix, number),
                    delivery_type: self.delivery_type.clone(),
                    name: format!("L337-{}", number),
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    Created { id: Option<String> },
    AlreadyExists { id: Option<String> },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub name: String,
    pub base_url: String,
    pub outcome: ProvisionOutcome,
}
