pub mod site_models;
pub mod site_service;

pub use site_models::{
    LabSite, LabSiteSheet, ProvisionOutcome, ProvisionPlan, ProvisionReport, SiteSpec,
};
pub use site_service::{LabSiteDirectory, SiteProvisioner, SiteRegistry};
