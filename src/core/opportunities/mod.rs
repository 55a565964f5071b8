pub mod opportunity_models;
pub mod opportunity_service;

pub use opportunity_models::{
    ClonedOpportunity, GoogleDocReference, NewOpportunity, OpportunityDescriptor, OpportunityFile,
    OpportunityRequest, OpportunityResult,
};
pub use opportunity_service::{BackofficeClient, OpportunityService};
