// The infra module contains implementations of core traits.
// Each remote surface gets its own submodule.

#[path = "http/http_support.rs"]
pub mod http;

#[path = "backoffice/mod.rs"]
pub mod backoffice;

#[path = "google_drive/mod.rs"]
pub mod google_drive;

#[path = "lab_sites/lab_sites_client.rs"]
pub mod lab_sites;
