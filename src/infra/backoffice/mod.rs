// Backoffice infra layer.
// - `backoffice_client.rs` talks to the sites optimizer HTTP API.

#[path = "backoffice_client.rs"]
pub mod backoffice_client;

pub use backoffice_client::{BackofficeApiClient, DEFAULT_BACKOFFICE_URL};
