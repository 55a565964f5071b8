// =============================================================================
// GOOGLE DRIVE MODULE
// =============================================================================
//
// Drive access for the document cloner.
//
// **Authentication:**
// A service account key (`credentials.json`) is exchanged for an access token
// (`service_account_auth.rs`). The folders the cloner writes into must be
// shared with the service account's email.
//
// **Calls:** metadata reads, a folder search by name, and `files.copy`
// (`drive_api_client.rs`).

pub mod drive_api_client;
pub mod service_account_auth;

pub use drive_api_client::{GoogleDriveClient, DEFAULT_DRIVE_URL};
pub use service_account_auth::{
    AccessTokenSource, ServiceAccountAuth, ServiceAccountKey, StaticToken, DRIVE_SCOPE,
};
