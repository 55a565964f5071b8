// The core module contains all business logic.
// Each helper gets its own submodule.

#[path = "errors/helper_error.rs"]
pub mod errors;

#[path = "opportunities/mod.rs"]
pub mod opportunities;

#[path = "drive/mod.rs"]
pub mod drive;

#[path = "sites/mod.rs"]
pub mod sites;
