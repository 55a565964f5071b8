// Library behind the Summit Lab helper binaries.
//
// **Architecture Overview:**
// - `core/` = Domain models, error taxonomy and services (no HTTP types)
// - `infra/` = Implementations of core traits (backoffice API, Google Drive)
// - `cli/` = Argument parsing, configuration and output for the binaries
//
// Each binary in `src/bin/` only parses its arguments and hands them to the
// matching `cli::commands` entry point.

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with several mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
pub mod core;
#[path = "infra/infra_layer.rs"]
pub mod infra;
#[path = "cli/cli_layer.rs"]
pub mod cli;

pub use crate::core::errors::HelperError;
