use std::io::Write;
use std::path::PathBuf;

use clap::Parser;

use super::fetch_oppt::read_descriptor;
use crate::cli::config::{parse_base_url, BackofficeArgs, BackofficeSettings};
use crate::cli::output::write_json;
use crate::core::errors::HelperError;
use crate::core::opportunities::{opportunity_models::validate_site_id, OpportunityService};
use crate::infra::backoffice::BackofficeApiClient;
use crate::infra::lab_sites::{LabSitesClient, DEFAULT_LAB_SITES_URL};

/// Clone an exported opportunity, and its suggestions, onto a site.
#[derive(Parser, Debug, Clone)]
#[command(name = "clone-oppt", version)]
pub struct CloneOpptArgs {
    #[command(flatten)]
    pub backoffice: BackofficeArgs,

    /// The site ID (UUID)
    #[arg(long)]
    pub site_id: String,

    /// Path to the opportunity JSON file
    #[arg(long)]
    pub oppt_file: PathBuf,

    /// Published lab sites sheet, used to resolve site base URLs
    #[arg(long, env = "LAB_SITES_URL", default_value = DEFAULT_LAB_SITES_URL)]
    pub lab_sites_url: String,
}

pub async fn run<W: Write>(args: CloneOpptArgs, stdout: &mut W) -> Result<(), HelperError> {
    let settings = BackofficeSettings::try_from(&args.backoffice)?;
    let site_id = validate_site_id(&args.site_id)?;
    let file = read_descriptor(&args.oppt_file).await?.to_opportunity_file()?;

    let client = BackofficeApiClient::new(&settings.base_url, &settings.token, settings.timeout)?;
    let sites = LabSitesClient::new(&parse_base_url(&args.lab_sites_url)?, settings.timeout)?;
    let service = OpportunityService::new(client);

    let result = service.clone_opportunity(&site_id, file, &sites).await?;

    let io = |e: std::io::Error| HelperError::invalid_input(format!("Failed to write output: {}", e));

    writeln!(stdout, "\nOpportunity created:").map_err(io)?;
    write_json(stdout, &result.opportunity)?;

    match &result.suggestions {
        Some(suggestions) => {
            writeln!(stdout, "\nSuggestions added:").map_err(io)?;
            write_json(stdout, suggestions)?;
        }
        None => writeln!(stdout, "\nNo suggestions were added.").map_err(io)?,
    }

    if !result.google_docs.is_empty() {
        writeln!(stdout, "\nGoogle Docs found:").map_err(io)?;
        for doc in &result.google_docs {
            writeln!(stdout, "- {}", doc.url).map_err(io)?;
            writeln!(
                stdout,
                "  site baseURL: {}",
                doc.site_base_url.as_deref().unwrap_or("unknown")
            )
            .map_err(io)?;
        }
    }

    Ok(())
}
