use std::io::Write;
use std::time::Duration;

use clap::Parser;

use crate::cli::config::{BackofficeArgs, BackofficeSettings};
use crate::core::errors::HelperError;
use crate::core::sites::{ProvisionOutcome, ProvisionPlan, SiteProvisioner};
use crate::infra::backoffice::BackofficeApiClient;

pub const LAB_ORGANIZATION_ID: &str = "d488fc90-d009-412c-82a1-70b338b1869c";
pub const LAB_BASE_URL_PREFIX: &str = "https://main--wknd-summit2025--adobe.aem.live/lab-337";

/// Create the numbered lab sites (`L337-002`, `L337-003`, ...) that are
/// missing from the backoffice.
#[derive(Parser, Debug, Clone)]
#[command(name = "create-sites", version)]
pub struct CreateSitesArgs {
    #[command(flatten)]
    pub backoffice: BackofficeArgs,

    /// First site number
    #[arg(long, default_value_t = 2)]
    pub from: u32,

    /// Last site number (inclusive)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(0..=999))]
    pub to: u32,

    /// Organization that owns the sites
    #[arg(long, default_value = LAB_ORGANIZATION_ID)]
    pub org_id: String,

    /// Prefix every site base URL is built from
    #[arg(long, default_value = LAB_BASE_URL_PREFIX)]
    pub lab_base_url: String,

    /// Pause after each create request, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub delay_ms: u64,
}

pub async fn run<W: Write>(args: CreateSitesArgs, stdout: &mut W) -> Result<(), HelperError> {
    let settings = BackofficeSettings::try_from(&args.backoffice)?;
    if args.from > args.to {
        return Err(HelperError::invalid_input(format!(
            "--from ({}) is greater than --to ({})",
            args.from, args.to
        )));
    }

    let plan = ProvisionPlan {
        first: args.from,
        last: args.to,
        organization_id: args.org_id.clone(),
        base_url_prefix: args.lab_base_url.clone(),
        delivery_type: "aem_edge".to_string(),
    };

    let client = BackofficeApiClient::new(&settings.base_url, &settings.token, settings.timeout)?;
    let provisioner = SiteProvisioner::new(client, Duration::from_millis(args.delay_ms));
    let reports = provisioner.provision(&plan).await;

    let io = |e: std::io::Error| HelperError::invalid_input(format!("Failed to write output: {}", e));
    let mut failed = 0usize;
    for report in &reports {
        let line = match &report.outcome {
            ProvisionOutcome::Created { id } => {
                format!("created  {} {}", report.name, id.as_deref().unwrap_or("-"))
            }
            ProvisionOutcome::AlreadyExists { id } => {
                format!("exists   {} {}", report.name, id.as_deref().unwrap_or("-"))
            }
            ProvisionOutcome::Failed { reason } => {
                failed += 1;
                format!("failed   {} {}", report.name, reason)
            }
        };
        writeln!(stdout, "{}", line).map_err(io)?;
    }
    writeln!(stdout, "All sites processed!").map_err(io)?;

    if failed > 0 {
        return Err(HelperError::remote(format!(
            "{} of {} sites could not be provisioned",
            failed,
            reports.len()
        )));
    }
    Ok(())
}
