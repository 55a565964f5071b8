use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::cli::config::{BackofficeArgs, BackofficeSettings};
use crate::cli::output::{write_json, write_json_file};
use crate::core::errors::HelperError;
use crate::core::opportunities::{OpportunityDescriptor, OpportunityRequest, OpportunityService};
use crate::infra::backoffice::BackofficeApiClient;

/// Fetch the opportunities of one type for a site.
///
/// e.g. `fetch-oppt --token $ASO_TOKEN --site-id 13b91559-bbed-41d3-af66-c60660223ed5
/// --oppt-file ./oppt/opp--alt-text--3_7_2025.json`
#[derive(Parser, Debug, Clone)]
#[command(name = "fetch-oppt", version)]
pub struct FetchOpptArgs {
    #[command(flatten)]
    pub backoffice: BackofficeArgs,

    /// The site ID (UUID)
    #[arg(long)]
    pub site_id: String,

    /// Opportunity JSON file whose name or contents select the type
    #[arg(long)]
    pub oppt_file: PathBuf,

    /// Write the records here instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub async fn run<W: Write>(args: FetchOpptArgs, stdout: &mut W) -> Result<(), HelperError> {
    let settings = BackofficeSettings::try_from(&args.backoffice)?;
    let descriptor = read_descriptor(&args.oppt_file).await?;
    let request = OpportunityRequest::new(&args.site_id, &settings.token, &descriptor)?;

    let client = BackofficeApiClient::new(&settings.base_url, &request.token, settings.timeout)?;
    let service = OpportunityService::new(client);
    let result = service.fetch(&request).await?;

    match &args.output {
        Some(path) => write_json_file(path, &result.payload).await,
        None => write_json(stdout, &result.payload),
    }
}

/// Load a descriptor; a missing or unparsable file is a usage error.
pub async fn read_descriptor(path: &Path) -> Result<OpportunityDescriptor, HelperError> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        HelperError::invalid_input(format!("Opportunity file {}: {}", path.display(), e))
    })?;
    OpportunityDescriptor::from_parts(path, &text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_flags() {
        let args = FetchOpptArgs::try_parse_from([
            "fetch-oppt",
            "--token",
            "VALID",
            "--site-id",
            "13b91559-bbed-41d3-af66-c60660223ed5",
            "--oppt-file",
            "opp--alt-text--3_7_2025.json",
        ])
        .unwrap();

        assert_eq!(args.backoffice.token, "VALID");
        assert_eq!(args.backoffice.timeout_secs, 30);
        assert_eq!(args.oppt_file, PathBuf::from("opp--alt-text--3_7_2025.json"));
        assert!(args.output.is_none());
    }

    #[test]
    fn test_site_id_is_required() {
        let err = FetchOpptArgs::try_parse_from([
            "fetch-oppt",
            "--token",
            "VALID",
            "--oppt-file",
            "x.json",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[tokio::test]
    async fn test_missing_descriptor_is_invalid_input() {
        let err = read_descriptor(Path::new("/nope/opp--alt-text.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, HelperError::InvalidInput(_)));
    }
}
