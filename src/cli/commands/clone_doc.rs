use std::io::Write;

use clap::{ArgGroup, Parser};

use crate::cli::config::{DriveArgs, DriveSettings};
use crate::cli::output::write_json;
use crate::core::drive::{folder_name_from_site_base_url, CloneRequest, Destination, DocumentCloner};
use crate::core::errors::HelperError;
use crate::infra::google_drive::{GoogleDriveClient, ServiceAccountAuth};

/// Lab-337 base folder on the workshop Drive.
pub const LAB_BASE_FOLDER_ID: &str = "1MF90nBGR1LDyQN7kaDDye91bujdB87cL";

/// Copy a Google Drive document into a participant folder.
#[derive(Parser, Debug, Clone)]
#[command(name = "clone-doc", version)]
#[command(group(
    ArgGroup::new("destination")
        .required(true)
        .args(["folder_id", "folder_name", "site_base_url"])
))]
pub struct CloneDocArgs {
    /// Document id or Docs/Drive URL to copy
    #[arg(long)]
    pub source: String,

    /// Destination folder id
    #[arg(long)]
    pub folder_id: Option<String>,

    /// Destination folder name, looked up under --base-folder-id
    #[arg(long)]
    pub folder_name: Option<String>,

    /// Lab site base URL; its last path segment names the destination folder
    #[arg(long)]
    pub site_base_url: Option<String>,

    /// Parent folder searched by --folder-name and --site-base-url
    #[arg(long, default_value = LAB_BASE_FOLDER_ID)]
    pub base_folder_id: String,

    /// Title for the copy (defaults to the source's title)
    #[arg(long)]
    pub name: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub drive: DriveArgs,
}

impl CloneDocArgs {
    pub fn destination(&self) -> Result<Destination, HelperError> {
        if let Some(id) = &self.folder_id {
            return Ok(Destination::FolderId(id.trim().to_string()));
        }

        let name = match (&self.folder_name, &self.site_base_url) {
            (Some(name), _) => name.trim().to_string(),
            (None, Some(base_url)) => folder_name_from_site_base_url(base_url)?,
            (None, None) => {
                return Err(HelperError::invalid_input(
                    "One of --folder-id, --folder-name or --site-base-url is required",
                ))
            }
        };

        Ok(Destination::FolderName {
            name,
            parent_id: self.base_folder_id.trim().to_string(),
        })
    }
}

pub async fn run<W: Write>(args: CloneDocArgs, stdout: &mut W) -> Result<(), HelperError> {
    let settings = DriveSettings::try_from(&args.drive)?;
    let request = CloneRequest::new(&args.source, args.destination()?, args.name.clone())?;

    let auth = ServiceAccountAuth::from_file(&settings.credentials, settings.timeout).await?;
    tracing::info!("Using service account {}", auth.client_email());

    let drive = GoogleDriveClient::new(&settings.base_url, auth, settings.timeout)?;
    let cloner = DocumentCloner::new(drive);
    let result = cloner.clone_document(&request).await?;

    if args.json {
        return write_json(stdout, &result);
    }

    let io = |e: std::io::Error| HelperError::invalid_input(format!("Failed to write output: {}", e));
    writeln!(stdout, "Successfully cloned document into folder {}", result.folder_id).map_err(io)?;
    writeln!(stdout, "New document ID: {}", result.id).map_err(io)?;
    writeln!(stdout, "New document URL: {}", result.link).map_err(io)
}
