use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use url::Url;

use crate::core::errors::HelperError;
use crate::infra::backoffice::DEFAULT_BACKOFFICE_URL;
use crate::infra::google_drive::DEFAULT_DRIVE_URL;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Flags shared by every tool that talks to the backoffice.
#[derive(Args, Debug, Clone)]
pub struct BackofficeArgs {
    /// IMS token sent as a bearer credential
    #[arg(long, env = "ASO_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Backoffice API root
    #[arg(long, env = "ASO_API_BASE_URL", default_value = DEFAULT_BACKOFFICE_URL)]
    pub api_base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

/// Flags for the Drive tools.
#[derive(Args, Debug, Clone)]
pub struct DriveArgs {
    /// Service account key file
    #[arg(
        long,
        env = "GOOGLE_SERVICE_ACCOUNT_KEY",
        default_value = "credentials.json"
    )]
    pub credentials: PathBuf,

    /// Drive API root
    #[arg(long, env = "GOOGLE_DRIVE_API_BASE_URL", default_value = DEFAULT_DRIVE_URL)]
    pub drive_base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

/// Validated backoffice configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackofficeSettings {
    pub token: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl TryFrom<&BackofficeArgs> for BackofficeSettings {
    type Error = HelperError;

    fn try_from(args: &BackofficeArgs) -> Result<Self, Self::Error> {
        let token = args.token.trim();
        if token.is_empty() {
            return Err(HelperError::invalid_input(
                "A token is required (--token or ASO_TOKEN)",
            ));
        }

        Ok(Self {
            token: token.to_string(),
            base_url: parse_base_url(&args.api_base_url)?,
            timeout: parse_timeout(args.timeout_secs)?,
        })
    }
}

/// Validated Drive configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveSettings {
    pub credentials: PathBuf,
    pub base_url: String,
    pub timeout: Duration,
}

impl TryFrom<&DriveArgs> for DriveSettings {
    type Error = HelperError;

    fn try_from(args: &DriveArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            credentials: args.credentials.clone(),
            base_url: parse_base_url(&args.drive_base_url)?,
            timeout: parse_timeout(args.timeout_secs)?,
        })
    }
}

pub fn parse_timeout(secs: u64) -> Result<Duration, HelperError> {
    if secs == 0 {
        return Err(HelperError::invalid_input("--timeout-secs must be at least 1"));
    }
    Ok(Duration::from_secs(secs))
}

/// Only http(s) roots are accepted. The trailing slash is dropped so paths
/// can be appended verbatim.
pub fn parse_base_url(raw: &str) -> Result<String, HelperError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| HelperError::invalid_input(format!("Invalid URL '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url.as_str().trim_end_matches('/').to_string()),
        other => Err(HelperError::invalid_input(format!(
            "Unsupported URL scheme '{}' in {}",
            other, raw
        ))),
    }
}
