use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use super::service_account_auth::AccessTokenSource;
use crate::core::drive::drive_models::FOLDER_MIME_TYPE;
use crate::core::drive::{DriveClient, DriveFile};
use crate::core::errors::HelperError;
use crate::infra::http::{bearer_header, build_client, read_json};

pub const DEFAULT_DRIVE_URL: &str = "https://www.googleapis.com/drive/v3";

const FILE_FIELDS: &str = "id,name,mimeType,webViewLink,capabilities/canAddChildren";

// =============================================================================
// DRIVE API RESPONSE STRUCTURES
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiFile {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    web_view_link: Option<String>,
    #[serde(default)]
    capabilities: Option<ApiCapabilities>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiCapabilities {
    can_add_children: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ApiFileList {
    #[serde(default)]
    files: Vec<ApiFile>,
}

#[derive(Debug, Serialize)]
struct CopyBody<'a> {
    name: &'a str,
    parents: [&'a str; 1],
}

impl From<ApiFile> for DriveFile {
    fn from(api: ApiFile) -> Self {
        DriveFile {
            id: api.id,
            name: api.name.unwrap_or_default(),
            mime_type: api.mime_type,
            web_view_link: api.web_view_link,
            can_add_children: api.capabilities.and_then(|c| c.can_add_children),
        }
    }
}

// =============================================================================
// GOOGLE DRIVE CLIENT
// =============================================================================

/// Drive v3 client limited to the lookups and the copy the cloner needs.
pub struct GoogleDriveClient<T: AccessTokenSource> {
    client: Client,
    base_url: Url,
    tokens: T,
}

impl<T: AccessTokenSource> GoogleDriveClient<T> {
    pub fn new(base_url: &str, tokens: T, timeout: Duration) -> Result<Self, HelperError> {
        Ok(Self {
            client: build_client(None, timeout)?,
            base_url: Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
                HelperError::invalid_input(format!("Invalid Drive URL '{}': {}", base_url, e))
            })?,
            tokens,
        })
    }

    /// `<base>/files/<segments..>`, each segment percent-encoded.
    fn files_url(&self, segments: &[&str]) -> Result<Url, HelperError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| HelperError::invalid_input(format!("Invalid Drive URL '{}'", self.base_url)))?
            .pop_if_empty()
            .push("files")
            .extend(segments);
        Ok(url)
    }

    async fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, HelperError> {
        let token = self.tokens.access_token().await?;
        Ok(request.header(reqwest::header::AUTHORIZATION, bearer_header(&token)?))
    }
}

/// Quote a value for a Drive `q` expression.
fn quote_query_value(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn folder_query(name: &str, parent_id: &str) -> String {
    format!(
        "name = {} and mimeType = '{}' and {} in parents and trashed = false",
        quote_query_value(name),
        FOLDER_MIME_TYPE,
        quote_query_value(parent_id)
    )
}

#[async_trait]
impl<T: AccessTokenSource> DriveClient for GoogleDriveClient<T> {
    async fn get_file(&self, file_id: &str) -> Result<DriveFile, HelperError> {
        let url = self.files_url(&[file_id])?;
        tracing::debug!("Fetching Drive metadata for {}", file_id);

        let request = self
            .client
            .get(url)
            .query(&[("fields", FILE_FIELDS), ("supportsAllDrives", "true")]);
        let resp = self.authorized(request).await?.send().await?;

        let file: ApiFile = read_json(resp, &format!("Reading Drive item {}", file_id)).await?;
        Ok(file.into())
    }

    async fn find_folder(
        &self,
        name: &str,
        parent_id: &str,
    ) -> Result<Option<DriveFile>, HelperError> {
        let url = self.files_url(&[])?;
        let query = folder_query(name, parent_id);
        tracing::debug!("Searching Drive: {}", query);

        let request = self.client.get(url).query(&[
            ("q", query.as_str()),
            ("spaces", "drive"),
            ("fields", "files(id,name,mimeType)"),
            ("supportsAllDrives", "true"),
            ("includeItemsFromAllDrives", "true"),
        ]);
        let resp = self.authorized(request).await?.send().await?;

        let list: ApiFileList = read_json(resp, "Listing Drive folders").await?;
        if list.files.len() > 1 {
            tracing::warn!(
                "{} folders named '{}' under {}; using the first",
                list.files.len(),
                name,
                parent_id
            );
        }
        Ok(list.files.into_iter().next().map(DriveFile::from))
    }

    async fn copy_file(
        &self,
        source_id: &str,
        name: &str,
        parent_id: &str,
    ) -> Result<DriveFile, HelperError> {
        let url = self.files_url(&[source_id, "copy"])?;
        let request = self
            .client
            .post(url)
            .query(&[
                ("fields", "id,name,mimeType,webViewLink"),
                ("supportsAllDrives", "true"),
            ])
            .json(&CopyBody {
                name,
                parents: [parent_id],
            });
        let resp = self.authorized(request).await?.send().await?;

        let copied: ApiFile = read_json(resp, &format!("Copying Drive item {}", source_id)).await?;
        Ok(copied.into())
    }
}
