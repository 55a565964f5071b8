use serde::Serialize;
use url::Url;

use crate::core::errors::HelperError;

pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Drive file metadata the cloner cares about. Independent of the HTTP shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    pub mime_type: Option<String>,
    pub web_view_link: Option<String>,
    pub can_add_children: Option<bool>,
}

impl DriveFile {
    pub fn is_folder(&self) -> bool {
        self.mime_type.as_deref() == Some(FOLDER_MIME_TYPE)
    }
}

/// Where the copy should land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    FolderId(String),
    /// A folder looked up by name among the children of `parent_id`.
    FolderName { name: String, parent_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneRequest {
    pub source_id: String,
    pub destination: Destination,
    pub new_name: Option<String>,
}

impl CloneRequest {
    /// Accepts a bare id or any of the Docs/Drive URL shapes.
    pub fn new(
        source: &str,
        destination: Destination,
        new_name: Option<String>,
    ) -> Result<Self, HelperError> {
        let source_id = extract_doc_id(source).ok_or_else(|| {
            HelperError::invalid_input(format!("Could not extract document ID from: {}", source))
        })?;

        let destination = match destination {
            Destination::FolderId(id) if id.trim().is_empty() => {
                return Err(HelperError::invalid_input("Destination folder id is empty"))
            }
            Destination::FolderName { name, .. } if name.trim().is_empty() => {
                return Err(HelperError::invalid_input("Destination folder name is empty"))
            }
            other => other,
        };

        Ok(Self {
            source_id,
            destination,
            new_name: new_name.filter(|n| !n.trim().is_empty()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloneResult {
    pub id: String,
    pub name: String,
    pub link: String,
    pub folder_id: String,
}

/// Fallback edit link for a Google Doc id.
pub fn doc_edit_link(doc_id: &str) -> String {
    format!("https://docs.google.com/document/d/{}/edit", doc_id)
}

/// Extracts the item id from a Docs/Drive URL, or returns a bare id as is.
pub fn extract_doc_id(url_or_id: &str) -> Option<String> {
    let trimmed = url_or_id.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Ok(url) = Url::parse(trimmed) else {
        if trimmed.contains('/') || trimmed.contains(' ') {
            return None;
        }
        return Some(trimmed.to_string());
    };

    let host = url.host_str().unwrap_or_default();
    let segments: Vec<&str> = url.path_segments().map(|s| s.collect()).unwrap_or_default();
    let after_d = segments
        .windows(2)
        .find(|pair| pair[0] == "d" && !pair[1].is_empty())
        .map(|pair| pair[1].to_string());

    if host.contains("docs.google.com") {
        return after_d;
    }

    if host.contains("drive.google.com") {
        if segments.first() == Some(&"file") {
            if let Some(id) = after_d {
                return Some(id);
            }
        }
        return url
            .query_pairs()
            .find(|(key, _)| key == "id")
            .map(|(_, value)| value.into_owned())
            .filter(|id| !id.is_empty() && !id.contains(|c: char| matches!(c, '/' | '?' | '#')));
    }

    None
}

/// The participant folder named by a lab site base URL, e.g.
/// `https://main--x--adobe.aem.live/lab-337/000/` → `000`.
pub fn folder_name_from_site_base_url(base_url: &str) -> Result<String, HelperError> {
    let cleaned = base_url.replace('@', "");
    let cleaned = cleaned.trim();

    if cleaned.contains("_adobe_presenters") {
        return Err(HelperError::invalid_input(format!(
            "{} is an _adobe_presenters source folder",
            cleaned
        )));
    }

    let url = Url::parse(cleaned)
        .map_err(|e| HelperError::invalid_input(format!("Invalid base URL {}: {}", cleaned, e)))?;

    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(str::to_string)
        .ok_or_else(|| {
            HelperError::invalid_input(format!(
                "Could not extract target folder from base URL: {}",
                cleaned
            ))
        })
}
