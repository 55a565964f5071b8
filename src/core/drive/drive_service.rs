use async_trait::async_trait;

use super::drive_models::{doc_edit_link, CloneRequest, CloneResult, Destination, DriveFile};
use crate::core::errors::HelperError;

/// The Drive calls the cloner makes. Implementations own authentication.
#[async_trait]
pub trait DriveClient: Send + Sync {
    async fn get_file(&self, file_id: &str) -> Result<DriveFile, HelperError>;
    /// First non-trashed folder called `name` directly under `parent_id`.
    async fn find_folder(
        &self,
        name: &str,
        parent_id: &str,
    ) -> Result<Option<DriveFile>, HelperError>;
    async fn copy_file(
        &self,
        source_id: &str,
        name: &str,
        parent_id: &str,
    ) -> Result<DriveFile, HelperError>;
}

/// Copies one Drive item into a destination folder.
///
/// Every check runs before the copy call, so a failed clone never leaves a
/// new item behind.
pub struct DocumentCloner<D: DriveClient> {
    drive: D,
}

impl<D: DriveClient> DocumentCloner<D> {
    pub fn new(drive: D) -> Self {
        Self { drive }
    }

    pub async fn clone_document(&self, request: &CloneRequest) -> Result<CloneResult, HelperError> {
        tracing::info!("Cloning {} into {:?}", request.source_id, request.destination);

        let folder_id = self.resolve_destination(&request.destination).await?;
        self.verify_destination(&folder_id).await?;

        let name = match &request.new_name {
            Some(name) => name.clone(),
            None => {
                let source = self.drive.get_file(&request.source_id).await?;
                if source.name.is_empty() {
                    format!("Copy of document {}", request.source_id)
                } else {
                    source.name
                }
            }
        };

        let copied = self
            .drive
            .copy_file(&request.source_id, &name, &folder_id)
            .await?;

        tracing::info!("Successfully cloned document to {} ({})", copied.name, copied.id);

        let link = copied
            .web_view_link
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| doc_edit_link(&copied.id));

        Ok(CloneResult {
            name: if copied.name.is_empty() { name } else { copied.name },
            id: copied.id,
            link,
            folder_id,
        })
    }

    async fn resolve_destination(&self, destination: &Destination) -> Result<String, HelperError> {
        match destination {
            Destination::FolderId(id) => Ok(id.clone()),
            Destination::FolderName { name, parent_id } => {
                match self.drive.find_folder(name, parent_id).await? {
                    Some(folder) => {
                        tracing::info!("Found folder: {} ({})", folder.name, folder.id);
                        Ok(folder.id)
                    }
                    None => Err(HelperError::not_found(format!(
                        "No folder named '{}' under {}",
                        name, parent_id
                    ))),
                }
            }
        }
    }

    /// The destination must be visible to the credential and accept children.
    async fn verify_destination(&self, folder_id: &str) -> Result<(), HelperError> {
        let folder = self.drive.get_file(folder_id).await.map_err(|e| match e {
            HelperError::NotFound { status, .. } | HelperError::Permission { status, .. } => {
                HelperError::Permission {
                    status,
                    message: format!(
                        "Destination folder {} is not shared with this service account",
                        folder_id
                    ),
                }
            }
            other => other,
        })?;

        if !folder.is_folder() {
            return Err(HelperError::invalid_input(format!(
                "Destination {} is not a folder",
                folder_id
            )));
        }

        if folder.can_add_children == Some(false) {
            return Err(HelperError::permission(format!(
                "Destination folder {} is read-only for this service account",
                folder_id
            )));
        }

        Ok(())
    }
}
