pub mod drive_models;
pub mod drive_service;

pub use drive_models::{
    doc_edit_link, extract_doc_id, folder_name_from_site_base_url, CloneRequest, CloneResult,
    Destination, DriveFile,
};
pub use drive_service::{DocumentCloner, DriveClient};
