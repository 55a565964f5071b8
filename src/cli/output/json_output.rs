use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::errors::HelperError;

/// Pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<(), HelperError> {
    serde_json::to_writer_pretty(&mut *out, value)
        .map_err(|e| HelperError::invalid_input(format!("Failed to serialize output: {}", e)))?;
    writeln!(out).map_err(|e| HelperError::invalid_input(format!("Failed to write output: {}", e)))
}

/// Write `value` to `path` through a sibling temp file, so an interrupted
/// run never leaves a half-written result behind.
pub async fn write_json_file<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), HelperError> {
    let mut text = serde_json::to_string_pretty(value)
        .map_err(|e| HelperError::invalid_input(format!("Failed to serialize output: {}", e)))?;
    text.push('\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| output_error(path, e))?;
    }

    let staging = staging_path(path);
    let staged = match tokio::fs::write(&staging, text).await {
        Ok(()) => tokio::fs::rename(&staging, path).await,
        Err(e) => Err(e),
    };

    // A failed write or rename must not leave the staging file behind.
    if let Err(e) = staged {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(output_error(path, e));
    }

    tracing::info!("Wrote {}", path.display());
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

fn output_error(path: &Path, e: std::io::Error) -> HelperError {
    HelperError::invalid_input(format!("Cannot write {}: {}", path.display(), e))
}
