//! Local storage for uploaded photos.
//!
//! Files are written under the configured media root with a random name and
//! referenced in the database by their path relative to that root.

use std::path::PathBuf;

use knacks_core::thumbnail::is_external_url;
use knacks_core::upload::UploadedFile;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Subdirectory for knack photos.
pub const KNACK_PHOTO_DIR: &str = "knacks";

/// Subdirectory for knack idea photos.
pub const IDEA_PHOTO_DIR: &str = "knack_ideas";

#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    url: String,
}

impl MediaStorage {
    pub fn new(root: PathBuf, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            root,
            url: url.trim_end_matches('/').to_string(),
        }
    }

    /// Write `file` under `dir` and return its media-relative path.
    pub async fn save(&self, dir: &str, file: &UploadedFile) -> AppResult<String> {
        let ext = file
            .image_format()
            .and_then(|format| format.extensions_str().first().copied())
            .map(str::to_string)
            .or_else(|| file.extension())
            .unwrap_or_else(|| "bin".to_string());
        let relative = format!("{dir}/{}.{ext}", Uuid::new_v4().simple());

        let dest = self.root.join(&relative);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::InternalError(format!("Failed to create media dir: {e}")))?;
        }
        tokio::fs::write(&dest, &file.bytes)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))?;

        tracing::debug!(path = %relative, size = file.bytes.len(), "Stored upload");
        Ok(relative)
    }

    /// Delete a stored file. Failures are logged, not returned.
    pub async fn remove(&self, relative: &str) {
        if let Err(e) = tokio::fs::remove_file(self.root.join(relative)).await {
            tracing::warn!(path = %relative, error = %e, "Failed to remove stored upload");
        }
    }

    /// Public URL of a stored file.
    ///
    /// Values that are already absolute URLs (e.g. social profile pictures)
    /// are returned unchanged.
    pub fn url_for(&self, stored: &str) -> String {
        if is_external_url(stored) {
            return stored.to_string();
        }
        format!("{}/{}", self.url, stored.trim_start_matches('/'))
    }
}
