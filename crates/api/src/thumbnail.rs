//! URL-based thumbnail derivation.
//!
//! Thumbnails are rendered on demand by an external image service addressed
//! as `{base}/{width}x{height}/{crop}/{image}`. Building the URL is all the
//! API does; no image is decoded in-process.

use knacks_core::error::CoreError;
use knacks_core::thumbnail::{CropMode, ThumbnailService, ThumbnailSize};

/// [`ThumbnailService`] that points at an on-the-fly resizing endpoint.
#[derive(Debug, Clone)]
pub struct UrlThumbnailer {
    base_url: String,
}

impl UrlThumbnailer {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl ThumbnailService for UrlThumbnailer {
    fn derive(
        &self,
        image: &str,
        size: ThumbnailSize,
        crop: CropMode,
    ) -> Result<String, CoreError> {
        let image = image.trim_start_matches('/');
        if image.is_empty() {
            return Err(CoreError::Internal(
                "Cannot derive a thumbnail without a source image".into(),
            ));
        }
        Ok(format!(
            "{}/{size}/{}/{image}",
            self.base_url,
            crop.as_str()
        ))
    }
}
