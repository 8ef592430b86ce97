//! Thumbnail sizes and the image-derivation collaborator interface.

use std::fmt;

use crate::error::CoreError;

/// Target dimensions of a derived image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSize {
    pub width: u32,
    pub height: u32,
}

impl ThumbnailSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for ThumbnailSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// How the source image is cropped to the target aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropMode {
    Center,
}

impl CropMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CropMode::Center => "center",
        }
    }
}

/// Small owner avatar.
pub const OWNER_PICTURE: ThumbnailSize = ThumbnailSize::new(35, 35);

/// Medium owner avatar.
pub const OWNER_PICTURE_MEDIUM: ThumbnailSize = ThumbnailSize::new(70, 70);

/// Knack card photo.
pub const KNACK_PHOTO: ThumbnailSize = ThumbnailSize::new(400, 220);

/// Knack idea gallery photo.
pub const IDEA_PHOTO: ThumbnailSize = ThumbnailSize::new(219, 147);

/// External service producing a URL to a derived (resized, cropped) image.
///
/// Calls are synchronous and made inline while building a response.
pub trait ThumbnailService: Send + Sync {
    /// Return the URL of `image` resized to `size` using `crop`.
    ///
    /// `image` is the stored media path of the source image.
    fn derive(&self, image: &str, size: ThumbnailSize, crop: CropMode)
        -> Result<String, CoreError>;
}

/// Whether `image` is a full URL (e.g. a social avatar) rather than a
/// stored media path.
pub fn is_external_url(image: &str) -> bool {
    image.starts_with("http://") || image.starts_with("https://")
}

/// Derive a center-cropped thumbnail, or `None` when there is no image.
///
/// External URLs are not ours to resize and are returned unchanged.
pub fn optional_thumbnail(
    service: &dyn ThumbnailService,
    image: Option<&str>,
    size: ThumbnailSize,
) -> Result<Option<String>, CoreError> {
    match image.filter(|path| !path.is_empty()) {
        Some(url) if is_external_url(url) => Ok(Some(url.to_string())),
        Some(path) => service.derive(path, size, CropMode::Center).map(Some),
        None => Ok(None),
    }
}
