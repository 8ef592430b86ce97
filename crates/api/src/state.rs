use std::sync::Arc;

use knacks_core::thumbnail::ThumbnailService;

use crate::config::ServerConfig;
use crate::media::MediaStorage;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: knacks_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Derives thumbnail URLs for photos and profile pictures.
    pub thumbnails: Arc<dyn ThumbnailService>,
    /// Stores uploaded photos and resolves their public URLs.
    pub media: Arc<MediaStorage>,
}
