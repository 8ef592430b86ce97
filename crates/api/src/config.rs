use std::path::PathBuf;

use knacks_core::social::{DEFAULT_SOCIAL_CODE_TTL_SECS, MAX_SOCIAL_CODE_TTL_SECS};

use crate::auth::jwt::JwtConfig;

/// Default cap on request bodies, which bounds photo uploads.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Where uploaded photos live and how they are addressed.
    pub media: MediaConfig,
    /// Base URL of the thumbnail service.
    pub thumbnail_base_url: String,
    /// Lifetime of one-time social login codes, in seconds.
    pub social_code_ttl_secs: i64,
}

/// Upload storage settings.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Directory uploaded files are written under.
    pub root: PathBuf,
    /// Public URL prefix the directory is served from.
    pub url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                          |
    /// |-------------------------|----------------------------------|
    /// | `HOST`                  | `0.0.0.0`                        |
    /// | `PORT`                  | `3000`                           |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`          |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                             |
    /// | `MAX_UPLOAD_BYTES`      | `10485760`                       |
    /// | `MEDIA_ROOT`            | `./media`                        |
    /// | `MEDIA_URL`             | `/media`                         |
    /// | `THUMBNAIL_BASE_URL`    | `http://localhost:3000/thumbs`   |
    /// | `SOCIAL_CODE_TTL_SECS`  | `600`                            |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let media = MediaConfig {
            root: std::env::var("MEDIA_ROOT")
                .unwrap_or_else(|_| "./media".into())
                .into(),
            url: std::env::var("MEDIA_URL")
                .unwrap_or_else(|_| "/media".into())
                .trim_end_matches('/')
                .to_string(),
        };

        let thumbnail_base_url = std::env::var("THUMBNAIL_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/thumbs".into())
            .trim_end_matches('/')
            .to_string();

        let social_code_ttl_secs = std::env::var("SOCIAL_CODE_TTL_SECS")
            .map(|raw| parse_code_ttl(&raw))
            .unwrap_or(Ok(DEFAULT_SOCIAL_CODE_TTL_SECS))
            .unwrap_or_else(|e| panic!("SOCIAL_CODE_TTL_SECS {e}"));

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            jwt,
            media,
            thumbnail_base_url,
            social_code_ttl_secs,
        }
    }
}

/// Parse a login code lifetime in seconds, bounded to
/// `1..=MAX_SOCIAL_CODE_TTL_SECS`.
fn parse_code_ttl(raw: &str) -> Result<i64, String> {
    let secs: i64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("must be an integer, got '{raw}'"))?;
    if !(1..=MAX_SOCIAL_CODE_TTL_SECS).contains(&secs) {
        return Err(format!(
            "must be between 1 and {MAX_SOCIAL_CODE_TTL_SECS}, got {secs}"
        ));
    }
    Ok(secs)
}
