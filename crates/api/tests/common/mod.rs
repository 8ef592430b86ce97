#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use knacks_api::auth::jwt::{generate_access_token, JwtConfig};
use knacks_api::config::{MediaConfig, ServerConfig};
use knacks_api::media::MediaStorage;
use knacks_api::router::build_app_router;
use knacks_api::state::AppState;
use knacks_api::thumbnail::UrlThumbnailer;
use knacks_core::roles::{ROLE_ADMIN, ROLE_USER};
use knacks_core::types::DbId;
use knacks_db::models::category::CreateCategory;
use knacks_db::models::user::CreateUser;
use knacks_db::repositories::{CategoryRepo, UserRepo};

/// Base URL the test thumbnailer renders into.
pub const THUMBS: &str = "http://thumbs.test";

/// Minimal byte sequence recognised as a PNG.
pub const PNG_BYTES: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R',
];

const BOUNDARY: &str = "knacks-test-boundary";

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-long-enough".to_string(),
        access_token_expiry_mins: 15,
    }
}

/// Build a test `ServerConfig` writing uploads to a fresh temp directory.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 1024 * 1024,
        jwt: jwt_config(),
        media: MediaConfig {
            root: std::env::temp_dir().join(format!("knacks-test-{}", Uuid::new_v4())),
            url: "/media".to_string(),
        },
        thumbnail_base_url: THUMBS.to_string(),
        social_code_ttl_secs: 600,
    }
}

/// Build the full application router, exactly as `main.rs` does.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_media(pool).0
}

/// Like [`build_test_app`], also returning the media root.
pub fn build_test_app_with_media(pool: PgPool) -> (Router, PathBuf) {
    let config = test_config();
    std::fs::create_dir_all(&config.media.root).unwrap();
    let media_root = config.media.root.clone();

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        thumbnails: Arc::new(UrlThumbnailer::new(THUMBS)),
        media: Arc::new(MediaStorage::new(
            config.media.root.clone(),
            config.media.url.clone(),
        )),
    };

    (build_app_router(state, &config), media_root)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn user_token(user_id: DbId) -> String {
    generate_access_token(user_id, ROLE_USER, &jwt_config()).unwrap()
}

pub fn admin_token(user_id: DbId) -> String {
    generate_access_token(user_id, ROLE_ADMIN, &jwt_config()).unwrap()
}

pub async fn create_user(pool: &PgPool, email: &str, first_name: &str) -> DbId {
    let input = CreateUser {
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        college: Some("MIT".to_string()),
        age: Some(21),
        picture: Some("users/avatar.jpg".to_string()),
        gender: Some("female".to_string()),
    };
    UserRepo::create(pool, &input).await.unwrap().id
}

pub async fn create_category(pool: &PgPool, name: &str) -> DbId {
    CategoryRepo::create(pool, &CreateCategory { name: name.to_string() })
        .await
        .unwrap()
        .id
}

// ---------------------------------------------------------------------------
// Multipart bodies
// ---------------------------------------------------------------------------

/// One part of a multipart test body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, builder(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        builder(Method::GET, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        builder(Method::DELETE, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(
        app,
        builder(method, uri, token)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn send_multipart(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    parts: &[Part<'_>],
) -> Response<Body> {
    send(
        app,
        builder(method, uri, token)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap(),
    )
    .await
}
