//! HTTP-level integration tests for `/api/v1/categories`.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    admin_token, body_json, build_test_app, create_category, create_user, delete_auth, get,
    send_json, user_token,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_categories_is_public_and_paged(pool: PgPool) {
    create_category(&pool, "Music").await;
    create_category(&pool, "Sport").await;

    let response = get(build_test_app(pool), "/api/v1/categories").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["total"], 2);
    assert_eq!(json["page"], 1);
    assert_eq!(json["page_size"], 100);
    assert_eq!(json["data"][0]["name"], "Music");
    assert_eq!(json["data"][1]["name"], "Sport");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_page_size_is_fixed_for_categories(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/v1/categories?page_size=5").await;
    let json = body_json(response).await;
    assert_eq!(json["page_size"], 100);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_creates_category(pool: PgPool) {
    let admin = create_user(&pool, "admin@test.com", "Admin").await;

    let response = send_json(
        build_test_app(pool),
        Method::POST,
        "/api/v1/categories",
        Some(&admin_token(admin)),
        json!({ "name": "Cooking" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Cooking");
    assert!(json["data"]["id"].is_i64());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_category_writes_require_admin(pool: PgPool) {
    let user = create_user(&pool, "user@test.com", "User").await;
    let app = build_test_app(pool);

    let response = send_json(
        app.clone(),
        Method::POST,
        "/api/v1/categories",
        Some(&user_token(user)),
        json!({ "name": "Cooking" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send_json(
        app,
        Method::POST,
        "/api/v1/categories",
        None,
        json!({ "name": "Cooking" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_empty_category_name_is_rejected(pool: PgPool) {
    let admin = create_user(&pool, "admin@test.com", "Admin").await;

    let response = send_json(
        build_test_app(pool),
        Method::POST,
        "/api/v1/categories",
        Some(&admin_token(admin)),
        json!({ "name": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["field"], "name");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_patch_and_delete_category(pool: PgPool) {
    let admin = create_user(&pool, "admin@test.com", "Admin").await;
    let id = create_category(&pool, "Musc").await;
    let token = admin_token(admin);
    let app = build_test_app(pool);
    let uri = format!("/api/v1/categories/{id}");

    let response = send_json(
        app.clone(),
        Method::PATCH,
        &uri,
        Some(&token),
        json!({ "name": "Music" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "Music");

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_unknown_category_is_404(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/v1/categories/9999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}
