//! HTTP-level integration tests for `/api/v1/knack_ideas`.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    body_json, build_test_app, build_test_app_with_media, create_category, create_user, get,
    send_multipart, user_token, Part, PNG_BYTES, THUMBS,
};
use sqlx::PgPool;

fn idea_form<'a>(category: &'a str, name: &'a str) -> Vec<Part<'a>> {
    vec![
        Part::Text("category", category),
        Part::Text("name", name),
        Part::Text("type", "idea"),
        Part::Text("price", "0"),
    ]
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_idea_with_photos(pool: PgPool) {
    let owner = create_user(&pool, "ada@test.com", "Ada").await;
    let other = create_user(&pool, "bob@test.com", "Bob").await.to_string();
    let category = create_category(&pool, "Music").await.to_string();

    let mut parts = idea_form(&category, "Jam night");
    parts.push(Part::Text("owner", &other));
    parts.push(Part::File("photo", "one.png", PNG_BYTES));
    parts.push(Part::File("photo", "two.png", PNG_BYTES));

    let response = send_multipart(
        build_test_app(pool),
        Method::POST,
        "/api/v1/knack_ideas",
        Some(&user_token(owner)),
        &parts,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let idea = body_json(response).await["data"].clone();
    assert_eq!(idea["owner"], owner);
    assert_eq!(idea["category_name"], "Music");
    assert_eq!(idea["description"], "");

    let thumbs = idea["thumb_photo"].as_array().unwrap();
    assert_eq!(thumbs.len(), 2);
    for thumb in thumbs {
        let url = thumb.as_str().unwrap();
        assert!(url.starts_with(&format!("{THUMBS}/219x147/center/knack_ideas/")));
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_idea_without_photos_has_empty_thumbs(pool: PgPool) {
    let owner = create_user(&pool, "ada@test.com", "Ada").await;
    let category = create_category(&pool, "Music").await.to_string();
    let token = user_token(owner);
    let app = build_test_app(pool);

    let response = send_multipart(
        app.clone(),
        Method::POST,
        "/api/v1/knack_ideas",
        Some(&token),
        &idea_form(&category, "Jam night"),
    )
    .await;
    let idea = body_json(response).await["data"].clone();
    assert_eq!(idea["thumb_photo"], serde_json::json!([]));

    let response = get(app, &format!("/api/v1/knack_ideas/{}", idea["id"])).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "Jam night");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_ideas_list_newest_first(pool: PgPool) {
    let owner = create_user(&pool, "ada@test.com", "Ada").await;
    let category = create_category(&pool, "Music").await.to_string();
    let token = user_token(owner);
    let app = build_test_app(pool);

    let mut ids = Vec::new();
    for name in ["First", "Second", "Third"] {
        let response = send_multipart(
            app.clone(),
            Method::POST,
            "/api/v1/knack_ideas",
            Some(&token),
            &idea_form(&category, name),
        )
        .await;
        ids.push(body_json(response).await["data"]["id"].as_i64().unwrap());
    }

    // Patching the first idea makes it the most recently modified.
    let response = send_multipart(
        app.clone(),
        Method::PATCH,
        &format!("/api/v1/knack_ideas/{}", ids[0]),
        Some(&token),
        &[Part::File("photo", "late.png", PNG_BYTES)],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let patched = body_json(response).await["data"].clone();
    assert_eq!(patched["thumb_photo"].as_array().unwrap().len(), 1);
    assert_eq!(patched["name"], "First");

    let response = get(app, "/api/v1/knack_ideas").await;
    let json = body_json(response).await;
    let listed: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|idea| idea["id"].as_i64().unwrap())
        .collect();
    assert_eq!(listed, vec![ids[0], ids[2], ids[1]]);
    assert_eq!(json["total"], 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_idea_is_404(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/v1/knack_ideas/4242").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_failed_photo_storage_leaves_no_idea(pool: PgPool) {
    let owner = create_user(&pool, "ada@test.com", "Ada").await;
    let category = create_category(&pool, "Music").await.to_string();
    let token = user_token(owner);
    let (app, media_root) = build_test_app_with_media(pool);

    // A regular file where the idea photo directory should be.
    std::fs::write(media_root.join("knack_ideas"), b"").unwrap();

    let mut parts = idea_form(&category, "Jam night");
    parts.push(Part::File("photo", "one.png", PNG_BYTES));
    let response = send_multipart(
        app.clone(),
        Method::POST,
        "/api/v1/knack_ideas",
        Some(&token),
        &parts,
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(get(app, "/api/v1/knack_ideas").await).await;
    assert_eq!(json["total"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_failed_photo_storage_leaves_idea_unchanged(pool: PgPool) {
    let owner = create_user(&pool, "ada@test.com", "Ada").await;
    let category = create_category(&pool, "Music").await.to_string();
    let token = user_token(owner);
    let (app, media_root) = build_test_app_with_media(pool);

    let response = send_multipart(
        app.clone(),
        Method::POST,
        "/api/v1/knack_ideas",
        Some(&token),
        &idea_form(&category, "Jam night"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let uri = format!("/api/v1/knack_ideas/{}", body_json(response).await["data"]["id"]);

    std::fs::write(media_root.join("knack_ideas"), b"").unwrap();

    let response = send_multipart(
        app.clone(),
        Method::PATCH,
        &uri,
        Some(&token),
        &[Part::Text("name", "Renamed"), Part::File("photo", "one.png", PNG_BYTES)],
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let idea = body_json(get(app, &uri).await).await["data"].clone();
    assert_eq!(idea["name"], "Jam night");
    assert_eq!(idea["thumb_photo"], serde_json::json!([]));
}
