//! Integration tests for knack idea writes that attach images.
//!
//! An idea and its images are written together: a failing image insert
//! must leave neither the idea row nor any earlier image behind.

use sqlx::PgPool;
use knacks_core::types::DbId;
use knacks_db::models::category::CreateCategory;
use knacks_db::models::knack_idea::{CreateKnackIdea, UpdateKnackIdea};
use knacks_db::models::user::CreateUser;
use knacks_db::repositories::{CategoryRepo, KnackIdeaImageRepo, KnackIdeaRepo, UserRepo};

/// Postgres rejects NUL bytes in text columns, so this path fails to insert.
const UNSTORABLE_PHOTO: &str = "knack_ideas/bad\0.png";

async fn seed(pool: &PgPool) -> CreateKnackIdea {
    let owner = UserRepo::create(
        pool,
        &CreateUser {
            email: "ida@test.com".to_string(),
            first_name: "Ida".to_string(),
            last_name: "Idea".to_string(),
            college: None,
            age: None,
            picture: None,
            gender: None,
        },
    )
    .await
    .unwrap();
    let category = CategoryRepo::create(pool, &CreateCategory { name: "Music".to_string() })
        .await
        .unwrap();

    CreateKnackIdea {
        owner_id: owner.id,
        category_id: category.id,
        name: "Jam night".to_string(),
        description: String::new(),
        kind: "idea".to_string(),
        price: 5.0,
    }
}

async fn idea_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM knack_ideas")
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn image_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM knack_idea_images")
        .fetch_one(pool)
        .await
        .unwrap()
}

fn paths(values: &[&str]) -> Vec<String> {
    values.iter().map(|p| p.to_string()).collect()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_attaches_images_in_order(pool: PgPool) {
    let input = seed(&pool).await;

    let idea = KnackIdeaRepo::create_with_images(
        &pool,
        &input,
        &paths(&["knack_ideas/a.png", "knack_ideas/b.png"]),
    )
    .await
    .unwrap();

    let images = KnackIdeaImageRepo::list_by_idea(&pool, idea.id).await.unwrap();
    let photos: Vec<&str> = images.iter().map(|i| i.photo.as_str()).collect();
    assert_eq!(photos, vec!["knack_ideas/a.png", "knack_ideas/b.png"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_failed_image_insert_rolls_back_create(pool: PgPool) {
    let input = seed(&pool).await;

    let result = KnackIdeaRepo::create_with_images(
        &pool,
        &input,
        &paths(&["knack_ideas/a.png", UNSTORABLE_PHOTO]),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(idea_count(&pool).await, 0);
    assert_eq!(image_count(&pool).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_failed_image_insert_rolls_back_update(pool: PgPool) {
    let input = seed(&pool).await;
    let idea = KnackIdeaRepo::create(&pool, &input).await.unwrap();

    let update = UpdateKnackIdea {
        name: Some("Renamed".to_string()),
        ..Default::default()
    };
    let result = KnackIdeaRepo::update_with_images(
        &pool,
        idea.id,
        &update,
        &paths(&["knack_ideas/a.png", UNSTORABLE_PHOTO]),
    )
    .await;
    assert!(result.is_err());

    let stored = KnackIdeaRepo::find_by_id(&pool, idea.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Jam night");
    assert_eq!(image_count(&pool).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_of_missing_idea_writes_nothing(pool: PgPool) {
    seed(&pool).await;
    let missing: DbId = 9999;

    let result = KnackIdeaRepo::update_with_images(
        &pool,
        missing,
        &UpdateKnackIdea::default(),
        &paths(&["knack_ideas/a.png"]),
    )
    .await
    .unwrap();

    assert!(result.is_none());
    assert_eq!(image_count(&pool).await, 0);
}
