//! Knack idea and knack idea image models.

use sqlx::FromRow;
use knacks_core::types::{DbId, Timestamp};

/// A knack idea row joined with its category name.
#[derive(Debug, Clone, FromRow)]
pub struct KnackIdeaRow {
    pub id: DbId,
    pub owner_id: DbId,
    pub category_id: DbId,
    pub name: String,
    pub description: String,
    pub kind: String,
    pub price: f64,
    pub created_at: Timestamp,
    pub modified_at: Timestamp,
    pub category_name: String,
}

/// A row from the `knack_idea_images` table.
#[derive(Debug, Clone, FromRow)]
pub struct KnackIdeaImage {
    pub id: DbId,
    pub knack_idea_id: DbId,
    pub photo: String,
    pub created_at: Timestamp,
}

/// DTO for inserting a knack idea. `owner_id` always comes from the requester.
#[derive(Debug, Clone)]
pub struct CreateKnackIdea {
    pub owner_id: DbId,
    pub category_id: DbId,
    pub name: String,
    pub description: String,
    pub kind: String,
    pub price: f64,
}

/// DTO for updating a knack idea. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateKnackIdea {
    pub category_id: Option<DbId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub price: Option<f64>,
}
