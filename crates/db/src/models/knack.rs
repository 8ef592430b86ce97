//! Knack model.

use sqlx::FromRow;
use knacks_core::types::{DbId, Timestamp};

/// A knack row joined with its category name and owner profile columns.
///
/// This is the shape every knack query returns; the presenter turns it into
/// the output record.
#[derive(Debug, Clone, FromRow)]
pub struct KnackRow {
    pub id: DbId,
    pub owner_id: DbId,
    pub category_id: DbId,
    pub name: String,
    pub description: String,
    pub kind: String,
    pub price: f64,
    pub photo: Option<String>,
    pub video: Option<String>,
    pub created_at: Timestamp,
    pub modified_at: Timestamp,
    pub category_name: String,
    pub owner_first_name: String,
    pub owner_last_name: String,
    pub owner_college: Option<String>,
    pub owner_age: Option<i32>,
    pub owner_online: bool,
    pub owner_picture: Option<String>,
}

/// DTO for inserting a knack. `owner_id` always comes from the requester.
#[derive(Debug, Clone)]
pub struct CreateKnack {
    pub owner_id: DbId,
    pub category_id: DbId,
    pub name: String,
    pub description: String,
    pub kind: String,
    pub price: f64,
    pub photo: Option<String>,
}

/// DTO for updating a knack. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateKnack {
    pub category_id: Option<DbId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub price: Option<f64>,
    pub photo: Option<String>,
}
