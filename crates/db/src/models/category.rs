//! Category model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use knacks_core::types::DbId;

/// A row from the `categories` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: DbId,
    pub name: String,
}

/// DTO for creating a category (also used for full updates).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// DTO for partially updating a category.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}
