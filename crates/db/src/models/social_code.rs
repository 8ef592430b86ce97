//! One-time social login codes.

use serde::Serialize;
use sqlx::FromRow;
use knacks_core::types::{DbId, Timestamp};

/// A row from the `social_auth_codes` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SocialCode {
    pub id: DbId,
    pub email: String,
    pub code: String,
    pub verified: bool,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}
