//! User model. Users are created by the social-auth flow and only read here.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use knacks_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub college: Option<String>,
    pub age: Option<i32>,
    pub is_online: bool,
    pub picture: Option<String>,
    pub gender: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// First and last name joined by a space, trimmed.
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

/// DTO for inserting a user, used when provisioning accounts from the
/// social-auth flow and in tests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub college: Option<String>,
    pub age: Option<i32>,
    pub picture: Option<String>,
    pub gender: Option<String>,
}

/// Join a first and last name the way the owner display name is shown.
pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{first_name} {last_name}").trim().to_string()
}
