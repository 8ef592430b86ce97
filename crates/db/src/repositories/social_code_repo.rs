//! Repository for the `social_auth_codes` table.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::social_code::SocialCode;

/// Column list for social_auth_codes queries.
const COLUMNS: &str = "id, email, code, verified, created_at, expires_at";

/// Issues and looks up one-time social login codes.
pub struct SocialCodeRepo;

impl SocialCodeRepo {
    /// Issue a fresh opaque code for `email`, valid for `ttl_secs` seconds.
    pub async fn make_code(
        pool: &PgPool,
        email: &str,
        ttl_secs: i64,
    ) -> Result<SocialCode, sqlx::Error> {
        let expires_at = Duration::try_seconds(ttl_secs)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| {
                sqlx::Error::Configuration(format!("social code TTL out of range: {ttl_secs}s").into())
            })?;
        let code = Uuid::new_v4().simple().to_string();

        let query = format!(
            "INSERT INTO social_auth_codes (email, code, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let issued = sqlx::query_as::<_, SocialCode>(&query)
            .bind(email)
            .bind(&code)
            .bind(expires_at)
            .fetch_one(pool)
            .await?;

        tracing::debug!(code_id = issued.id, "Social login code issued");
        Ok(issued)
    }

    /// Find an unexpired code.
    pub async fn find_valid(pool: &PgPool, code: &str) -> Result<Option<SocialCode>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM social_auth_codes WHERE code = $1 AND expires_at > NOW()"
        );
        sqlx::query_as::<_, SocialCode>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }
}
