//! Bearer tokens for the knacks API.
//!
//! Identity comes from the external social login; once a user is known they
//! get an HS256 token whose [`Claims`] carry their id and role. Every knack,
//! idea or category write presents it back in the `Authorization` header.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use knacks_core::roles::ROLE_ADMIN;
use knacks_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default token lifetime in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

/// Longest accepted token lifetime: 30 days.
const MAX_ACCESS_EXPIRY_MINS: i64 = 30 * 24 * 60;

/// Payload of an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Id of the user the token was issued to.
    pub sub: DbId,
    pub role: String,
    /// Unix seconds.
    pub exp: i64,
    /// Unix seconds.
    pub iat: i64,
    pub jti: String,
}

impl Claims {
    /// Claims for `user_id` acting as `role`, valid for `ttl` from now.
    pub fn new(user_id: DbId, role: &str, ttl: Duration) -> Self {
        let issued = Utc::now().timestamp();
        Self {
            sub: user_id,
            role: role.to_string(),
            exp: issued + ttl.num_seconds(),
            iat: issued,
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Signing secret and token lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required) and `JWT_ACCESS_EXPIRY_MINS`
    /// (default `60`, at most 30 days).
    ///
    /// # Panics
    ///
    /// At startup, if the secret is missing or empty or the lifetime is
    /// not a positive number of minutes within bounds.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.is_empty(), "JWT_SECRET must be set to a non-empty value");

        let access_token_expiry_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|mins| (1..=MAX_ACCESS_EXPIRY_MINS).contains(mins))
                .unwrap_or_else(|| {
                    panic!(
                        "JWT_ACCESS_EXPIRY_MINS must be between 1 and \
                         {MAX_ACCESS_EXPIRY_MINS}, got '{raw}'"
                    )
                }),
            Err(_) => DEFAULT_ACCESS_EXPIRY_MINS,
        };

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    fn token_ttl(&self) -> Duration {
        Duration::minutes(self.access_token_expiry_mins.clamp(1, MAX_ACCESS_EXPIRY_MINS))
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.secret.as_bytes())
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.as_bytes())
    }
}

/// Sign a token for `user_id` with the configured lifetime.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims::new(user_id, role, config.token_ttl());
    encode(&Header::default(), &claims, &config.encoding_key())
}

/// Check the signature and expiry of `token` and return its claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_required_spec_claims(&["exp", "sub"]);

    decode::<Claims>(token, &config.decoding_key(), &validation).map(|data| data.claims)
}
