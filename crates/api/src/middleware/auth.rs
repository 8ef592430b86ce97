//! The requesting user, taken from the bearer token.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use knacks_core::error::CoreError;
use knacks_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// User behind a request's `Authorization: Bearer <token>` header.
///
/// Knack and idea handlers take this extractor and record `user_id` as the
/// owner of what they write; an `owner` value in the body is never used.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: String,
    is_admin: bool,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}

/// Pull the token out of a `Bearer` authorization header.
///
/// The scheme name is matched case-insensitively.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Authentication credentials were not provided"))?
        .to_str()
        .map_err(|_| unauthorized("Malformed Authorization header"))?;

    let token = value
        .split_once(' ')
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .unwrap_or_default();
    if token.is_empty() {
        return Err(unauthorized(
            "Expected an Authorization header of the form 'Bearer <token>'",
        ));
    }
    Ok(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Token is invalid or has expired"))?;

        Ok(AuthUser {
            user_id: claims.sub,
            is_admin: claims.is_admin(),
            role: claims.role,
        })
    }
}
