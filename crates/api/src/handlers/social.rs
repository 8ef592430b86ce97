//! Social login completion.
//!
//! Once the external OAuth flow has authenticated the user, the browser is
//! sent here. The handler issues a one-time code tied to the user's email
//! and hands it to the client application through cookies.

use axum::extract::{Path, State};
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::StatusCode;
use axum::response::{AppendHeaders, IntoResponse};
use knacks_core::error::CoreError;
use knacks_core::social::{
    SocialBackend, LOGIN_REDIRECT_PATH, SOCIAL_BACKEND_COOKIE, SOCIAL_CODE_COOKIE,
};
use knacks_db::repositories::{SocialCodeRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/auth/social/{backend}/complete
///
/// Responds with a 302 to the client's welcome-profile route, setting the
/// `social_code` and `social_backend` cookies.
pub async fn complete_login(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(backend): Path<String>,
) -> AppResult<impl IntoResponse> {
    let backend = SocialBackend::from_name(&backend)
        .ok_or_else(|| AppError::NotFound(format!("Unknown social backend '{backend}'")))?;

    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "User account is inactive".into(),
        )));
    }

    let code =
        SocialCodeRepo::make_code(&state.pool, &user.email, state.config.social_code_ttl_secs)
            .await?;

    tracing::info!(
        user_id = user.id,
        backend = backend.name(),
        "Social login completed"
    );

    Ok((
        StatusCode::FOUND,
        AppendHeaders([
            (LOCATION, LOGIN_REDIRECT_PATH.to_string()),
            (SET_COOKIE, cookie(SOCIAL_CODE_COOKIE, &code.code)),
            (SET_COOKIE, cookie(SOCIAL_BACKEND_COOKIE, backend.name())),
        ]),
    ))
}

fn cookie(name: &str, value: &str) -> String {
    format!("{name}={value}; Path=/")
}
