use axum::routing::get;
use axum::Router;

use crate::handlers::social;
use crate::state::AppState;

/// Social auth routes mounted at `/auth`.
///
/// ```text
/// GET /social/{backend}/complete  -> complete_login
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/social/{backend}/complete", get(social::complete_login))
}
