use axum::routing::get;
use axum::Router;

use crate::handlers::knack;
use crate::state::AppState;

/// Knack routes mounted at `/knacks`.
///
/// ```text
/// GET    /        -> list_knacks
/// POST   /        -> create_knack (multipart)
/// GET    /{id}    -> get_knack
/// PUT    /{id}    -> update_knack (multipart)
/// PATCH  /{id}    -> patch_knack (multipart)
/// DELETE /{id}    -> delete_knack
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(knack::list_knacks).post(knack::create_knack))
        .route(
            "/{id}",
            get(knack::get_knack)
                .put(knack::update_knack)
                .patch(knack::patch_knack)
                .delete(knack::delete_knack),
        )
}
