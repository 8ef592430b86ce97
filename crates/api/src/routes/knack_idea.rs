use axum::routing::get;
use axum::Router;

use crate::handlers::knack_idea;
use crate::state::AppState;

/// Knack idea routes mounted at `/knack_ideas`.
///
/// ```text
/// GET    /        -> list_knack_ideas (newest first)
/// POST   /        -> create_knack_idea (multipart)
/// GET    /{id}    -> get_knack_idea
/// PUT    /{id}    -> update_knack_idea (multipart)
/// PATCH  /{id}    -> patch_knack_idea (multipart)
/// DELETE /{id}    -> delete_knack_idea
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(knack_idea::list_knack_ideas).post(knack_idea::create_knack_idea),
        )
        .route(
            "/{id}",
            get(knack_idea::get_knack_idea)
                .put(knack_idea::update_knack_idea)
                .patch(knack_idea::patch_knack_idea)
                .delete(knack_idea::delete_knack_idea),
        )
}
