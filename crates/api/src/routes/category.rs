use axum::routing::get;
use axum::Router;

use crate::handlers::category;
use crate::state::AppState;

/// Category routes mounted at `/categories`.
///
/// ```text
/// GET    /        -> list_categories
/// POST   /        -> create_category (admin only)
/// GET    /{id}    -> get_category
/// PUT    /{id}    -> update_category (admin only)
/// PATCH  /{id}    -> patch_category (admin only)
/// DELETE /{id}    -> delete_category (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(category::list_categories).post(category::create_category),
        )
        .route(
            "/{id}",
            get(category::get_category)
                .put(category::update_category)
                .patch(category::patch_category)
                .delete(category::delete_category),
        )
}
