pub mod category;
pub mod health;
pub mod knack;
pub mod knack_idea;
pub mod social;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /categories                          category CRUD (writes: admin)
/// /knacks                              knack CRUD + filtered listing
/// /knack_ideas                         knack idea CRUD + filtered listing
/// /auth/social/{backend}/complete      social login callback
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/categories", category::router())
        .nest("/knacks", knack::router())
        .nest("/knack_ideas", knack_idea::router())
        .nest("/auth", social::router())
}
