//! Handlers for knack categories.
//!
//! Reads are public; writes require the `admin` role.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use knacks_core::error::CoreError;
use knacks_core::pagination::{Pagination, CATEGORY_PAGE_SIZE};
use knacks_core::types::DbId;
use knacks_db::models::category::{CreateCategory, UpdateCategory};
use knacks_db::repositories::CategoryRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Category",
        id,
    })
}

fn check(input: &impl Validate) -> AppResult<()> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::field("name", e.to_string())))
}

/// GET /api/v1/categories
///
/// Categories in id order, a fixed 100 per page.
pub async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<impl IntoResponse> {
    let pagination = Pagination::fixed(&params, CATEGORY_PAGE_SIZE);
    let categories =
        CategoryRepo::list(&state.pool, pagination.limit(), pagination.offset()).await?;
    let total = CategoryRepo::count(&state.pool).await?;

    Ok(Json(PaginatedResponse::new(categories, total, pagination)))
}

/// GET /api/v1/categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(DataResponse { data: category }))
}

/// POST /api/v1/categories
pub async fn create_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    check(&input)?;
    let category = CategoryRepo::create(&state.pool, &input).await?;

    tracing::info!(category_id = category.id, user_id = admin.user_id, "Category created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT /api/v1/categories/{id}
pub async fn update_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    check(&input)?;
    let update = UpdateCategory {
        name: Some(input.name),
    };
    let category = CategoryRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(category_id = id, user_id = admin.user_id, "Category updated");

    Ok(Json(DataResponse { data: category }))
}

/// PATCH /api/v1/categories/{id}
pub async fn patch_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<impl IntoResponse> {
    check(&input)?;
    let category = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(category_id = id, user_id = admin.user_id, "Category patched");

    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/categories/{id}
///
/// Knacks and ideas in the category are deleted with it.
pub async fn delete_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !CategoryRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(category_id = id, user_id = admin.user_id, "Category deleted");

    Ok(StatusCode::NO_CONTENT)
}
