//! Handlers for knacks.
//!
//! Listing and retrieval are public. Writes take a multipart body and
//! require an authenticated user, who becomes the owner on create.

use std::collections::HashMap;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use knacks_core::error::CoreError;
use knacks_core::listing::ListingQuery;
use knacks_core::pagination::Pagination;
use knacks_core::types::DbId;
use knacks_core::upload::{KnackWriteRequest, ListingFields};
use knacks_db::models::knack::{CreateKnack, KnackRow, UpdateKnack};
use knacks_db::repositories::KnackRepo;

use crate::error::{AppError, AppResult};
use crate::media::KNACK_PHOTO_DIR;
use crate::middleware::auth::AuthUser;
use crate::multipart::read_form;
use crate::presenter::{KnackRecord, Presenter};
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Knack",
        id,
    })
}

fn present(state: &AppState, row: KnackRow) -> AppResult<KnackRecord> {
    Ok(Presenter::from_state(state).knack(row)?)
}

/// GET /api/v1/knacks
///
/// Filtered, paged listing. See [`ListingQuery`] for the accepted parameters.
pub async fn list_knacks(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<impl IntoResponse> {
    let query = ListingQuery::from_params(&params)?;
    let pagination = Pagination::from_params(&params);

    let rows = KnackRepo::list(&state.pool, &query, pagination.limit(), pagination.offset()).await?;
    let total = KnackRepo::count(&state.pool, &query).await?;
    let data = Presenter::from_state(&state).knacks(rows)?;

    Ok(Json(PaginatedResponse::new(data, total, pagination)))
}

/// GET /api/v1/knacks/{id}
pub async fn get_knack(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let row = KnackRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(DataResponse {
        data: present(&state, row)?,
    }))
}

/// POST /api/v1/knacks
///
/// The owner is always the requesting user; an `owner` part is ignored.
pub async fn create_knack(
    auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let request = KnackWriteRequest::from_form(read_form(multipart).await?)?;
    let fields = request.fields.require_complete()?;

    let photo = match &request.photo {
        Some(file) => Some(state.media.save(KNACK_PHOTO_DIR, file).await?),
        None => None,
    };

    let input = CreateKnack {
        owner_id: auth.user_id,
        category_id: fields.category,
        name: fields.name,
        description: fields.description,
        kind: fields.kind,
        price: fields.price,
        photo: photo.clone(),
    };
    let row = match KnackRepo::create(&state.pool, &input).await {
        Ok(row) => row,
        Err(e) => {
            discard_photo(&state, photo.as_deref()).await;
            return Err(e.into());
        }
    };

    tracing::info!(knack_id = row.id, user_id = auth.user_id, "Knack created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: present(&state, row)?,
        }),
    ))
}

/// PUT /api/v1/knacks/{id}
///
/// Full update: every required field must be present. The photo is only
/// replaced when a file is uploaded.
pub async fn update_knack(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let request = KnackWriteRequest::from_form(read_form(multipart).await?)?;
    let fields = request.fields.require_complete()?;
    let update = UpdateKnack {
        category_id: Some(fields.category),
        name: Some(fields.name),
        description: Some(fields.description),
        kind: Some(fields.kind),
        price: Some(fields.price),
        photo: None,
    };

    let row = apply_update(&state, id, update, request).await?;
    tracing::info!(knack_id = id, user_id = auth.user_id, "Knack updated");

    Ok(Json(DataResponse {
        data: present(&state, row)?,
    }))
}

/// PATCH /api/v1/knacks/{id}
///
/// Partial update: absent fields keep their stored values.
pub async fn patch_knack(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let request = KnackWriteRequest::from_form(read_form(multipart).await?)?;
    let update = partial_update(&request.fields);

    let row = apply_update(&state, id, update, request).await?;
    tracing::info!(knack_id = id, user_id = auth.user_id, "Knack patched");

    Ok(Json(DataResponse {
        data: present(&state, row)?,
    }))
}

/// DELETE /api/v1/knacks/{id}
pub async fn delete_knack(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !KnackRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(knack_id = id, user_id = auth.user_id, "Knack deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn partial_update(fields: &ListingFields) -> UpdateKnack {
    UpdateKnack {
        category_id: fields.category,
        name: fields.name.clone(),
        description: fields.description.clone(),
        kind: fields.kind.clone(),
        price: fields.price,
        photo: None,
    }
}

/// Store any uploaded photo, then write `update` to knack `id`.
async fn apply_update(
    state: &AppState,
    id: DbId,
    mut update: UpdateKnack,
    request: KnackWriteRequest,
) -> AppResult<KnackRow> {
    if KnackRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(not_found(id));
    }

    if let Some(file) = &request.photo {
        update.photo = Some(state.media.save(KNACK_PHOTO_DIR, file).await?);
    }

    match KnackRepo::update(&state.pool, id, &update).await {
        Ok(Some(row)) => Ok(row),
        Ok(None) => {
            discard_photo(state, update.photo.as_deref()).await;
            Err(not_found(id))
        }
        Err(e) => {
            discard_photo(state, update.photo.as_deref()).await;
            Err(e.into())
        }
    }
}

/// Remove a just-stored photo whose database write failed.
async fn discard_photo(state: &AppState, photo: Option<&str>) {
    if let Some(path) = photo {
        state.media.remove(path).await;
    }
}
