//! Handlers for knack ideas.
//!
//! Ideas accept the same listing filters as knacks but are always listed
//! newest first. Every uploaded `photo` part is attached to the idea.

use std::collections::HashMap;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use knacks_core::error::CoreError;
use knacks_core::listing::ListingQuery;
use knacks_core::pagination::Pagination;
use knacks_core::types::DbId;
use knacks_core::upload::{KnackIdeaWriteRequest, UploadedFile};
use knacks_db::models::knack_idea::{CreateKnackIdea, KnackIdeaRow, UpdateKnackIdea};
use knacks_db::repositories::{KnackIdeaImageRepo, KnackIdeaRepo};

use crate::error::{AppError, AppResult};
use crate::media::IDEA_PHOTO_DIR;
use crate::middleware::auth::AuthUser;
use crate::multipart::read_form;
use crate::presenter::{KnackIdeaRecord, Presenter};
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "KnackIdea",
        id,
    })
}

/// Present one idea together with its stored images.
async fn present(state: &AppState, row: KnackIdeaRow) -> AppResult<KnackIdeaRecord> {
    let images = KnackIdeaImageRepo::list_by_idea(&state.pool, row.id).await?;
    Ok(Presenter::from_state(state).knack_idea(row, &images)?)
}

/// Write uploaded photos to media storage, in upload order.
///
/// If any write fails, the files already written are removed again.
async fn store_photos(state: &AppState, photos: &[UploadedFile]) -> AppResult<Vec<String>> {
    let mut stored = Vec::with_capacity(photos.len());
    for file in photos {
        match state.media.save(IDEA_PHOTO_DIR, file).await {
            Ok(path) => stored.push(path),
            Err(e) => {
                discard_photos(state, &stored).await;
                return Err(e);
            }
        }
    }
    Ok(stored)
}

async fn discard_photos(state: &AppState, paths: &[String]) {
    for path in paths {
        state.media.remove(path).await;
    }
}

/// GET /api/v1/knack_ideas
pub async fn list_knack_ideas(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<impl IntoResponse> {
    let query = ListingQuery::from_params(&params)?.newest_first();
    let pagination = Pagination::from_params(&params);

    let rows =
        KnackIdeaRepo::list(&state.pool, &query, pagination.limit(), pagination.offset()).await?;
    let total = KnackIdeaRepo::count(&state.pool, &query).await?;

    let ids: Vec<DbId> = rows.iter().map(|row| row.id).collect();
    let images = KnackIdeaImageRepo::list_for_ideas(&state.pool, &ids).await?;
    let data = Presenter::from_state(&state).knack_ideas(rows, images)?;

    Ok(Json(PaginatedResponse::new(data, total, pagination)))
}

/// GET /api/v1/knack_ideas/{id}
pub async fn get_knack_idea(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let row = KnackIdeaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(DataResponse {
        data: present(&state, row).await?,
    }))
}

/// POST /api/v1/knack_ideas
pub async fn create_knack_idea(
    auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let request = KnackIdeaWriteRequest::from_form(read_form(multipart).await?)?;
    let fields = request.fields.require_complete()?;

    let input = CreateKnackIdea {
        owner_id: auth.user_id,
        category_id: fields.category,
        name: fields.name,
        description: fields.description,
        kind: fields.kind,
        price: fields.price,
    };
    let stored = store_photos(&state, &request.photos).await?;
    let row = match KnackIdeaRepo::create_with_images(&state.pool, &input, &stored).await {
        Ok(row) => row,
        Err(e) => {
            discard_photos(&state, &stored).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        knack_idea_id = row.id,
        user_id = auth.user_id,
        photos = request.photos.len(),
        "Knack idea created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: present(&state, row).await?,
        }),
    ))
}

/// PUT /api/v1/knack_ideas/{id}
pub async fn update_knack_idea(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let request = KnackIdeaWriteRequest::from_form(read_form(multipart).await?)?;
    let fields = request.fields.require_complete()?;
    let update = UpdateKnackIdea {
        category_id: Some(fields.category),
        name: Some(fields.name),
        description: Some(fields.description),
        kind: Some(fields.kind),
        price: Some(fields.price),
    };

    let row = apply_update(&state, id, &update, &request.photos).await?;
    tracing::info!(knack_idea_id = id, user_id = auth.user_id, "Knack idea updated");

    Ok(Json(DataResponse {
        data: present(&state, row).await?,
    }))
}

/// PATCH /api/v1/knack_ideas/{id}
pub async fn patch_knack_idea(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let request = KnackIdeaWriteRequest::from_form(read_form(multipart).await?)?;
    let fields = &request.fields;
    let update = UpdateKnackIdea {
        category_id: fields.category,
        name: fields.name.clone(),
        description: fields.description.clone(),
        kind: fields.kind.clone(),
        price: fields.price,
    };

    let row = apply_update(&state, id, &update, &request.photos).await?;
    tracing::info!(knack_idea_id = id, user_id = auth.user_id, "Knack idea patched");

    Ok(Json(DataResponse {
        data: present(&state, row).await?,
    }))
}

/// DELETE /api/v1/knack_ideas/{id}
pub async fn delete_knack_idea(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !KnackIdeaRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(knack_idea_id = id, user_id = auth.user_id, "Knack idea deleted");

    Ok(StatusCode::NO_CONTENT)
}

async fn apply_update(
    state: &AppState,
    id: DbId,
    update: &UpdateKnackIdea,
    photos: &[UploadedFile],
) -> AppResult<KnackIdeaRow> {
    let stored = store_photos(state, photos).await?;
    match KnackIdeaRepo::update_with_images(&state.pool, id, update, &stored).await {
        Ok(Some(row)) => Ok(row),
        Ok(None) => {
            discard_photos(state, &stored).await;
            Err(not_found(id))
        }
        Err(e) => {
            discard_photos(state, &stored).await;
            Err(e.into())
        }
    }
}
