use axum::extract::{Path, State};
use axum::Json;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use reelmate_shared::errors::{AppError, AppResult, ErrorCode};
use reelmate_shared::types::ApiResponse;

use crate::models::Media;
use crate::schema::media;
use crate::AppState;

/// GET /api/movies - the full swipeable catalog
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<Media>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let items = media::table
        .order((media::created_at.asc(), media::title.asc()))
        .load::<Media>(&mut conn)?;

    Ok(Json(ApiResponse::ok(items)))
}

/// GET /api/movies/:id
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Media>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let item = media::table
        .find(id)
        .first::<Media>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::MediaNotFound, "movie not found"))?;

    Ok(Json(ApiResponse::ok(item)))
}
