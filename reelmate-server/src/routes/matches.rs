use axum::extract::{Path, State};
use axum::Json;
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use reelmate_shared::errors::{AppError, AppResult, ErrorCode};
use reelmate_shared::types::auth::AuthUser;
use reelmate_shared::types::ApiResponse;

use crate::models::{Match, Media};
use crate::schema::{matches, media};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MatchWithMedia {
    #[serde(flatten)]
    pub record: Match,
    pub media: Media,
}

/// GET /api/matches - everything the caller has matched on, newest first
pub async fn list_matches(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<MatchWithMedia>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let rows: Vec<(Match, Media)> = matches::table
        .inner_join(media::table)
        .filter(matches::user1_id.eq(user.id).or(matches::user2_id.eq(user.id)))
        .select((matches::all_columns, media::all_columns))
        .order(matches::created_at.desc())
        .load(&mut conn)?;

    let out = rows
        .into_iter()
        .map(|(record, media)| MatchWithMedia { record, media })
        .collect();

    Ok(Json(ApiResponse::ok(out)))
}

/// GET /api/matches/:id - a match is only visible to its two participants
pub async fn get_match(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MatchWithMedia>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let (record, media): (Match, Media) = matches::table
        .inner_join(media::table)
        .filter(matches::id.eq(id))
        .filter(matches::user1_id.eq(user.id).or(matches::user2_id.eq(user.id)))
        .select((matches::all_columns, media::all_columns))
        .first(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::MatchNotFound, "match not found"))?;

    Ok(Json(ApiResponse::ok(MatchWithMedia { record, media })))
}
