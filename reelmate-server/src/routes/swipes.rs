use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use reelmate_shared::errors::{AppError, AppResult, ErrorCode};
use reelmate_shared::types::auth::AuthUser;
use reelmate_shared::types::ApiResponse;

use crate::models::{NewSwipe, Swipe};
use crate::schema::{media, swipes, users};
use crate::services::match_service;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSwipeRequest {
    pub media_id: Option<Uuid>,
    pub liked: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct SwipeResponse {
    #[serde(flatten)]
    pub swipe: Swipe,
    pub matched: bool,
}

#[derive(Debug, Serialize)]
pub struct SwipeWithMedia {
    #[serde(flatten)]
    pub swipe: Swipe,
    pub title: String,
    pub poster_url: Option<String>,
}

/// POST /api/swipes - upsert the swipe, then evaluate a mutual match
/// against the caller's partner.
pub async fn create_swipe(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSwipeRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<SwipeResponse>>)> {
    let media_id = req
        .media_id
        .ok_or_else(|| AppError::new(ErrorCode::ValidationError, "media_id is required"))?;
    let liked = req
        .liked
        .ok_or_else(|| AppError::new(ErrorCode::ValidationError, "liked is required"))?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    // Re-swiping the same item overwrites the previous verdict. An unknown
    // media id trips the FK and maps to 404.
    let swipe: Swipe = diesel::insert_into(swipes::table)
        .values(&NewSwipe {
            user_id: user.id,
            media_id,
            liked,
        })
        .on_conflict((swipes::user_id, swipes::media_id))
        .do_update()
        .set((swipes::liked.eq(liked), swipes::updated_at.eq(Utc::now())))
        .get_result(&mut conn)?;

    let mut matched = false;

    if liked {
        let partner_id: Option<Uuid> = users::table
            .find(user.id)
            .select(users::partner_id)
            .first(&mut conn)?;

        if let Some(partner_id) = partner_id {
            let partner_liked: bool = swipes::table
                .filter(swipes::user_id.eq(partner_id))
                .filter(swipes::media_id.eq(media_id))
                .filter(swipes::liked.eq(true))
                .count()
                .get_result::<i64>(&mut conn)
                .map(|c| c > 0)
                .unwrap_or(false);

            if partner_liked {
                // The swipe is already durable; a lost match record is
                // tolerated, a lost swipe is not.
                match match_service::record_match(&mut conn, media_id, user.id, partner_id) {
                    Ok(created) => matched = created,
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            user_id = %user.id,
                            partner_id = %partner_id,
                            media_id = %media_id,
                            "match creation failed, returning swipe without match flag"
                        );
                    }
                }
            }
        }
    }

    if matched {
        tracing::info!(user_id = %user.id, media_id = %media_id, "mutual match recorded");
    }

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(SwipeResponse { swipe, matched })),
    ))
}

/// GET /api/swipes - the caller's swipe history, newest first
pub async fn list_swipes(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<SwipeWithMedia>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let rows: Vec<(Swipe, String, Option<String>)> = swipes::table
        .inner_join(media::table)
        .filter(swipes::user_id.eq(user.id))
        .select((swipes::all_columns, media::title, media::poster_url))
        .order(swipes::created_at.desc())
        .load(&mut conn)?;

    let out = rows
        .into_iter()
        .map(|(swipe, title, poster_url)| SwipeWithMedia {
            swipe,
            title,
            poster_url,
        })
        .collect();

    Ok(Json(ApiResponse::ok(out)))
}
