use axum::extract::{Query, State};
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use reelmate_shared::errors::{AppError, AppResult, ErrorCode};
use reelmate_shared::types::auth::AuthUser;
use reelmate_shared::types::ApiResponse;

use crate::models::User;
use crate::schema::users;
use crate::services::partner_service;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SetPartnerRequest {
    pub partner_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PartnerRemovedResponse {
    pub removed: bool,
}

/// POST /api/users/partner - direct linking without a request. Overwrites
/// any existing link on both sides.
pub async fn set_partner(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetPartnerRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let partner_id = req
        .partner_id
        .ok_or_else(|| AppError::new(ErrorCode::ValidationError, "partner_id is required"))?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let exists: bool = users::table
        .find(partner_id)
        .count()
        .get_result::<i64>(&mut conn)
        .map(|c| c > 0)
        .unwrap_or(false);

    if !exists {
        return Err(AppError::new(ErrorCode::PartnerNotFound, "partner not found"));
    }

    let updated = partner_service::link_partners(&mut conn, user.id, partner_id)?;

    tracing::info!(user_id = %user.id, partner_id = %partner_id, "partners linked directly");

    Ok(Json(ApiResponse::ok(updated)))
}

/// GET /api/users/partner - the linked partner's public profile, or null
pub async fn get_partner(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Option<User>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let partner_id: Option<Uuid> = users::table
        .find(user.id)
        .select(users::partner_id)
        .first(&mut conn)?;

    let Some(partner_id) = partner_id else {
        return Ok(Json(ApiResponse::ok(None)));
    };

    // The reference can go stale if the pointee was deleted.
    let partner = users::table
        .find(partner_id)
        .first::<User>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::PartnerNotFound, "partner not found"))?;

    Ok(Json(ApiResponse::ok(Some(partner))))
}

/// DELETE /api/users/partner - clears both sides of the link
pub async fn remove_partner(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<PartnerRemovedResponse>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let removed = partner_service::unlink_partners(&mut conn, user.id)?;

    if removed {
        tracing::info!(user_id = %user.id, "partner link removed");
    }

    Ok(Json(ApiResponse::ok(PartnerRemovedResponse { removed })))
}

/// GET /api/users/search?email= - exact-match lookup for the linking flow
pub async fn search_user(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<ApiResponse<User>>> {
    let email = params
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::ValidationError, "email is required"))?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let found = users::table
        .filter(users::email.eq(email.to_lowercase()))
        .first::<User>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::UserNotFound, "user not found"))?;

    Ok(Json(ApiResponse::ok(found)))
}
