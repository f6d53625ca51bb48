use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use reelmate_shared::errors::{AppError, AppResult, ErrorCode};
use reelmate_shared::types::auth::AuthUser;
use reelmate_shared::types::ApiResponse;

use crate::models::{NewPartnerRequest, PartnerRequest, User};
use crate::schema::{partner_requests, users};
use crate::services::partner_service::{
    self, STATUS_ACCEPTED, STATUS_PENDING,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateRequestBody {
    pub recipient_email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RespondBody {
    pub request_id: Option<Uuid>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PartnerRequestView {
    #[serde(flatten)]
    pub request: PartnerRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_email: Option<String>,
}

fn load_emails(
    conn: &mut PgConnection,
    user_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, String>, diesel::result::Error> {
    Ok(users::table
        .filter(users::id.eq_any(&user_ids))
        .select((users::id, users::email))
        .load::<(Uuid, String)>(conn)?
        .into_iter()
        .collect())
}

/// POST /api/users/partner-requests - propose a link, pending the
/// recipient's consent.
pub async fn create_request(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateRequestBody>,
) -> AppResult<(StatusCode, Json<ApiResponse<PartnerRequest>>)> {
    let recipient_email = body
        .recipient_email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::ValidationError, "recipient_email is required"))?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let recipient: User = users::table
        .filter(users::email.eq(recipient_email.to_lowercase()))
        .first(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::UserNotFound, "user not found"))?;

    if recipient.id == user.id {
        return Err(AppError::new(
            ErrorCode::CannotPartnerSelf,
            "cannot send a partner request to yourself",
        ));
    }

    // An active request in either direction blocks a new one; resolved
    // rejections do not.
    let active: Option<PartnerRequest> = partner_requests::table
        .filter(
            partner_requests::requester_id
                .eq(user.id)
                .and(partner_requests::recipient_id.eq(recipient.id))
                .or(partner_requests::requester_id
                    .eq(recipient.id)
                    .and(partner_requests::recipient_id.eq(user.id))),
        )
        .filter(partner_requests::status.eq_any([STATUS_PENDING, STATUS_ACCEPTED]))
        .first::<PartnerRequest>(&mut conn)
        .optional()?;

    if let Some(existing) = active {
        if existing.status == STATUS_ACCEPTED {
            return Err(AppError::new(
                ErrorCode::AlreadyPartnered,
                "these users are already partners",
            ));
        }
        return Err(AppError::new(
            ErrorCode::RequestAlreadyExists,
            "a pending request already exists between these users",
        ));
    }

    // Links created through the direct path leave no request row behind.
    let linked: bool = users::table
        .filter(
            users::id
                .eq(user.id)
                .and(users::partner_id.eq(recipient.id))
                .or(users::id.eq(recipient.id).and(users::partner_id.eq(user.id))),
        )
        .count()
        .get_result::<i64>(&mut conn)
        .map(|c| c > 0)
        .unwrap_or(false);

    if linked {
        return Err(AppError::new(
            ErrorCode::AlreadyPartnered,
            "these users are already partners",
        ));
    }

    // A concurrent duplicate trips the partial unique index on active pairs
    // and maps to 400.
    let request: PartnerRequest = diesel::insert_into(partner_requests::table)
        .values(&NewPartnerRequest {
            requester_id: user.id,
            recipient_id: recipient.id,
            status: STATUS_PENDING.to_string(),
        })
        .get_result(&mut conn)?;

    tracing::info!(
        request_id = %request.id,
        requester_id = %user.id,
        recipient_id = %recipient.id,
        "partner request created"
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(request))))
}

/// GET /api/users/partner-requests - everything sent or received, newest
/// first, with counterpart emails for display.
pub async fn list_requests(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<PartnerRequestView>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let requests: Vec<PartnerRequest> = partner_requests::table
        .filter(
            partner_requests::requester_id
                .eq(user.id)
                .or(partner_requests::recipient_id.eq(user.id)),
        )
        .order(partner_requests::created_at.desc())
        .load(&mut conn)?;

    let mut user_ids: Vec<Uuid> = requests
        .iter()
        .flat_map(|r| [r.requester_id, r.recipient_id])
        .collect();
    user_ids.sort_unstable();
    user_ids.dedup();

    let emails = load_emails(&mut conn, user_ids)?;

    let views = requests
        .into_iter()
        .map(|r| PartnerRequestView {
            requester_email: emails.get(&r.requester_id).cloned(),
            recipient_email: emails.get(&r.recipient_id).cloned(),
            request: r,
        })
        .collect();

    Ok(Json(ApiResponse::ok(views)))
}

/// GET /api/users/partner-requests/pending - awaiting the caller's decision
pub async fn list_pending(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<PartnerRequestView>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let requests: Vec<PartnerRequest> = partner_requests::table
        .filter(partner_requests::recipient_id.eq(user.id))
        .filter(partner_requests::status.eq(STATUS_PENDING))
        .order(partner_requests::created_at.desc())
        .load(&mut conn)?;

    let mut user_ids: Vec<Uuid> = requests.iter().map(|r| r.requester_id).collect();
    user_ids.sort_unstable();
    user_ids.dedup();

    let emails = load_emails(&mut conn, user_ids)?;

    let views = requests
        .into_iter()
        .map(|r| PartnerRequestView {
            requester_email: emails.get(&r.requester_id).cloned(),
            recipient_email: None,
            request: r,
        })
        .collect();

    Ok(Json(ApiResponse::ok(views)))
}

/// POST /api/users/partner-requests/respond - only the recipient of a
/// pending request can resolve it.
pub async fn respond(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<RespondBody>,
) -> AppResult<Json<ApiResponse<PartnerRequestView>>> {
    let request_id = body
        .request_id
        .ok_or_else(|| AppError::new(ErrorCode::ValidationError, "request_id is required"))?;
    let status = body
        .status
        .ok_or_else(|| AppError::new(ErrorCode::ValidationError, "status is required"))?;

    if !partner_service::is_decision(&status) {
        return Err(AppError::new(
            ErrorCode::ValidationError,
            "status must be either \"accepted\" or \"rejected\"",
        ));
    }

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    // A request addressed to someone else is indistinguishable from a
    // missing one.
    let request: PartnerRequest = partner_requests::table
        .find(request_id)
        .filter(partner_requests::recipient_id.eq(user.id))
        .first(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::RequestNotFound, "partner request not found"))?;

    if request.status != STATUS_PENDING {
        return Err(AppError::new(
            ErrorCode::RequestAlreadyResolved,
            "this request has already been processed",
        ));
    }

    let updated = partner_service::resolve_request(&mut conn, &request, &status)?;

    tracing::info!(
        request_id = %updated.id,
        status = %updated.status,
        "partner request resolved"
    );

    let emails = load_emails(&mut conn, vec![updated.requester_id, updated.recipient_id])?;

    let view = PartnerRequestView {
        requester_email: emails.get(&updated.requester_id).cloned(),
        recipient_email: emails.get(&updated.recipient_id).cloned(),
        request: updated,
    };

    Ok(Json(ApiResponse::ok(view)))
}
