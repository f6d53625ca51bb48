use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use reelmate_shared::errors::{AppError, AppResult, ErrorCode};
use reelmate_shared::types::auth::AuthUser;
use reelmate_shared::types::ApiResponse;

use crate::models::{NewUser, User};
use crate::schema::users;
use crate::services::{auth_service, token_service};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    req.validate()
        .map_err(|e| AppError::new(ErrorCode::ValidationError, e.to_string()))?;

    auth_service::validate_password(&req.password)?;

    let password_hash = auth_service::hash_password(&req.password)?;
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let email = req.email.to_lowercase();

    let exists: bool = users::table
        .filter(users::email.eq(&email))
        .count()
        .get_result::<i64>(&mut conn)
        .map(|c| c > 0)
        .unwrap_or(false);

    if exists {
        return Err(AppError::new(ErrorCode::EmailAlreadyExists, "email already registered"));
    }

    // A concurrent duplicate signup trips the unique index instead; the
    // database error arm maps it to the same 400.
    let user: User = diesel::insert_into(users::table)
        .values(&NewUser { email, password_hash })
        .get_result(&mut conn)?;

    let token = token_service::create_access_token(
        user.id,
        &user.email,
        &state.config.jwt_secret,
        state.config.jwt_ttl,
    )?;

    tracing::info!(user_id = %user.id, email = %user.email, "user signed up");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(AuthResponse { user, token })),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let user: User = users::table
        .filter(users::email.eq(req.email.to_lowercase()))
        .first(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::InvalidCredentials, "invalid email or password"))?;

    let valid = auth_service::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(AppError::new(ErrorCode::InvalidCredentials, "invalid email or password"));
    }

    let token = token_service::create_access_token(
        user.id,
        &user.email,
        &state.config.jwt_secret,
        state.config.jwt_ttl,
    )?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(ApiResponse::ok(AuthResponse { user, token })))
}

pub async fn me(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<User>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let record = users::table
        .find(user.id)
        .first::<User>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::UserNotFound, "user not found"))?;

    Ok(Json(ApiResponse::ok(record)))
}
