pub mod auth;
pub mod health;
pub mod matches;
pub mod movies;
pub mod partner;
pub mod partner_requests;
pub mod swipes;

use reelmate_shared::errors::AppError;

pub async fn not_found() -> AppError {
    AppError::not_found("not found")
}
