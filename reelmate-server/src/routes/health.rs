use axum::Json;

use reelmate_shared::types::api::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy("reelmate-server", env!("CARGO_PKG_VERSION")))
}
