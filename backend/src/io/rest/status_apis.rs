use axum::{http::StatusCode, response::IntoResponse, Json};
use shared::{ApiResponse, HealthResponse};

/// Liveness check; needs no token.
pub async fn health() -> impl IntoResponse {
    let body = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    (StatusCode::OK, Json(ApiResponse::ok(body)))
}
