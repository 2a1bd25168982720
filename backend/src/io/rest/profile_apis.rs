//! # REST API for the Mother Profile

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::{ApiResponse, CreateMotherProfile, UpdateMotherProfile};
use tracing::info;

use crate::auth::AuthUser;
use crate::io::rest::{extract::ApiJson, failure};
use crate::AppState;

pub async fn create_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<CreateMotherProfile>,
) -> impl IntoResponse {
    info!("POST /api/mother-profiles - request: {:?}", request);

    match state.profile_service.create_profile(auth.id(), &request).await {
        Ok(profile) => (
            StatusCode::CREATED,
            Json(ApiResponse::ok_with_message(profile, "Mother profile created successfully")),
        )
            .into_response(),
        Err(e) => failure("create mother profile", e),
    }
}

pub async fn get_my_profile(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    info!("GET /api/mother-profiles/me - user {}", auth.id());

    match state.profile_service.get_profile(auth.id()).await {
        Ok(profile) => (StatusCode::OK, Json(ApiResponse::ok(profile))).into_response(),
        Err(e) => failure("get mother profile", e),
    }
}

pub async fn update_my_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(patch): ApiJson<UpdateMotherProfile>,
) -> impl IntoResponse {
    info!("PATCH /api/mother-profiles/me - request: {:?}", patch);

    match state.profile_service.update_profile(auth.id(), &patch).await {
        Ok(profile) => (StatusCode::OK, Json(ApiResponse::ok(profile))).into_response(),
        Err(e) => failure("update mother profile", e),
    }
}

/// Stage, pregnancy progress or baby age, and the tools for the stage
pub async fn get_my_summary(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    info!("GET /api/mother-profiles/me/summary - user {}", auth.id());

    match state.profile_service.summary(auth.id()).await {
        Ok(summary) => (StatusCode::OK, Json(ApiResponse::ok(summary))).into_response(),
        Err(e) => failure("summarize mother profile", e),
    }
}
