//! # REST API for Per-User Records
//!
//! One set of handlers serves every record type. Each route is registered
//! with the concrete type, e.g. `list_records::<FeedingLog>`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::ApiResponse;
use tracing::info;

use crate::auth::AuthUser;
use crate::io::rest::{extract::ApiJson, failure};
use crate::storage::Record;
use crate::AppState;

/// List the caller's records, newest first
pub async fn list_records<R: Record>(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    info!("GET {} - user {}", R::PATH, auth.id());

    match state.records::<R>().list(auth.id()).await {
        Ok(records) => (StatusCode::OK, Json(ApiResponse::ok(records))).into_response(),
        Err(e) => failure(&format!("list {}", R::TABLE), e),
    }
}

pub async fn get_record<R: Record>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("GET {}/{} - user {}", R::PATH, id, auth.id());

    match state.records::<R>().get(auth.id(), &id).await {
        Ok(record) => (StatusCode::OK, Json(ApiResponse::ok(record))).into_response(),
        Err(e) => failure(&format!("get {} {}", R::LABEL, id), e),
    }
}

pub async fn create_record<R: Record>(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(input): ApiJson<R::Create>,
) -> impl IntoResponse {
    info!("POST {} - request: {:?}", R::PATH, input);

    match state.records::<R>().create(auth.id(), &input).await {
        Ok(record) => (
            StatusCode::CREATED,
            Json(ApiResponse::ok_with_message(
                record,
                format!("{} created successfully", R::LABEL),
            )),
        )
            .into_response(),
        Err(e) => failure(&format!("create {}", R::LABEL), e),
    }
}

/// Partial update: fields missing from the body stay as they are
pub async fn update_record<R: Record>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<R::Update>,
) -> impl IntoResponse {
    info!("PATCH {}/{} - request: {:?}", R::PATH, id, patch);

    match state.records::<R>().update(auth.id(), &id, &patch).await {
        Ok(record) => (StatusCode::OK, Json(ApiResponse::ok(record))).into_response(),
        Err(e) => failure(&format!("update {} {}", R::LABEL, id), e),
    }
}

pub async fn delete_record<R: Record>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE {}/{} - user {}", R::PATH, id, auth.id());

    match state.records::<R>().delete(auth.id(), &id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::<()>::message(format!("{} deleted successfully", R::LABEL))),
        )
            .into_response(),
        Err(e) => failure(&format!("delete {} {}", R::LABEL, id), e),
    }
}
