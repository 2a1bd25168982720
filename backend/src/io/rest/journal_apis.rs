//! # REST API for Albums and Photos
//!
//! Album list, create and patch use the generic record handlers. Fetching one
//! album includes its photos, and deleting it removes them.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::{ApiResponse, CreatePhoto};
use tracing::info;

use crate::auth::AuthUser;
use crate::io::rest::{extract::ApiJson, failure};
use crate::AppState;

pub async fn get_album(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(album_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/journal/albums/{} - user {}", album_id, auth.id());

    match state.album_service.get_album(auth.id(), &album_id).await {
        Ok(album) => (StatusCode::OK, Json(ApiResponse::ok(album))).into_response(),
        Err(e) => failure(&format!("get album {}", album_id), e),
    }
}

pub async fn delete_album(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(album_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/journal/albums/{} - user {}", album_id, auth.id());

    match state.album_service.delete_album(auth.id(), &album_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::<()>::message("Album deleted successfully")),
        )
            .into_response(),
        Err(e) => failure(&format!("delete album {}", album_id), e),
    }
}

pub async fn list_photos(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(album_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/journal/albums/{}/photos - user {}", album_id, auth.id());

    match state.album_service.list_photos(auth.id(), &album_id).await {
        Ok(photos) => (StatusCode::OK, Json(ApiResponse::ok(photos))).into_response(),
        Err(e) => failure(&format!("list photos of album {}", album_id), e),
    }
}

pub async fn add_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(album_id): Path<String>,
    ApiJson(request): ApiJson<CreatePhoto>,
) -> impl IntoResponse {
    info!("POST /api/journal/albums/{}/photos - request: {:?}", album_id, request);

    match state.album_service.add_photo(auth.id(), &album_id, &request).await {
        Ok(photo) => (
            StatusCode::CREATED,
            Json(ApiResponse::ok_with_message(photo, "Photo added successfully")),
        )
            .into_response(),
        Err(e) => failure(&format!("add photo to album {}", album_id), e),
    }
}

pub async fn delete_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(photo_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/journal/photos/{} - user {}", photo_id, auth.id());

    match state.album_service.delete_photo(auth.id(), &photo_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::<()>::message("Photo deleted successfully")),
        )
            .into_response(),
        Err(e) => failure(&format!("delete photo {}", photo_id), e),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::io::rest::test_support::TestApp;

    #[tokio::test]
    async fn test_album_with_photos() {
        let app = TestApp::new().await;
        let token = app.register("maria@example.com").await;

        let (status, body) = app
            .send(
                "POST",
                "/api/journal/albums",
                Some(&token),
                Some(json!({"title": "Newborn", "description": "First week"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let album_id = body["data"]["id"].as_str().unwrap().to_string();
        let photos_path = format!("/api/journal/albums/{}/photos", album_id);

        let (status, body) = app
            .send(
                "POST",
                &photos_path,
                Some(&token),
                Some(json!({"url": "https://img.example/1.jpg", "caption": "Sleepy"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let photo_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = app
            .send("GET", &format!("/api/journal/albums/{}", album_id), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["title"], "Newborn");
        assert_eq!(body["data"]["photos"][0]["caption"], "Sleepy");

        let (status, _) = app
            .send("DELETE", &format!("/api/journal/photos/{}", photo_id), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = app.send("GET", &photos_path, Some(&token), None).await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_album_removes_photos() {
        let app = TestApp::new().await;
        let token = app.register("maria@example.com").await;

        let (_, body) = app
            .send("POST", "/api/journal/albums", Some(&token), Some(json!({"title": "Baptism"})))
            .await;
        let album_id = body["data"]["id"].as_str().unwrap().to_string();
        let (_, body) = app
            .send(
                "POST",
                &format!("/api/journal/albums/{}/photos", album_id),
                Some(&token),
                Some(json!({"url": "https://img.example/2.jpg"})),
            )
            .await;
        let photo_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, _) = app
            .send("DELETE", &format!("/api/journal/albums/{}", album_id), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app
            .send("DELETE", &format!("/api/journal/photos/{}", photo_id), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
