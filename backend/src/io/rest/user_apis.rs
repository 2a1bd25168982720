//! # REST API for Accounts
//!
//! Registration and login are public and return `{user, token}`. The token is
//! sent back as `Authorization: Bearer <token>` on every other request.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::{ApiResponse, LoginRequest, RegisterRequest};
use tracing::info;

use crate::auth::AuthUser;
use crate::io::rest::{extract::ApiJson, failure};
use crate::AppState;

pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> impl IntoResponse {
    // Never log the password.
    info!("POST /api/users/register - email: {}", request.email);

    match state.user_service.register(&request).await {
        Ok(auth) => (
            StatusCode::CREATED,
            Json(ApiResponse::ok_with_message(auth, "Registration successful")),
        )
            .into_response(),
        Err(e) => failure("register user", e),
    }
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> impl IntoResponse {
    info!("POST /api/users/login - email: {}", request.email);

    match state.user_service.login(&request).await {
        Ok(auth) => (StatusCode::OK, Json(ApiResponse::ok(auth))).into_response(),
        Err(e) => failure("log in", e),
    }
}

pub async fn me(auth: AuthUser) -> impl IntoResponse {
    info!("GET /api/users/me - user {}", auth.id());
    (StatusCode::OK, Json(ApiResponse::ok(auth.user)))
}

pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    info!("POST /api/users/logout - user {}", auth.id());

    match state.user_service.logout(&auth.token).await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::<()>::message("Logged out"))).into_response(),
        Err(e) => failure("log out", e),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::io::rest::test_support::TestApp;

    #[tokio::test]
    async fn test_register_login_me_logout() {
        let app = TestApp::new().await;

        let (status, body) = app
            .send(
                "POST",
                "/api/users/register",
                None,
                Some(json!({"name": "Maria", "email": "maria@example.com", "password": "correct horse"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["data"]["user"].get("password_hash").is_none());

        let (status, body) = app
            .send(
                "POST",
                "/api/users/login",
                None,
                Some(json!({"email": "maria@example.com", "password": "correct horse"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["data"]["token"].as_str().unwrap().to_string();

        let (status, body) = app.send("GET", "/api/users/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Maria");

        let (status, _) = app.send("POST", "/api/users/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app.send("GET", "/api/users/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_a_conflict() {
        let app = TestApp::new().await;
        app.register("maria@example.com").await;

        let (status, body) = app
            .send(
                "POST",
                "/api/users/register",
                None,
                Some(json!({"name": "Maria", "email": "maria@example.com", "password": "another one"})),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Email already registered");
    }

    #[tokio::test]
    async fn test_expired_token_is_unauthorized() {
        let app = TestApp::new().await;
        let token = app.register("maria@example.com").await;

        sqlx::query("UPDATE sessions SET expires_at = '2000-01-01T00:00:00.000000Z' WHERE token = ?")
            .bind(&token)
            .execute(app.db.pool())
            .await
            .unwrap();

        let (status, body) = app.send("GET", "/api/users/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Not authenticated");
    }

    #[tokio::test]
    async fn test_bad_credentials_are_unauthorized() {
        let app = TestApp::new().await;
        app.register("maria@example.com").await;

        let (status, body) = app
            .send(
                "POST",
                "/api/users/login",
                None,
                Some(json!({"email": "maria@example.com", "password": "not it at all"})),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid email or password");
    }
}
