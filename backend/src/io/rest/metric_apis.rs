//! # REST API for Health Metrics
//!
//! Only creation is special: the reading is classified and the trend is taken
//! against the previous metric of the same kind. Everything else uses the
//! generic record handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::{ApiResponse, CreateHealthMetric};
use tracing::info;

use crate::auth::AuthUser;
use crate::io::rest::{extract::ApiJson, failure};
use crate::AppState;

pub async fn create_metric(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<CreateHealthMetric>,
) -> impl IntoResponse {
    info!("POST /api/healthtracker/metrics - request: {:?}", request);

    match state.metric_service.create_metric(auth.id(), &request).await {
        Ok(metric) => (
            StatusCode::CREATED,
            Json(ApiResponse::ok_with_message(metric, "Health metric created successfully")),
        )
            .into_response(),
        Err(e) => failure("create health metric", e),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::io::rest::test_support::TestApp;

    #[tokio::test]
    async fn test_add_bmi_metric() {
        let app = TestApp::new().await;
        let token = app.register("maria@example.com").await;

        let (status, body) = app
            .send(
                "POST",
                "/api/healthtracker/metrics",
                Some(&token),
                Some(json!({"reading": {"metric": "bmi", "weight": 62, "height": 165}})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["kind"], "bmi");
        assert_eq!(body["data"]["value"], 22.8);
        assert_eq!(body["data"]["category"], "Healthy");
        assert_eq!(body["data"]["trend"], "stable");
    }

    #[tokio::test]
    async fn test_patch_recomputes_trend() {
        let app = TestApp::new().await;
        let token = app.register("maria@example.com").await;

        let (_, body) = app
            .send(
                "POST",
                "/api/healthtracker/metrics",
                Some(&token),
                Some(json!({"reading": {"metric": "blood_pressure", "systolic": 118, "diastolic": 76}})),
            )
            .await;
        assert_eq!(body["data"]["category"], "Normal");
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = app
            .send(
                "PATCH",
                &format!("/api/healthtracker/metrics/{}", id),
                Some(&token),
                Some(json!({"value": 142, "secondary_value": 92})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["trend"], "up");
        assert_eq!(body["data"]["category"], "High (Stage 2)");
    }

    #[tokio::test]
    async fn test_unknown_metric_is_rejected() {
        let app = TestApp::new().await;
        let token = app.register("maria@example.com").await;

        let (status, body) = app
            .send(
                "POST",
                "/api/healthtracker/metrics",
                Some(&token),
                Some(json!({"reading": {"metric": "height", "value": 160}})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }
}
