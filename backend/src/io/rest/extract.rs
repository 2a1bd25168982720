use async_trait::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use shared::ApiResponse;
use tracing::warn;

/// `Json<T>` whose rejection is a 400 envelope instead of plain text.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                let message = rejection.body_text();
                warn!("Rejected request body: {}", message);
                Err((StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(message))).into_response())
            }
        }
    }
}
