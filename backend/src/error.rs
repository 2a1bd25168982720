//! Service errors and their HTTP rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shared::{ApiResponse, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (self.status(), Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServiceError::from(ValidationError::Required("title")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ServiceError::NotFound("Journal note").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ServiceError::Conflict("exists".to_string()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::Storage(anyhow::anyhow!("disk full")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages_carry_detail() {
        assert_eq!(
            ServiceError::NotFound("Journal note").to_string(),
            "Journal note not found"
        );
        assert_eq!(
            ServiceError::Storage(anyhow::anyhow!("disk full")).to_string(),
            "Storage error: disk full"
        );
    }
}
