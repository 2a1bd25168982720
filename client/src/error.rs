use shared::{ApiResponse, ValidationError};

/// Why a client call failed. Cloneable so list state can keep the last error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// No session token; the request was never sent.
    #[error("Not authenticated")]
    NotAuthenticated,
    /// Input rejected locally; the request was never sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The server answered with a non-2xx status or `success: false`.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// HTTP status of a server-side failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Decode(value.to_string())
        } else {
            Self::Network(value.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

/// Folds a client result back into the `{success, data?, error?}` envelope.
pub fn to_envelope<T>(result: ClientResult<T>) -> ApiResponse<T> {
    match result {
        Ok(data) => ApiResponse::ok(data),
        Err(e) => ApiResponse::error(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_keeps_server_message() {
        let err = ClientError::Api {
            status: 404,
            message: "Journal note not found".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Journal note not found");

        let envelope = to_envelope::<()>(Err(err));
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("Journal note not found"));
    }

    #[test]
    fn test_local_errors_have_no_status() {
        assert_eq!(ClientError::NotAuthenticated.status(), None);
        let err = ClientError::from(ValidationError::Required("title"));
        assert_eq!(err.to_string(), "title is required");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_success_envelope() {
        let envelope = to_envelope(Ok(5));
        assert!(envelope.success);
        assert_eq!(envelope.data, Some(5));
    }
}
