//! Password hashing and the bearer-token extractor.

use anyhow::{anyhow, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shared::{ApiResponse, User};
use tracing::{error, warn};

use crate::AppState;

pub const NOT_AUTHENTICATED: &str = "Not authenticated";

/// How long a session token stays valid after login.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 30;

/// Argon2id hash in PHC string form. The salt travels inside the string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Checks `password` against a stored PHC string. The digest comparison is
/// constant-time; a malformed stored hash never verifies.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("Unreadable password hash: {}", e);
            false
        }
    }
}

pub fn generate_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// The user behind the request's bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub token: String,
}

impl AuthUser {
    pub fn id(&self) -> &str {
        &self.user.id
    }
}

pub struct AuthRejection {
    status: StatusCode,
    message: &'static str,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::error(self.message))).into_response()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let unauthorized = AuthRejection {
            status: StatusCode::UNAUTHORIZED,
            message: NOT_AUTHENTICATED,
        };

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .map(str::to_string);

        let Some(token) = token else {
            warn!("{} {} - missing bearer token", parts.method, parts.uri.path());
            return Err(unauthorized);
        };

        match state.user_service.authenticate(&token).await {
            Ok(Some(user)) => Ok(AuthUser { user, token }),
            Ok(None) => {
                warn!("{} {} - unknown or expired session token", parts.method, parts.uri.path());
                Err(unauthorized)
            }
            Err(e) => {
                error!("Failed to resolve session: {}", e);
                Err(AuthRejection {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Failed to resolve session",
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_hash_verifies_only_the_right_password() {
        let stored = hash_password("hunter22").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(verify_password("hunter22", &stored));
        assert!(!verify_password("hunter23", &stored));

        let again = hash_password("hunter22").unwrap();
        assert_ne!(stored, again);
        assert!(verify_password("hunter22", &again));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("hunter22", ""));
        assert!(!verify_password("hunter22", "not-a-phc-string"));
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer  abc "), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
