use anyhow::Result;
use chrono::{Duration, SecondsFormat, Utc};
use shared::{AuthResponse, LoginRequest, RegisterRequest, User, Validate};
use tracing::{debug, info, warn};

use crate::auth::{generate_token, hash_password, verify_password, DEFAULT_SESSION_TTL_HOURS};
use crate::domain::{new_id, now_timestamp};
use crate::error::{ServiceError, ServiceResult};
use crate::storage::{is_unique_violation, DbConnection, StoredUser, UserRepository};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Accounts and bearer-token sessions.
#[derive(Clone)]
pub struct UserService {
    repository: UserRepository,
    session_ttl: Duration,
}

impl UserService {
    pub fn new(db: DbConnection) -> Self {
        Self::with_session_ttl(db, Duration::hours(DEFAULT_SESSION_TTL_HOURS))
    }

    pub fn with_session_ttl(db: DbConnection, session_ttl: Duration) -> Self {
        Self {
            repository: UserRepository::new(db),
            session_ttl,
        }
    }

    pub async fn register(&self, request: &RegisterRequest) -> ServiceResult<AuthResponse> {
        request.validate()?;
        let email = request.email.trim().to_lowercase();
        info!("Registering user {}", email);

        let stored = StoredUser {
            user: User {
                id: new_id(),
                name: request.name.trim().to_string(),
                email,
                created_at: now_timestamp(),
            },
            password_hash: hash_password(&request.password)?,
        };

        if let Err(e) = self.repository.store_user(&stored).await {
            if is_unique_violation(&e) {
                warn!("Email already registered: {}", stored.user.email);
                return Err(ServiceError::Conflict("Email already registered".to_string()));
            }
            return Err(e.into());
        }

        self.open_session(stored.user).await
    }

    pub async fn login(&self, request: &LoginRequest) -> ServiceResult<AuthResponse> {
        request.validate()?;
        let email = request.email.trim().to_lowercase();

        let Some(stored) = self.repository.find_by_email(&email).await? else {
            warn!("Login for unknown email {}", email);
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };
        if !verify_password(&request.password, &stored.password_hash) {
            warn!("Wrong password for {}", email);
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        self.open_session(stored.user).await
    }

    /// Issues a token valid for the session TTL, first dropping every
    /// session that has already expired.
    async fn open_session(&self, user: User) -> ServiceResult<AuthResponse> {
        let now = Utc::now();
        let created_at = now.to_rfc3339_opts(SecondsFormat::Micros, true);
        let expires_at = (now + self.session_ttl).to_rfc3339_opts(SecondsFormat::Micros, true);

        let pruned = self.repository.delete_expired_sessions(&created_at).await?;
        if pruned > 0 {
            debug!("Pruned {} expired sessions", pruned);
        }

        let token = generate_token();
        self.repository
            .store_session(&token, &user.id, &created_at, &expires_at)
            .await?;
        info!("Opened session for user {}", user.id);
        Ok(AuthResponse { user, token })
    }

    /// The user a bearer token belongs to, if the session is still live.
    pub async fn authenticate(&self, token: &str) -> Result<Option<User>> {
        self.repository.find_session_user(token, &now_timestamp()).await
    }

    pub async fn logout(&self, token: &str) -> ServiceResult<()> {
        self.repository.delete_session(token).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup() -> UserService {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        UserService::new(db)
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Maria".to_string(),
            email: email.to_string(),
            password: "correct horse".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let service = setup().await;
        let registered = service.register(&register_request("Maria@Example.com")).await.unwrap();
        assert_eq!(registered.user.email, "maria@example.com");

        let logged_in = service
            .login(&LoginRequest {
                email: "maria@example.com".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.user.id, registered.user.id);
        assert_ne!(logged_in.token, registered.token);

        let user = service.authenticate(&logged_in.token).await.unwrap().unwrap();
        assert_eq!(user.id, registered.user.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_conflict() {
        let service = setup().await;
        service.register(&register_request("maria@example.com")).await.unwrap();
        let err = service
            .register(&register_request("MARIA@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let service = setup().await;
        service.register(&register_request("maria@example.com")).await.unwrap();
        let err = service
            .login(&LoginRequest {
                email: "maria@example.com".to_string(),
                password: "wrong horse".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected_and_pruned_on_login() {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        let short = UserService::with_session_ttl(db.clone(), Duration::zero());
        let stale = short.register(&register_request("maria@example.com")).await.unwrap();
        assert!(short.authenticate(&stale.token).await.unwrap().is_none());

        let service = UserService::new(db);
        let fresh = service
            .login(&LoginRequest {
                email: "maria@example.com".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap();
        assert!(service.authenticate(&fresh.token).await.unwrap().is_some());
        assert!(!service.repository.delete_session(&stale.token).await.unwrap());
    }

    #[tokio::test]
    async fn test_logout_invalidates_token() {
        let service = setup().await;
        let auth = service.register(&register_request("maria@example.com")).await.unwrap();
        service.logout(&auth.token).await.unwrap();
        assert!(service.authenticate(&auth.token).await.unwrap().is_none());
    }
}
