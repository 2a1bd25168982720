use anyhow::Result;
use shared::User;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::DbConnection;

/// A user row together with its Argon2 PHC password hash.
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: String,
}

/// Repository for users and their session tokens
#[derive(Clone)]
pub struct UserRepository {
    db: DbConnection,
}

fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        created_at: row.get("created_at"),
    }
}

impl UserRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a new user. Fails with a unique violation if the email is taken.
    pub async fn store_user(&self, stored: &StoredUser) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&stored.user.id)
        .bind(&stored.user.name)
        .bind(&stored.user.email)
        .bind(&stored.password_hash)
        .bind(&stored.user.created_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Emails compare case-insensitively.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| StoredUser {
            user: user_from_row(&r),
            password_hash: r.get("password_hash"),
        }))
    }

    pub async fn store_session(
        &self,
        token: &str,
        user_id: &str,
        created_at: &str,
        expires_at: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, created_at, expires_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(token)
        .bind(user_id)
        .bind(created_at)
        .bind(expires_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// The user a session token belongs to, if the session exists and has
    /// not expired by `now`.
    pub async fn find_session_user(&self, token: &str, now: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT u.id, u.name, u.email, u.created_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = ? AND s.expires_at > ?
            "#,
        )
        .bind(token)
        .bind(now)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Returns false when the token was unknown.
    pub async fn delete_session(&self, token: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Removes every session that expired by `now`. Returns how many went.
    pub async fn delete_expired_sessions(&self, now: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: &str = "2025-05-01T08:00:00.000000Z";
    const LATER: &str = "2025-05-31T08:00:00.000000Z";
    const EARLIER: &str = "2025-04-01T08:00:00.000000Z";

    fn stored(id: &str, email: &str) -> StoredUser {
        StoredUser {
            user: User {
                id: id.to_string(),
                name: "Maria".to_string(),
                email: email.to_string(),
                created_at: NOW.to_string(),
            },
            password_hash: "$argon2id$hash".to_string(),
        }
    }

    async fn setup() -> UserRepository {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        UserRepository::new(db)
    }

    #[tokio::test]
    async fn test_store_and_find_user() {
        let repo = setup().await;
        repo.store_user(&stored("user-1", "maria@example.com")).await.unwrap();

        let found = repo.find_by_email("MARIA@example.com").await.unwrap().unwrap();
        assert_eq!(found.user.id, "user-1");
        assert_eq!(found.password_hash, "$argon2id$hash");
        assert!(repo.find_by_email("ana@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_unique_violation() {
        let repo = setup().await;
        repo.store_user(&stored("user-1", "maria@example.com")).await.unwrap();
        let err = repo
            .store_user(&stored("user-2", "maria@example.com"))
            .await
            .unwrap_err();
        assert!(crate::storage::is_unique_violation(&err));
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let repo = setup().await;
        repo.store_user(&stored("user-1", "maria@example.com")).await.unwrap();

        repo.store_session("token-1", "user-1", NOW, LATER).await.unwrap();
        let user = repo.find_session_user("token-1", NOW).await.unwrap().unwrap();
        assert_eq!(user.email, "maria@example.com");

        assert!(repo.delete_session("token-1").await.unwrap());
        assert!(!repo.delete_session("token-1").await.unwrap());
        assert!(repo.find_session_user("token-1", NOW).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_sessions_are_rejected_and_pruned() {
        let repo = setup().await;
        repo.store_user(&stored("user-1", "maria@example.com")).await.unwrap();
        repo.store_session("old", "user-1", EARLIER, NOW).await.unwrap();
        repo.store_session("fresh", "user-1", NOW, LATER).await.unwrap();

        assert!(repo.find_session_user("old", NOW).await.unwrap().is_none());
        assert!(repo.find_session_user("fresh", NOW).await.unwrap().is_some());

        assert_eq!(repo.delete_expired_sessions(NOW).await.unwrap(), 1);
        assert!(!repo.delete_session("old").await.unwrap());
        assert!(repo.find_session_user("fresh", NOW).await.unwrap().is_some());
    }
}
