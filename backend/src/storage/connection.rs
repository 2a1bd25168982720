use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use tracing::info;

/// Tables owned by a user, in creation order. Each gets a `user_id` index.
const USER_OWNED_TABLES: &[&str] = &[
    "mother_profiles",
    "health_metrics",
    "mood_logs",
    "symptom_logs",
    "feeding_logs",
    "sleep_logs",
    "diaper_logs",
    "growth_records",
    "vaccination_logs",
    "doctor_visit_logs",
    "journal_notes",
    "journal_albums",
    "photos",
];

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE COLLATE NOCASE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sessions (
        token TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        expires_at TEXT NOT NULL
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions (expires_at);",
    // One profile per user is a storage constraint, not an application check.
    r#"
    CREATE TABLE IF NOT EXISTS mother_profiles (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL UNIQUE REFERENCES users (id) ON DELETE CASCADE,
        stage TEXT NOT NULL,
        baby_name TEXT,
        baby_gender TEXT,
        weeks_pregnant INTEGER,
        lmp_date TEXT,
        baby_birth_date TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS health_metrics (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        kind TEXT NOT NULL,
        title TEXT NOT NULL,
        value REAL NOT NULL,
        secondary_value REAL,
        unit TEXT NOT NULL,
        trend TEXT NOT NULL,
        category TEXT NOT NULL,
        notes TEXT,
        recorded_at TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS mood_logs (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        mood TEXT NOT NULL,
        notes TEXT,
        logged_at TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS symptom_logs (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        symptom TEXT NOT NULL,
        intensity TEXT NOT NULL,
        resolved INTEGER NOT NULL DEFAULT 0,
        notes TEXT,
        logged_at TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS feeding_logs (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        feeding_type TEXT NOT NULL,
        side TEXT,
        amount_ml REAL,
        duration_minutes INTEGER,
        fed_at TEXT NOT NULL,
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sleep_logs (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        started_at TEXT NOT NULL,
        ended_at TEXT,
        quality TEXT,
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS diaper_logs (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        diaper_type TEXT NOT NULL,
        changed_at TEXT NOT NULL,
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS growth_records (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        measured_on TEXT NOT NULL,
        weight_kg REAL,
        length_cm REAL,
        head_circumference_cm REAL,
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS vaccination_logs (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        vaccine_name TEXT NOT NULL,
        dose TEXT,
        administered_on TEXT NOT NULL,
        provider TEXT,
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS doctor_visit_logs (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        visit_date TEXT NOT NULL,
        doctor_name TEXT,
        reason TEXT NOT NULL,
        notes TEXT,
        next_visit TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS journal_notes (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        tags TEXT NOT NULL DEFAULT '[]',
        mood TEXT,
        photo_url TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS journal_albums (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        description TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS photos (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        album_id TEXT NOT NULL REFERENCES journal_albums (id) ON DELETE CASCADE,
        url TEXT NOT NULL,
        caption TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
];

/// DbConnection owns the SQLite pool shared by every repository.
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and set up the schema.
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating database at {}", url);
            Sqlite::create_database(url).await?
        }

        let options = SqliteConnectOptions::from_str(url)?.foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// A private in-memory database, used by tests and throwaway servers.
    ///
    /// The pool holds exactly one connection that never expires; every
    /// connection to `:memory:` would otherwise see its own empty database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(pool).await?;
        }

        for table in USER_OWNED_TABLES {
            let index = format!(
                "CREATE INDEX IF NOT EXISTS idx_{table}_user_id ON {table} (user_id)",
                table = table
            );
            sqlx::query(&index).execute(pool).await?;
        }

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_photos_album_id ON photos (album_id)")
            .execute(pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_schema_creates_every_table() {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");

        let rows = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table'")
            .fetch_all(db.pool())
            .await
            .expect("Failed to list tables");
        let tables: Vec<String> = rows.iter().map(|r| r.get("name")).collect();

        assert!(tables.contains(&"users".to_string()));
        assert!(tables.contains(&"sessions".to_string()));
        for table in USER_OWNED_TABLES {
            assert!(tables.contains(&table.to_string()), "missing table {}", table);
        }
    }

    #[tokio::test]
    async fn test_schema_setup_is_idempotent() {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        DbConnection::setup_schema(db.pool())
            .await
            .expect("Re-running schema setup should succeed");
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("bloombuhay.db");
        let url = format!("sqlite:{}", path.display());

        let _db = DbConnection::new(&url).await.expect("Failed to open file database");
        assert!(path.exists());
    }
}
