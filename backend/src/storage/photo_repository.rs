use anyhow::Result;
use shared::Photo;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::DbConnection;

/// Repository for album photos
#[derive(Clone)]
pub struct PhotoRepository {
    db: DbConnection,
}

fn photo_from_row(row: &SqliteRow) -> Photo {
    Photo {
        id: row.get("id"),
        user_id: row.get("user_id"),
        album_id: row.get("album_id"),
        url: row.get("url"),
        caption: row.get("caption"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl PhotoRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn store_photo(&self, photo: &Photo) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO photos (id, user_id, album_id, url, caption, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&photo.id)
        .bind(&photo.user_id)
        .bind(&photo.album_id)
        .bind(&photo.url)
        .bind(&photo.caption)
        .bind(&photo.created_at)
        .bind(&photo.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Photos of one album, newest first.
    pub async fn list_for_album(&self, user_id: &str, album_id: &str) -> Result<Vec<Photo>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, album_id, url, caption, created_at, updated_at
            FROM photos
            WHERE user_id = ? AND album_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(user_id)
        .bind(album_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(photo_from_row).collect())
    }

    pub async fn delete_photo(&self, user_id: &str, photo_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM photos WHERE id = ? AND user_id = ?")
            .bind(photo_id)
            .bind(user_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns the number of photos removed.
    pub async fn delete_for_album(&self, user_id: &str, album_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM photos WHERE user_id = ? AND album_id = ?")
            .bind(user_id)
            .bind(album_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected())
    }
}
