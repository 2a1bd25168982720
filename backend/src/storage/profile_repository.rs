use anyhow::Result;
use shared::MotherProfile;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::record::{optional_text_enum, text_enum};
use crate::storage::DbConnection;

/// Repository for the one-per-user mother profile
#[derive(Clone)]
pub struct ProfileRepository {
    db: DbConnection,
}

fn profile_from_row(row: &SqliteRow) -> Result<MotherProfile, sqlx::Error> {
    Ok(MotherProfile {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        stage: text_enum(row, "stage")?,
        baby_name: row.try_get("baby_name")?,
        baby_gender: optional_text_enum(row, "baby_gender")?,
        weeks_pregnant: row.try_get("weeks_pregnant")?,
        lmp_date: row.try_get("lmp_date")?,
        baby_birth_date: row.try_get("baby_birth_date")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl ProfileRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Fails with a unique violation if the user already has a profile.
    pub async fn store_profile(&self, profile: &MotherProfile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO mother_profiles (id, user_id, stage, baby_name, baby_gender,
                weeks_pregnant, lmp_date, baby_birth_date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.user_id)
        .bind(profile.stage.as_str())
        .bind(&profile.baby_name)
        .bind(profile.baby_gender.map(|g| g.as_str()))
        .bind(profile.weeks_pregnant)
        .bind(&profile.lmp_date)
        .bind(&profile.baby_birth_date)
        .bind(&profile.created_at)
        .bind(&profile.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn get_by_user(&self, user_id: &str) -> Result<Option<MotherProfile>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, stage, baby_name, baby_gender, weeks_pregnant,
                lmp_date, baby_birth_date, created_at, updated_at
            FROM mother_profiles
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(profile_from_row).transpose()?)
    }

    pub async fn update_profile(&self, profile: &MotherProfile) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE mother_profiles
            SET stage = ?, baby_name = ?, baby_gender = ?, weeks_pregnant = ?,
                lmp_date = ?, baby_birth_date = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(profile.stage.as_str())
        .bind(&profile.baby_name)
        .bind(profile.baby_gender.map(|g| g.as_str()))
        .bind(profile.weeks_pregnant)
        .bind(&profile.lmp_date)
        .bind(&profile.baby_birth_date)
        .bind(&profile.updated_at)
        .bind(&profile.id)
        .bind(&profile.user_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}
