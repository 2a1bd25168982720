//! Table mappings for the per-user record types.

use std::collections::BTreeSet;

use shared::{
    DiaperLog, DoctorVisitLog, FeedingLog, GrowthRecord, HealthMetric, JournalAlbum, JournalNote,
    MoodLog, SleepLog, SymptomLog, VaccinationLog,
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::record::{decode_error, optional_text_enum, text_enum, Record, SqliteQuery};

impl Record for HealthMetric {
    const TABLE: &'static str = "health_metrics";
    const COLUMNS: &'static [&'static str] = &[
        "kind",
        "title",
        "value",
        "secondary_value",
        "unit",
        "trend",
        "category",
        "notes",
        "recorded_at",
    ];
    const ORDER_BY: &'static str = "recorded_at DESC, rowid DESC";

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            kind: text_enum(row, "kind")?,
            title: row.try_get("title")?,
            value: row.try_get("value")?,
            secondary_value: row.try_get("secondary_value")?,
            unit: row.try_get("unit")?,
            trend: text_enum(row, "trend")?,
            category: row.try_get("category")?,
            notes: row.try_get("notes")?,
            recorded_at: row.try_get("recorded_at")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.kind.as_str())
            .bind(&self.title)
            .bind(self.value)
            .bind(self.secondary_value)
            .bind(&self.unit)
            .bind(self.trend.as_str())
            .bind(&self.category)
            .bind(&self.notes)
            .bind(&self.recorded_at)
    }
}

impl Record for MoodLog {
    const TABLE: &'static str = "mood_logs";
    const COLUMNS: &'static [&'static str] = &["mood", "notes", "logged_at"];
    const ORDER_BY: &'static str = "logged_at DESC, rowid DESC";

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            mood: row.try_get("mood")?,
            notes: row.try_get("notes")?,
            logged_at: row.try_get("logged_at")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query.bind(&self.mood).bind(&self.notes).bind(&self.logged_at)
    }
}

impl Record for SymptomLog {
    const TABLE: &'static str = "symptom_logs";
    const COLUMNS: &'static [&'static str] =
        &["symptom", "intensity", "resolved", "notes", "logged_at"];
    const ORDER_BY: &'static str = "logged_at DESC, rowid DESC";

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            symptom: row.try_get("symptom")?,
            intensity: text_enum(row, "intensity")?,
            resolved: row.try_get("resolved")?,
            notes: row.try_get("notes")?,
            logged_at: row.try_get("logged_at")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(&self.symptom)
            .bind(self.intensity.as_str())
            .bind(self.resolved)
            .bind(&self.notes)
            .bind(&self.logged_at)
    }
}

impl Record for FeedingLog {
    const TABLE: &'static str = "feeding_logs";
    const COLUMNS: &'static [&'static str] = &[
        "feeding_type",
        "side",
        "amount_ml",
        "duration_minutes",
        "fed_at",
        "notes",
    ];
    const ORDER_BY: &'static str = "fed_at DESC, rowid DESC";

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            feeding_type: text_enum(row, "feeding_type")?,
            side: optional_text_enum(row, "side")?,
            amount_ml: row.try_get("amount_ml")?,
            duration_minutes: row.try_get("duration_minutes")?,
            fed_at: row.try_get("fed_at")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.feeding_type.as_str())
            .bind(self.side.map(|side| side.as_str()))
            .bind(self.amount_ml)
            .bind(self.duration_minutes)
            .bind(&self.fed_at)
            .bind(&self.notes)
    }
}

impl Record for SleepLog {
    const TABLE: &'static str = "sleep_logs";
    const COLUMNS: &'static [&'static str] = &["started_at", "ended_at", "quality", "notes"];
    const ORDER_BY: &'static str = "started_at DESC, rowid DESC";

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            started_at: row.try_get("started_at")?,
            ended_at: row.try_get("ended_at")?,
            quality: optional_text_enum(row, "quality")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(&self.started_at)
            .bind(&self.ended_at)
            .bind(self.quality.map(|quality| quality.as_str()))
            .bind(&self.notes)
    }
}

impl Record for DiaperLog {
    const TABLE: &'static str = "diaper_logs";
    const COLUMNS: &'static [&'static str] = &["diaper_type", "changed_at", "notes"];
    const ORDER_BY: &'static str = "changed_at DESC, rowid DESC";

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            diaper_type: text_enum(row, "diaper_type")?,
            changed_at: row.try_get("changed_at")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.diaper_type.as_str())
            .bind(&self.changed_at)
            .bind(&self.notes)
    }
}

impl Record for GrowthRecord {
    const TABLE: &'static str = "growth_records";
    const COLUMNS: &'static [&'static str] = &[
        "measured_on",
        "weight_kg",
        "length_cm",
        "head_circumference_cm",
        "notes",
    ];
    const ORDER_BY: &'static str = "measured_on DESC, rowid DESC";

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            measured_on: row.try_get("measured_on")?,
            weight_kg: row.try_get("weight_kg")?,
            length_cm: row.try_get("length_cm")?,
            head_circumference_cm: row.try_get("head_circumference_cm")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(&self.measured_on)
            .bind(self.weight_kg)
            .bind(self.length_cm)
            .bind(self.head_circumference_cm)
            .bind(&self.notes)
    }
}

impl Record for VaccinationLog {
    const TABLE: &'static str = "vaccination_logs";
    const COLUMNS: &'static [&'static str] =
        &["vaccine_name", "dose", "administered_on", "provider", "notes"];
    const ORDER_BY: &'static str = "administered_on DESC, rowid DESC";

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            vaccine_name: row.try_get("vaccine_name")?,
            dose: row.try_get("dose")?,
            administered_on: row.try_get("administered_on")?,
            provider: row.try_get("provider")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(&self.vaccine_name)
            .bind(&self.dose)
            .bind(&self.administered_on)
            .bind(&self.provider)
            .bind(&self.notes)
    }
}

impl Record for DoctorVisitLog {
    const TABLE: &'static str = "doctor_visit_logs";
    const COLUMNS: &'static [&'static str] =
        &["visit_date", "doctor_name", "reason", "notes", "next_visit"];
    const ORDER_BY: &'static str = "visit_date DESC, rowid DESC";

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            visit_date: row.try_get("visit_date")?,
            doctor_name: row.try_get("doctor_name")?,
            reason: row.try_get("reason")?,
            notes: row.try_get("notes")?,
            next_visit: row.try_get("next_visit")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(&self.visit_date)
            .bind(&self.doctor_name)
            .bind(&self.reason)
            .bind(&self.notes)
            .bind(&self.next_visit)
    }
}

impl Record for JournalNote {
    const TABLE: &'static str = "journal_notes";
    const COLUMNS: &'static [&'static str] = &["title", "content", "tags", "mood", "photo_url"];
    const ORDER_BY: &'static str = "created_at DESC, rowid DESC";

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let raw_tags: String = row.try_get("tags")?;
        let tags: BTreeSet<String> =
            serde_json::from_str(&raw_tags).map_err(|e| decode_error("tags", e))?;
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            tags,
            mood: row.try_get("mood")?,
            photo_url: row.try_get("photo_url")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        // Stored as a JSON array in set order.
        let tags = serde_json::Value::from(self.tags.iter().cloned().collect::<Vec<_>>());
        query
            .bind(&self.title)
            .bind(&self.content)
            .bind(tags.to_string())
            .bind(&self.mood)
            .bind(&self.photo_url)
    }
}

impl Record for JournalAlbum {
    const TABLE: &'static str = "journal_albums";
    const COLUMNS: &'static [&'static str] = &["title", "description"];
    const ORDER_BY: &'static str = "created_at DESC, rowid DESC";

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query.bind(&self.title).bind(&self.description)
    }
}
