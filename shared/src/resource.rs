//! Binds each record type to its REST path and its create/patch inputs.
//!
//! `build` and `apply` are shared by the server (to persist) and the client
//! (to build optimistic placeholders and in-place edits), so both sides agree
//! on what a create or a patch does to a record.

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

use crate::classify::{calculate_trend, categorize, comparable_value, evaluate_reading};
use crate::models::*;
use crate::validation::{normalize_optional, Validate, ValidationError};
use crate::{normalize_timestamp, parse_timestamp};

pub trait Resource:
    Identified + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + Unpin + 'static
{
    type Create: Serialize + DeserializeOwned + Validate + Clone + Debug + Send + Sync + 'static;
    type Update: Serialize + DeserializeOwned + Validate + Clone + Debug + Send + Sync + 'static;

    /// Collection path, e.g. `/api/bbtools/feeding`.
    const PATH: &'static str;
    /// Human-readable name used in messages, e.g. `Feeding log`.
    const LABEL: &'static str;

    fn build(meta: RecordMeta, input: &Self::Create) -> Self;

    /// Applies a partial patch. Fields absent from the patch stay untouched.
    /// On error the record is left unchanged.
    fn apply(&mut self, patch: &Self::Update) -> Result<(), ValidationError>;

    fn user_id(&self) -> &str;
    fn created_at(&self) -> &str;
    fn updated_at(&self) -> &str;
    fn touch(&mut self, updated_at: String);
}

macro_rules! meta_accessors {
    () => {
        fn user_id(&self) -> &str {
            &self.user_id
        }

        fn created_at(&self) -> &str {
            &self.created_at
        }

        fn updated_at(&self) -> &str {
            &self.updated_at
        }

        fn touch(&mut self, updated_at: String) {
            self.updated_at = updated_at;
        }
    };
}

fn set_text(target: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        *target = v.trim().to_string();
    }
}

fn set_optional_text(target: &mut Option<String>, value: &Option<String>) {
    if value.is_some() {
        *target = normalize_optional(value.as_ref());
    }
}

fn set_timestamp(target: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        *target = normalize_timestamp(v);
    }
}

/// Optional timestamp input, normalized, or the fallback as is.
fn timestamp_or(value: &Option<String>, fallback: &str) -> String {
    value
        .as_deref()
        .map(normalize_timestamp)
        .unwrap_or_else(|| fallback.to_string())
}

fn set_copy<T: Copy>(target: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *target = v;
    }
}

fn set_some<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
    if let Some(v) = value {
        *target = Some(v.clone());
    }
}

impl Resource for HealthMetric {
    type Create = CreateHealthMetric;
    type Update = UpdateHealthMetric;

    const PATH: &'static str = "/api/healthtracker/metrics";
    const LABEL: &'static str = "Health metric";

    fn build(meta: RecordMeta, input: &CreateHealthMetric) -> Self {
        let evaluation = evaluate_reading(&input.reading);
        Self {
            id: meta.id,
            user_id: meta.user_id,
            kind: evaluation.kind,
            title: normalize_optional(input.title.as_ref()).unwrap_or(evaluation.title),
            value: evaluation.value,
            secondary_value: evaluation.secondary_value,
            unit: evaluation.unit,
            trend: Trend::Stable,
            category: evaluation.category,
            notes: normalize_optional(input.notes.as_ref()),
            recorded_at: timestamp_or(&input.recorded_at, &meta.created_at),
            created_at: meta.created_at,
            updated_at: meta.updated_at,
        }
    }

    /// A new value recomputes the trend against the old value and
    /// re-classifies the category.
    fn apply(&mut self, patch: &UpdateHealthMetric) -> Result<(), ValidationError> {
        let previous = comparable_value(self.kind, self.value, &self.unit);
        set_text(&mut self.title, &patch.title);
        set_text(&mut self.unit, &patch.unit);
        set_optional_text(&mut self.notes, &patch.notes);
        set_timestamp(&mut self.recorded_at, &patch.recorded_at);
        if patch.value.is_some() || patch.secondary_value.is_some() {
            let value = patch.value.unwrap_or(self.value);
            self.trend = calculate_trend(
                Some(previous),
                comparable_value(self.kind, value, &self.unit),
            );
            self.value = value;
            if patch.secondary_value.is_some() {
                self.secondary_value = patch.secondary_value;
            }
            self.category = categorize(self.kind, self.value, self.secondary_value);
        }
        Ok(())
    }

    meta_accessors!();
}

impl Resource for MoodLog {
    type Create = CreateMoodLog;
    type Update = UpdateMoodLog;

    const PATH: &'static str = "/api/healthtracker/moods";
    const LABEL: &'static str = "Mood log";

    fn build(meta: RecordMeta, input: &CreateMoodLog) -> Self {
        Self {
            id: meta.id,
            user_id: meta.user_id,
            mood: input.mood.trim().to_string(),
            notes: normalize_optional(input.notes.as_ref()),
            logged_at: timestamp_or(&input.logged_at, &meta.created_at),
            created_at: meta.created_at,
            updated_at: meta.updated_at,
        }
    }

    fn apply(&mut self, patch: &UpdateMoodLog) -> Result<(), ValidationError> {
        set_optional_text(&mut self.notes, &patch.notes);
        Ok(())
    }

    meta_accessors!();
}

impl Resource for SymptomLog {
    type Create = CreateSymptomLog;
    type Update = UpdateSymptomLog;

    const PATH: &'static str = "/api/healthtracker/symptoms";
    const LABEL: &'static str = "Symptom log";

    fn build(meta: RecordMeta, input: &CreateSymptomLog) -> Self {
        Self {
            id: meta.id,
            user_id: meta.user_id,
            symptom: input.symptom.trim().to_string(),
            intensity: input.intensity,
            resolved: false,
            notes: normalize_optional(input.notes.as_ref()),
            logged_at: timestamp_or(&input.logged_at, &meta.created_at),
            created_at: meta.created_at,
            updated_at: meta.updated_at,
        }
    }

    fn apply(&mut self, patch: &UpdateSymptomLog) -> Result<(), ValidationError> {
        set_text(&mut self.symptom, &patch.symptom);
        set_copy(&mut self.intensity, patch.intensity);
        set_copy(&mut self.resolved, patch.resolved);
        set_optional_text(&mut self.notes, &patch.notes);
        Ok(())
    }

    meta_accessors!();
}

impl Resource for FeedingLog {
    type Create = CreateFeedingLog;
    type Update = UpdateFeedingLog;

    const PATH: &'static str = "/api/bbtools/feeding";
    const LABEL: &'static str = "Feeding log";

    fn build(meta: RecordMeta, input: &CreateFeedingLog) -> Self {
        Self {
            id: meta.id,
            user_id: meta.user_id,
            feeding_type: input.feeding_type,
            side: input.side,
            amount_ml: input.amount_ml,
            duration_minutes: input.duration_minutes,
            fed_at: normalize_timestamp(&input.fed_at),
            notes: normalize_optional(input.notes.as_ref()),
            created_at: meta.created_at,
            updated_at: meta.updated_at,
        }
    }

    fn apply(&mut self, patch: &UpdateFeedingLog) -> Result<(), ValidationError> {
        set_copy(&mut self.feeding_type, patch.feeding_type);
        set_some(&mut self.side, &patch.side);
        set_some(&mut self.amount_ml, &patch.amount_ml);
        set_some(&mut self.duration_minutes, &patch.duration_minutes);
        set_timestamp(&mut self.fed_at, &patch.fed_at);
        set_optional_text(&mut self.notes, &patch.notes);
        Ok(())
    }

    meta_accessors!();
}

impl Resource for SleepLog {
    type Create = CreateSleepLog;
    type Update = UpdateSleepLog;

    const PATH: &'static str = "/api/bbtools/sleep";
    const LABEL: &'static str = "Sleep log";

    fn build(meta: RecordMeta, input: &CreateSleepLog) -> Self {
        Self {
            id: meta.id,
            user_id: meta.user_id,
            started_at: normalize_timestamp(&input.started_at),
            ended_at: input.ended_at.as_deref().map(normalize_timestamp),
            quality: input.quality,
            notes: normalize_optional(input.notes.as_ref()),
            created_at: meta.created_at,
            updated_at: meta.updated_at,
        }
    }

    fn apply(&mut self, patch: &UpdateSleepLog) -> Result<(), ValidationError> {
        let started_at = timestamp_or(&patch.started_at, &self.started_at);
        let ended_at = match &patch.ended_at {
            Some(end) => Some(normalize_timestamp(end)),
            None => self.ended_at.clone(),
        };
        if let (Some(start), Some(end)) = (
            parse_timestamp(&started_at),
            ended_at.as_deref().and_then(parse_timestamp),
        ) {
            if end < start {
                return Err(ValidationError::invalid("ended_at", "cannot be before started_at"));
            }
        }
        self.started_at = started_at;
        self.ended_at = ended_at;
        set_some(&mut self.quality, &patch.quality);
        set_optional_text(&mut self.notes, &patch.notes);
        Ok(())
    }

    meta_accessors!();
}

impl Resource for DiaperLog {
    type Create = CreateDiaperLog;
    type Update = UpdateDiaperLog;

    const PATH: &'static str = "/api/bbtools/diapers";
    const LABEL: &'static str = "Diaper log";

    fn build(meta: RecordMeta, input: &CreateDiaperLog) -> Self {
        Self {
            id: meta.id,
            user_id: meta.user_id,
            diaper_type: input.diaper_type,
            changed_at: normalize_timestamp(&input.changed_at),
            notes: normalize_optional(input.notes.as_ref()),
            created_at: meta.created_at,
            updated_at: meta.updated_at,
        }
    }

    fn apply(&mut self, patch: &UpdateDiaperLog) -> Result<(), ValidationError> {
        set_copy(&mut self.diaper_type, patch.diaper_type);
        set_timestamp(&mut self.changed_at, &patch.changed_at);
        set_optional_text(&mut self.notes, &patch.notes);
        Ok(())
    }

    meta_accessors!();
}

impl Resource for GrowthRecord {
    type Create = CreateGrowthRecord;
    type Update = UpdateGrowthRecord;

    const PATH: &'static str = "/api/bbtools/growth";
    const LABEL: &'static str = "Growth record";

    fn build(meta: RecordMeta, input: &CreateGrowthRecord) -> Self {
        Self {
            id: meta.id,
            user_id: meta.user_id,
            measured_on: input.measured_on.clone(),
            weight_kg: input.weight_kg,
            length_cm: input.length_cm,
            head_circumference_cm: input.head_circumference_cm,
            notes: normalize_optional(input.notes.as_ref()),
            created_at: meta.created_at,
            updated_at: meta.updated_at,
        }
    }

    fn apply(&mut self, patch: &UpdateGrowthRecord) -> Result<(), ValidationError> {
        if let Some(measured_on) = &patch.measured_on {
            self.measured_on = measured_on.clone();
        }
        set_some(&mut self.weight_kg, &patch.weight_kg);
        set_some(&mut self.length_cm, &patch.length_cm);
        set_some(&mut self.head_circumference_cm, &patch.head_circumference_cm);
        set_optional_text(&mut self.notes, &patch.notes);
        Ok(())
    }

    meta_accessors!();
}

impl Resource for VaccinationLog {
    type Create = CreateVaccinationLog;
    type Update = UpdateVaccinationLog;

    const PATH: &'static str = "/api/bbtools/vaccinations";
    const LABEL: &'static str = "Vaccination log";

    fn build(meta: RecordMeta, input: &CreateVaccinationLog) -> Self {
        Self {
            id: meta.id,
            user_id: meta.user_id,
            vaccine_name: input.vaccine_name.trim().to_string(),
            dose: normalize_optional(input.dose.as_ref()),
            administered_on: input.administered_on.clone(),
            provider: normalize_optional(input.provider.as_ref()),
            notes: normalize_optional(input.notes.as_ref()),
            created_at: meta.created_at,
            updated_at: meta.updated_at,
        }
    }

    fn apply(&mut self, patch: &UpdateVaccinationLog) -> Result<(), ValidationError> {
        set_text(&mut self.vaccine_name, &patch.vaccine_name);
        set_optional_text(&mut self.dose, &patch.dose);
        if let Some(administered_on) = &patch.administered_on {
            self.administered_on = administered_on.clone();
        }
        set_optional_text(&mut self.provider, &patch.provider);
        set_optional_text(&mut self.notes, &patch.notes);
        Ok(())
    }

    meta_accessors!();
}

impl Resource for DoctorVisitLog {
    type Create = CreateDoctorVisitLog;
    type Update = UpdateDoctorVisitLog;

    const PATH: &'static str = "/api/bbtools/doctor-visits";
    const LABEL: &'static str = "Doctor visit";

    fn build(meta: RecordMeta, input: &CreateDoctorVisitLog) -> Self {
        Self {
            id: meta.id,
            user_id: meta.user_id,
            visit_date: normalize_timestamp(&input.visit_date),
            doctor_name: normalize_optional(input.doctor_name.as_ref()),
            reason: input.reason.trim().to_string(),
            notes: normalize_optional(input.notes.as_ref()),
            next_visit: input.next_visit.as_deref().map(normalize_timestamp),
            created_at: meta.created_at,
            updated_at: meta.updated_at,
        }
    }

    fn apply(&mut self, patch: &UpdateDoctorVisitLog) -> Result<(), ValidationError> {
        set_timestamp(&mut self.visit_date, &patch.visit_date);
        set_optional_text(&mut self.doctor_name, &patch.doctor_name);
        set_text(&mut self.reason, &patch.reason);
        set_optional_text(&mut self.notes, &patch.notes);
        if let Some(next_visit) = &patch.next_visit {
            self.next_visit = Some(normalize_timestamp(next_visit));
        }
        Ok(())
    }

    meta_accessors!();
}

impl Resource for JournalNote {
    type Create = CreateJournalNote;
    type Update = UpdateJournalNote;

    const PATH: &'static str = "/api/journal/notes";
    const LABEL: &'static str = "Journal note";

    fn build(meta: RecordMeta, input: &CreateJournalNote) -> Self {
        Self {
            id: meta.id,
            user_id: meta.user_id,
            title: input.title.trim().to_string(),
            content: input.content.clone(),
            tags: normalize_tags(&input.tags),
            mood: normalize_optional(input.mood.as_ref()),
            photo_url: normalize_optional(input.photo_url.as_ref()),
            created_at: meta.created_at,
            updated_at: meta.updated_at,
        }
    }

    fn apply(&mut self, patch: &UpdateJournalNote) -> Result<(), ValidationError> {
        set_text(&mut self.title, &patch.title);
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(tags) = &patch.tags {
            self.tags = normalize_tags(tags);
        }
        set_optional_text(&mut self.mood, &patch.mood);
        set_optional_text(&mut self.photo_url, &patch.photo_url);
        Ok(())
    }

    meta_accessors!();
}

impl Resource for JournalAlbum {
    type Create = CreateJournalAlbum;
    type Update = UpdateJournalAlbum;

    const PATH: &'static str = "/api/journal/albums";
    const LABEL: &'static str = "Album";

    fn build(meta: RecordMeta, input: &CreateJournalAlbum) -> Self {
        Self {
            id: meta.id,
            user_id: meta.user_id,
            title: input.title.trim().to_string(),
            description: normalize_optional(input.description.as_ref()),
            created_at: meta.created_at,
            updated_at: meta.updated_at,
        }
    }

    fn apply(&mut self, patch: &UpdateJournalAlbum) -> Result<(), ValidationError> {
        set_text(&mut self.title, &patch.title);
        set_optional_text(&mut self.description, &patch.description);
        Ok(())
    }

    meta_accessors!();
}
