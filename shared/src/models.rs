//! Records owned by a user, and the inputs that create and patch them.
//!
//! Every record carries `id`, `user_id`, `created_at` and `updated_at`.
//! Timestamps are RFC 3339 strings, the same as in the persisted rows.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::validation::{
    normalize_optional, optional_content, optional_date, optional_positive, optional_text,
    optional_timestamp, require_date, require_positive, require_text, require_timestamp, Validate,
    ValidationError,
};

/// A stored text value did not match any variant of an enum.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid {type_name} value: {value:?}")]
pub struct ParseEnumError {
    pub type_name: &'static str,
    pub value: String,
}

/// Declares a fieldless enum persisted and serialized as a lower-case string.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(ParseEnumError {
                        type_name: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

text_enum!(
    /// Drives which tool set and dashboard content a user sees.
    Stage { Pregnant => "pregnant", Postpartum => "postpartum", Childcare => "childcare" }
);

text_enum!(BabyGender { Boy => "boy", Girl => "girl", Unknown => "unknown" });

text_enum!(
    MetricKind {
        Bmi => "bmi",
        Weight => "weight",
        BloodPressure => "blood_pressure",
        HeartRate => "heart_rate",
        BloodSugar => "blood_sugar",
        Custom => "custom",
    }
);

text_enum!(Trend { Up => "up", Down => "down", Stable => "stable" });

text_enum!(Intensity { Mild => "mild", Moderate => "moderate", Severe => "severe" });

text_enum!(FeedingType { Breast => "breast", Bottle => "bottle", Solid => "solid" });

text_enum!(BreastSide { Left => "left", Right => "right", Both => "both" });

text_enum!(SleepQuality { Poor => "poor", Fair => "fair", Good => "good" });

text_enum!(DiaperType { Wet => "wet", Dirty => "dirty", Mixed => "mixed", Dry => "dry" });

text_enum!(
    /// Tools offered on the dashboard, filtered by [`Stage`].
    Tool {
        KickCounter => "kick_counter",
        ContractionTimer => "contraction_timer",
        HealthTracker => "health_tracker",
        MoodTracker => "mood_tracker",
        SymptomTracker => "symptom_tracker",
        Feeding => "feeding",
        Sleep => "sleep",
        Diapers => "diapers",
        Growth => "growth",
        Vaccinations => "vaccinations",
        DoctorVisits => "doctor_visits",
        Journal => "journal",
    }
);

impl Default for Intensity {
    fn default() -> Self {
        Intensity::Mild
    }
}

impl Stage {
    /// Tools shown for this stage, in dashboard order.
    pub fn tools(&self) -> Vec<Tool> {
        match self {
            Stage::Pregnant => vec![
                Tool::KickCounter,
                Tool::ContractionTimer,
                Tool::HealthTracker,
                Tool::MoodTracker,
                Tool::SymptomTracker,
                Tool::DoctorVisits,
                Tool::Journal,
            ],
            Stage::Postpartum => vec![
                Tool::HealthTracker,
                Tool::MoodTracker,
                Tool::SymptomTracker,
                Tool::Feeding,
                Tool::Sleep,
                Tool::Diapers,
                Tool::DoctorVisits,
                Tool::Journal,
            ],
            Stage::Childcare => vec![
                Tool::Feeding,
                Tool::Sleep,
                Tool::Diapers,
                Tool::Growth,
                Tool::Vaccinations,
                Tool::DoctorVisits,
                Tool::Journal,
            ],
        }
    }
}

/// Bookkeeping fields every record carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMeta {
    pub id: String,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Records addressable by id. The optimistic list swaps placeholder ids
/// for server ids through this.
pub trait Identified {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

macro_rules! impl_identified {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Identified for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn set_id(&mut self, id: String) {
                    self.id = id;
                }
            }
        )+
    };
}

impl_identified!(
    HealthMetric,
    MoodLog,
    SymptomLog,
    FeedingLog,
    SleepLog,
    DiaperLog,
    GrowthRecord,
    VaccinationLog,
    DoctorVisitLog,
    JournalNote,
    JournalAlbum,
    Photo,
    MotherProfile,
);

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub const MIN_PASSWORD_LEN: usize = 8;

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(ValidationError::invalid("email", "must be an email address"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::invalid(
                "password",
                format!("must be at least {} characters", MIN_PASSWORD_LEN),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("email", &self.email)?;
        if self.password.is_empty() {
            return Err(ValidationError::Required("password"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

// ---------------------------------------------------------------------------
// Mother profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotherProfile {
    pub id: String,
    pub user_id: String,
    pub stage: Stage,
    pub baby_name: Option<String>,
    pub baby_gender: Option<BabyGender>,
    pub weeks_pregnant: Option<i64>,
    /// Last menstrual period, `YYYY-MM-DD`.
    pub lmp_date: Option<String>,
    pub baby_birth_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateMotherProfile {
    pub stage: Stage,
    #[serde(default)]
    pub baby_name: Option<String>,
    #[serde(default)]
    pub baby_gender: Option<BabyGender>,
    #[serde(default)]
    pub weeks_pregnant: Option<i64>,
    #[serde(default)]
    pub lmp_date: Option<String>,
    #[serde(default)]
    pub baby_birth_date: Option<String>,
}

/// Reads a present field, `null` included, as `Some`. With `#[serde(default)]`
/// an absent field stays `None`, so a patch can tell "clear" from "keep".
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Optional fields take `Some(None)` (JSON `null`) to clear the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateMotherProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub baby_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub baby_gender: Option<Option<BabyGender>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub weeks_pregnant: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub lmp_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub baby_birth_date: Option<Option<String>>,
}

fn validate_weeks_pregnant(weeks: Option<i64>) -> Result<(), ValidationError> {
    match weeks {
        Some(w) if !(0..=45).contains(&w) => Err(ValidationError::invalid(
            "weeks_pregnant",
            "must be between 0 and 45",
        )),
        _ => Ok(()),
    }
}

impl Validate for CreateMotherProfile {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_text("baby_name", self.baby_name.as_ref())?;
        validate_weeks_pregnant(self.weeks_pregnant)?;
        optional_date("lmp_date", self.lmp_date.as_ref())?;
        optional_date("baby_birth_date", self.baby_birth_date.as_ref())
    }
}

impl Validate for UpdateMotherProfile {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_text("baby_name", self.baby_name.as_ref().and_then(Option::as_ref))?;
        validate_weeks_pregnant(self.weeks_pregnant.flatten())?;
        optional_date("lmp_date", self.lmp_date.as_ref().and_then(Option::as_ref))?;
        optional_date(
            "baby_birth_date",
            self.baby_birth_date.as_ref().and_then(Option::as_ref),
        )
    }
}

impl MotherProfile {
    pub fn build(meta: RecordMeta, input: &CreateMotherProfile) -> Self {
        Self {
            id: meta.id,
            user_id: meta.user_id,
            stage: input.stage,
            baby_name: normalize_optional(input.baby_name.as_ref()),
            baby_gender: input.baby_gender,
            weeks_pregnant: input.weeks_pregnant,
            lmp_date: input.lmp_date.clone(),
            baby_birth_date: input.baby_birth_date.clone(),
            created_at: meta.created_at,
            updated_at: meta.updated_at,
        }
    }

    pub fn apply(&mut self, patch: &UpdateMotherProfile) {
        if let Some(stage) = patch.stage {
            self.stage = stage;
        }
        if let Some(name) = &patch.baby_name {
            self.baby_name = normalize_optional(name.as_ref());
        }
        if let Some(gender) = patch.baby_gender {
            self.baby_gender = gender;
        }
        if let Some(weeks) = patch.weeks_pregnant {
            self.weeks_pregnant = weeks;
        }
        if let Some(lmp) = &patch.lmp_date {
            self.lmp_date = lmp.clone();
        }
        if let Some(birth) = &patch.baby_birth_date {
            self.baby_birth_date = birth.clone();
        }
    }
}

// ---------------------------------------------------------------------------
// Health tracker
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeightUnit {
    #[default]
    Cm,
    M,
    In,
}

/// What the "Add Metric" form submits, keyed by the selected metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "metric", rename_all = "snake_case")]
pub enum MetricReading {
    Bmi {
        weight: f64,
        height: f64,
        #[serde(default)]
        weight_unit: WeightUnit,
        #[serde(default)]
        height_unit: HeightUnit,
    },
    Weight {
        value: f64,
        #[serde(default)]
        unit: WeightUnit,
    },
    BloodPressure {
        systolic: f64,
        diastolic: f64,
    },
    HeartRate {
        bpm: f64,
    },
    BloodSugar {
        mg_dl: f64,
    },
    Custom {
        title: String,
        value: f64,
        unit: String,
    },
}

impl Validate for MetricReading {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            MetricReading::Bmi { weight, height, .. } => {
                require_positive("weight", *weight)?;
                require_positive("height", *height)
            }
            MetricReading::Weight { value, .. } => require_positive("value", *value),
            MetricReading::BloodPressure {
                systolic,
                diastolic,
            } => {
                require_positive("systolic", *systolic)?;
                require_positive("diastolic", *diastolic)
            }
            MetricReading::HeartRate { bpm } => require_positive("bpm", *bpm),
            MetricReading::BloodSugar { mg_dl } => require_positive("mg_dl", *mg_dl),
            MetricReading::Custom { title, value, unit } => {
                require_text("title", title)?;
                require_text("unit", unit)?;
                if !value.is_finite() {
                    return Err(ValidationError::invalid("value", "must be a number"));
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthMetric {
    pub id: String,
    pub user_id: String,
    pub kind: MetricKind,
    pub title: String,
    pub value: f64,
    /// Diastolic pressure for blood pressure readings.
    pub secondary_value: Option<f64>,
    pub unit: String,
    pub trend: Trend,
    /// Status label from the classifier, e.g. "Healthy".
    pub category: String,
    pub notes: Option<String>,
    pub recorded_at: String,
    pub created_at: String,
    pub updated_at: String,
}

impl HealthMetric {
    /// Value as shown on a metric card, e.g. `120/80` or `22.8`.
    pub fn display_value(&self) -> String {
        match self.secondary_value {
            Some(secondary) => format!("{}/{}", self.value, secondary),
            None => format!("{}", self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateHealthMetric {
    /// Overrides the default title for the reading.
    #[serde(default)]
    pub title: Option<String>,
    pub reading: MetricReading,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub recorded_at: Option<String>,
}

impl Validate for CreateHealthMetric {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_text("title", self.title.as_ref())?;
        self.reading.validate()?;
        optional_content("notes", self.notes.as_ref())?;
        optional_timestamp("recorded_at", self.recorded_at.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateHealthMetric {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<String>,
}

impl Validate for UpdateHealthMetric {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_text("title", self.title.as_ref())?;
        if let Some(value) = self.value {
            if !value.is_finite() {
                return Err(ValidationError::invalid("value", "must be a number"));
            }
        }
        optional_positive("secondary_value", self.secondary_value)?;
        optional_text("unit", self.unit.as_ref())?;
        optional_content("notes", self.notes.as_ref())?;
        optional_timestamp("recorded_at", self.recorded_at.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodLog {
    pub id: String,
    pub user_id: String,
    pub mood: String,
    pub notes: Option<String>,
    pub logged_at: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateMoodLog {
    pub mood: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub logged_at: Option<String>,
}

impl Validate for CreateMoodLog {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("mood", &self.mood)?;
        optional_content("notes", self.notes.as_ref())?;
        optional_timestamp("logged_at", self.logged_at.as_ref())
    }
}

/// Mood logs are append-only; only the note can change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateMoodLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Validate for UpdateMoodLog {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_content("notes", self.notes.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomLog {
    pub id: String,
    pub user_id: String,
    pub symptom: String,
    pub intensity: Intensity,
    pub resolved: bool,
    pub notes: Option<String>,
    pub logged_at: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSymptomLog {
    pub symptom: String,
    #[serde(default)]
    pub intensity: Intensity,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub logged_at: Option<String>,
}

impl Validate for CreateSymptomLog {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("symptom", &self.symptom)?;
        optional_content("notes", self.notes.as_ref())?;
        optional_timestamp("logged_at", self.logged_at.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateSymptomLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Intensity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Validate for UpdateSymptomLog {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_text("symptom", self.symptom.as_ref())?;
        optional_content("notes", self.notes.as_ref())
    }
}

// ---------------------------------------------------------------------------
// Baby-care tools
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingLog {
    pub id: String,
    pub user_id: String,
    pub feeding_type: FeedingType,
    pub side: Option<BreastSide>,
    pub amount_ml: Option<f64>,
    pub duration_minutes: Option<i64>,
    pub fed_at: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFeedingLog {
    pub feeding_type: FeedingType,
    #[serde(default)]
    pub side: Option<BreastSide>,
    #[serde(default)]
    pub amount_ml: Option<f64>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    pub fed_at: String,
    #[serde(default)]
    pub notes: Option<String>,
}

fn validate_duration(duration: Option<i64>) -> Result<(), ValidationError> {
    match duration {
        Some(d) if d <= 0 => Err(ValidationError::invalid(
            "duration_minutes",
            "must be a positive number",
        )),
        _ => Ok(()),
    }
}

impl Validate for CreateFeedingLog {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_positive("amount_ml", self.amount_ml)?;
        validate_duration(self.duration_minutes)?;
        require_timestamp("fed_at", &self.fed_at)?;
        optional_content("notes", self.notes.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateFeedingLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feeding_type: Option<FeedingType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<BreastSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_ml: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Validate for UpdateFeedingLog {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_positive("amount_ml", self.amount_ml)?;
        validate_duration(self.duration_minutes)?;
        optional_timestamp("fed_at", self.fed_at.as_ref())?;
        optional_content("notes", self.notes.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepLog {
    pub id: String,
    pub user_id: String,
    pub started_at: String,
    pub ended_at: Option<String>,
    pub quality: Option<SleepQuality>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl SleepLog {
    /// Whole minutes slept, if the sleep has ended and both ends parse.
    pub fn duration_minutes(&self) -> Option<i64> {
        let start = crate::parse_timestamp(&self.started_at)?;
        let end = crate::parse_timestamp(self.ended_at.as_ref()?)?;
        Some((end - start).num_minutes())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSleepLog {
    pub started_at: String,
    #[serde(default)]
    pub ended_at: Option<String>,
    #[serde(default)]
    pub quality: Option<SleepQuality>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn validate_sleep_window(started_at: &str, ended_at: Option<&String>) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (
        crate::parse_timestamp(started_at),
        ended_at.and_then(|e| crate::parse_timestamp(e)),
    ) {
        if end < start {
            return Err(ValidationError::invalid("ended_at", "cannot be before started_at"));
        }
    }
    Ok(())
}

impl Validate for CreateSleepLog {
    fn validate(&self) -> Result<(), ValidationError> {
        require_timestamp("started_at", &self.started_at)?;
        optional_timestamp("ended_at", self.ended_at.as_ref())?;
        validate_sleep_window(&self.started_at, self.ended_at.as_ref())?;
        optional_content("notes", self.notes.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateSleepLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<SleepQuality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Validate for UpdateSleepLog {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_timestamp("started_at", self.started_at.as_ref())?;
        optional_timestamp("ended_at", self.ended_at.as_ref())?;
        optional_content("notes", self.notes.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaperLog {
    pub id: String,
    pub user_id: String,
    pub diaper_type: DiaperType,
    pub changed_at: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDiaperLog {
    pub diaper_type: DiaperType,
    pub changed_at: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Validate for CreateDiaperLog {
    fn validate(&self) -> Result<(), ValidationError> {
        require_timestamp("changed_at", &self.changed_at)?;
        optional_content("notes", self.notes.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateDiaperLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diaper_type: Option<DiaperType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Validate for UpdateDiaperLog {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_timestamp("changed_at", self.changed_at.as_ref())?;
        optional_content("notes", self.notes.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecord {
    pub id: String,
    pub user_id: String,
    pub measured_on: String,
    pub weight_kg: Option<f64>,
    pub length_cm: Option<f64>,
    pub head_circumference_cm: Option<f64>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGrowthRecord {
    pub measured_on: String,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub length_cm: Option<f64>,
    #[serde(default)]
    pub head_circumference_cm: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Validate for CreateGrowthRecord {
    fn validate(&self) -> Result<(), ValidationError> {
        require_date("measured_on", &self.measured_on)?;
        if self.weight_kg.is_none() && self.length_cm.is_none() && self.head_circumference_cm.is_none() {
            return Err(ValidationError::Required("measurement"));
        }
        optional_positive("weight_kg", self.weight_kg)?;
        optional_positive("length_cm", self.length_cm)?;
        optional_positive("head_circumference_cm", self.head_circumference_cm)?;
        optional_content("notes", self.notes.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateGrowthRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_cm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_circumference_cm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Validate for UpdateGrowthRecord {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_date("measured_on", self.measured_on.as_ref())?;
        optional_positive("weight_kg", self.weight_kg)?;
        optional_positive("length_cm", self.length_cm)?;
        optional_positive("head_circumference_cm", self.head_circumference_cm)?;
        optional_content("notes", self.notes.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccinationLog {
    pub id: String,
    pub user_id: String,
    pub vaccine_name: String,
    pub dose: Option<String>,
    pub administered_on: String,
    pub provider: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateVaccinationLog {
    pub vaccine_name: String,
    #[serde(default)]
    pub dose: Option<String>,
    pub administered_on: String,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Validate for CreateVaccinationLog {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("vaccine_name", &self.vaccine_name)?;
        require_date("administered_on", &self.administered_on)?;
        optional_content("notes", self.notes.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateVaccinationLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vaccine_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administered_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Validate for UpdateVaccinationLog {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_text("vaccine_name", self.vaccine_name.as_ref())?;
        optional_date("administered_on", self.administered_on.as_ref())?;
        optional_content("notes", self.notes.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorVisitLog {
    pub id: String,
    pub user_id: String,
    pub visit_date: String,
    pub doctor_name: Option<String>,
    pub reason: String,
    pub notes: Option<String>,
    pub next_visit: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDoctorVisitLog {
    pub visit_date: String,
    #[serde(default)]
    pub doctor_name: Option<String>,
    pub reason: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub next_visit: Option<String>,
}

impl Validate for CreateDoctorVisitLog {
    fn validate(&self) -> Result<(), ValidationError> {
        require_timestamp("visit_date", &self.visit_date)?;
        require_text("reason", &self.reason)?;
        optional_content("notes", self.notes.as_ref())?;
        optional_timestamp("next_visit", self.next_visit.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateDoctorVisitLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_visit: Option<String>,
}

impl Validate for UpdateDoctorVisitLog {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_timestamp("visit_date", self.visit_date.as_ref())?;
        optional_text("reason", self.reason.as_ref())?;
        optional_content("notes", self.notes.as_ref())?;
        optional_timestamp("next_visit", self.next_visit.as_ref())
    }
}

// ---------------------------------------------------------------------------
// Journal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalNote {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub tags: BTreeSet<String>,
    pub mood: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Tags are an unordered set: trimmed, lower-cased, empties dropped.
pub fn normalize_tags<'a>(tags: impl IntoIterator<Item = &'a String>) -> BTreeSet<String> {
    tags.into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateJournalNote {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl Validate for CreateJournalNote {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        optional_content("content", Some(&self.content))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateJournalNote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl Validate for UpdateJournalNote {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_text("title", self.title.as_ref())?;
        optional_content("content", self.content.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalAlbum {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateJournalAlbum {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Validate for CreateJournalAlbum {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        optional_content("description", self.description.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateJournalAlbum {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Validate for UpdateJournalAlbum {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_text("title", self.title.as_ref())?;
        optional_content("description", self.description.as_ref())
    }
}

/// A photo belongs to exactly one album.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub user_id: String,
    pub album_id: String,
    pub url: String,
    pub caption: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePhoto {
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
}

impl Validate for CreatePhoto {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("url", &self.url)?;
        optional_text("caption", self.caption.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumWithPhotos {
    #[serde(flatten)]
    pub album: JournalAlbum,
    pub photos: Vec<Photo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_patch_tells_null_from_absent() {
        let patch: UpdateMotherProfile =
            serde_json::from_str(r#"{"weeks_pregnant": null, "baby_name": "Bunso"}"#).unwrap();
        assert_eq!(patch.weeks_pregnant, Some(None));
        assert_eq!(patch.baby_name, Some(Some("Bunso".to_string())));
        assert_eq!(patch.lmp_date, None);

        let encoded = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            encoded,
            serde_json::json!({"weeks_pregnant": null, "baby_name": "Bunso"})
        );
    }

    #[test]
    fn test_text_enum_round_trip_through_str() {
        for stage in Stage::ALL {
            assert_eq!(stage.as_str().parse::<Stage>().unwrap(), *stage);
        }
        let err = "toddler".parse::<Stage>().unwrap_err();
        assert_eq!(err.type_name, "Stage");
        assert_eq!(err.value, "toddler");
    }

    #[test]
    fn test_enum_serializes_as_text() {
        let json = serde_json::to_string(&MetricKind::BloodPressure).unwrap();
        assert_eq!(json, "\"blood_pressure\"");
        let intensity: Intensity = serde_json::from_str("\"severe\"").unwrap();
        assert_eq!(intensity, Intensity::Severe);
    }

    #[test]
    fn test_metric_reading_is_tagged_by_metric() {
        let reading: MetricReading =
            serde_json::from_str(r#"{"metric":"bmi","weight":62,"height":165}"#).unwrap();
        assert_eq!(
            reading,
            MetricReading::Bmi {
                weight: 62.0,
                height: 165.0,
                weight_unit: WeightUnit::Kg,
                height_unit: HeightUnit::Cm,
            }
        );
    }

    #[test]
    fn test_tags_are_a_normalized_set() {
        let raw = vec![
            "Baby".to_string(),
            " baby ".to_string(),
            "".to_string(),
            "Firsts".to_string(),
        ];
        let tags = normalize_tags(&raw);
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec!["baby", "firsts"]);
    }

    #[test]
    fn test_growth_requires_a_measurement() {
        let input = CreateGrowthRecord {
            measured_on: "2025-04-01".to_string(),
            weight_kg: None,
            length_cm: None,
            head_circumference_cm: None,
            notes: None,
        };
        assert_eq!(input.validate(), Err(ValidationError::Required("measurement")));
    }

    #[test]
    fn test_sleep_cannot_end_before_it_starts() {
        let input = CreateSleepLog {
            started_at: "2025-04-01T21:00:00Z".to_string(),
            ended_at: Some("2025-04-01T20:00:00Z".to_string()),
            quality: None,
            notes: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_stage_tools() {
        assert!(Stage::Pregnant.tools().contains(&Tool::KickCounter));
        assert!(!Stage::Childcare.tools().contains(&Tool::ContractionTimer));
        assert!(Stage::Childcare.tools().contains(&Tool::Vaccinations));
    }

    #[test]
    fn test_register_validation() {
        let mut request = RegisterRequest {
            name: "Maria".to_string(),
            email: "maria@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(request.validate().is_err());
        request.password = "long enough".to_string();
        assert!(request.validate().is_ok());
    }
}
