//! Threshold classifiers for health readings.
//!
//! All functions here are pure: the same input always yields the same label.
//! The health tracker form, the metric card and the server all call into this
//! module instead of carrying their own copies of the ladders.

use crate::models::{HeightUnit, MetricKind, MetricReading, Trend, WeightUnit};

pub const BMI_UNIT: &str = "kg/m²";
pub const BLOOD_PRESSURE_UNIT: &str = "mmHg";
pub const HEART_RATE_UNIT: &str = "bpm";
pub const BLOOD_SUGAR_UNIT: &str = "mg/dL";

/// Label for readings that have no clinical ladder (plain weight, custom).
pub const TRACKED: &str = "Tracked";

/// Relative change under which a reading counts as unchanged.
pub const STABLE_TOLERANCE: f64 = 0.01;

const LB_PER_KG: f64 = 2.204_622_621_8;
const CM_PER_INCH: f64 = 2.54;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiCategory {
    Underweight,
    Healthy,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Healthy => "Healthy",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BloodPressureCategory {
    Normal,
    Elevated,
    Stage1,
    Stage2,
    Crisis,
}

impl BloodPressureCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BloodPressureCategory::Normal => "Normal",
            BloodPressureCategory::Elevated => "Elevated",
            BloodPressureCategory::Stage1 => "High (Stage 1)",
            BloodPressureCategory::Stage2 => "High (Stage 2)",
            BloodPressureCategory::Crisis => "Hypertensive Crisis",
        }
    }
}

/// Rounds to one decimal place, the precision metric cards display.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn to_kg(weight: f64, unit: WeightUnit) -> f64 {
    match unit {
        WeightUnit::Kg => weight,
        WeightUnit::Lb => weight / LB_PER_KG,
    }
}

pub fn to_cm(height: f64, unit: HeightUnit) -> f64 {
    match unit {
        HeightUnit::Cm => height,
        HeightUnit::M => height * 100.0,
        HeightUnit::In => height * CM_PER_INCH,
    }
}

/// Body-mass index, unrounded.
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let meters = height_cm / 100.0;
    weight_kg / (meters * meters)
}

/// Lower bounds are inclusive: 18.5 is Healthy, 25 is Overweight.
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Healthy
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

pub fn classify_blood_pressure(systolic: f64, diastolic: f64) -> BloodPressureCategory {
    if systolic > 180.0 || diastolic > 120.0 {
        BloodPressureCategory::Crisis
    } else if systolic >= 140.0 || diastolic >= 90.0 {
        BloodPressureCategory::Stage2
    } else if systolic >= 130.0 || diastolic >= 80.0 {
        BloodPressureCategory::Stage1
    } else if systolic >= 120.0 {
        BloodPressureCategory::Elevated
    } else {
        BloodPressureCategory::Normal
    }
}

pub fn classify_heart_rate(bpm: f64) -> &'static str {
    if bpm < 60.0 {
        "Low"
    } else if bpm <= 100.0 {
        "Normal"
    } else {
        "High"
    }
}

/// Fasting blood sugar in mg/dL.
pub fn classify_blood_sugar(mg_dl: f64) -> &'static str {
    if mg_dl < 70.0 {
        "Low"
    } else if mg_dl < 100.0 {
        "Normal"
    } else if mg_dl < 126.0 {
        "Elevated"
    } else {
        "High"
    }
}

/// Direction of change from the previous reading of the same metric.
pub fn calculate_trend(previous: Option<f64>, current: f64) -> Trend {
    let Some(previous) = previous else {
        return Trend::Stable;
    };
    let delta = current - previous;
    let tolerance = previous.abs() * STABLE_TOLERANCE;
    if delta.abs() <= tolerance {
        Trend::Stable
    } else if delta > 0.0 {
        Trend::Up
    } else {
        Trend::Down
    }
}

/// The value a trend compares. Weights compare in kg whatever unit they
/// were entered in; every other kind compares as stored.
pub fn comparable_value(kind: MetricKind, value: f64, unit: &str) -> f64 {
    match kind {
        MetricKind::Weight if unit.trim().eq_ignore_ascii_case("lb") => to_kg(value, WeightUnit::Lb),
        _ => value,
    }
}

/// Status label for an already-computed value of a metric kind.
pub fn categorize(kind: MetricKind, value: f64, secondary_value: Option<f64>) -> String {
    match kind {
        MetricKind::Bmi => classify_bmi(value).label().to_string(),
        MetricKind::BloodPressure => {
            classify_blood_pressure(value, secondary_value.unwrap_or(0.0)).label().to_string()
        }
        MetricKind::HeartRate => classify_heart_rate(value).to_string(),
        MetricKind::BloodSugar => classify_blood_sugar(value).to_string(),
        MetricKind::Weight | MetricKind::Custom => TRACKED.to_string(),
    }
}

/// A reading resolved into the fields a health metric stores.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricEvaluation {
    pub kind: MetricKind,
    pub title: String,
    pub value: f64,
    pub secondary_value: Option<f64>,
    pub unit: String,
    pub category: String,
}

pub fn evaluate_reading(reading: &MetricReading) -> MetricEvaluation {
    match reading {
        MetricReading::Bmi {
            weight,
            height,
            weight_unit,
            height_unit,
        } => {
            let value = round1(bmi(to_kg(*weight, *weight_unit), to_cm(*height, *height_unit)));
            MetricEvaluation {
                kind: MetricKind::Bmi,
                title: "BMI".to_string(),
                value,
                secondary_value: None,
                unit: BMI_UNIT.to_string(),
                category: categorize(MetricKind::Bmi, value, None),
            }
        }
        MetricReading::Weight { value, unit } => MetricEvaluation {
            kind: MetricKind::Weight,
            title: "Weight".to_string(),
            value: round1(*value),
            secondary_value: None,
            unit: match unit {
                WeightUnit::Kg => "kg".to_string(),
                WeightUnit::Lb => "lb".to_string(),
            },
            category: TRACKED.to_string(),
        },
        MetricReading::BloodPressure {
            systolic,
            diastolic,
        } => {
            let (systolic, diastolic) = (systolic.round(), diastolic.round());
            MetricEvaluation {
                kind: MetricKind::BloodPressure,
                title: "Blood Pressure".to_string(),
                value: systolic,
                secondary_value: Some(diastolic),
                unit: BLOOD_PRESSURE_UNIT.to_string(),
                category: categorize(MetricKind::BloodPressure, systolic, Some(diastolic)),
            }
        }
        MetricReading::HeartRate { bpm } => {
            let value = bpm.round();
            MetricEvaluation {
                kind: MetricKind::HeartRate,
                title: "Heart Rate".to_string(),
                value,
                secondary_value: None,
                unit: HEART_RATE_UNIT.to_string(),
                category: categorize(MetricKind::HeartRate, value, None),
            }
        }
        MetricReading::BloodSugar { mg_dl } => {
            let value = round1(*mg_dl);
            MetricEvaluation {
                kind: MetricKind::BloodSugar,
                title: "Blood Sugar".to_string(),
                value,
                secondary_value: None,
                unit: BLOOD_SUGAR_UNIT.to_string(),
                category: categorize(MetricKind::BloodSugar, value, None),
            }
        }
        MetricReading::Custom { title, value, unit } => MetricEvaluation {
            kind: MetricKind::Custom,
            title: title.trim().to_string(),
            value: *value,
            secondary_value: None,
            unit: unit.trim().to_string(),
            category: TRACKED.to_string(),
        },
    }
}
