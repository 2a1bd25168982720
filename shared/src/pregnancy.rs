//! Pregnancy progress and baby age for the dashboard summary.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{MotherProfile, Stage, Tool};

/// Length of a full-term pregnancy counted from the last menstrual period.
pub const GESTATION_DAYS: i64 = 280;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PregnancyProgress {
    pub weeks: i64,
    pub days: i64,
    pub trimester: u8,
    /// `YYYY-MM-DD`
    pub due_date: String,
    /// Negative once the due date has passed.
    pub days_remaining: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BabyAge {
    pub days: i64,
    pub weeks: i64,
    pub months: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub stage: Stage,
    pub pregnancy: Option<PregnancyProgress>,
    pub baby_age: Option<BabyAge>,
    pub tools: Vec<Tool>,
}

pub fn trimester_for_week(week: i64) -> u8 {
    if week <= 13 {
        1
    } else if week <= 27 {
        2
    } else {
        3
    }
}

/// `None` when the LMP date lies in the future.
pub fn pregnancy_progress(lmp: NaiveDate, today: NaiveDate) -> Option<PregnancyProgress> {
    let elapsed = (today - lmp).num_days();
    if elapsed < 0 {
        return None;
    }
    let due = lmp + Duration::days(GESTATION_DAYS);
    let weeks = elapsed / 7;
    Some(PregnancyProgress {
        weeks,
        days: elapsed % 7,
        trimester: trimester_for_week(weeks),
        due_date: due.format("%Y-%m-%d").to_string(),
        days_remaining: (due - today).num_days(),
    })
}

/// Whole calendar months between two dates.
fn full_months(from: NaiveDate, to: NaiveDate) -> i64 {
    let mut months = (to.year() - from.year()) as i64 * 12 + to.month() as i64 - from.month() as i64;
    if to.day() < from.day() {
        months -= 1;
    }
    months.max(0)
}

/// `None` when the birth date lies in the future.
pub fn baby_age(birth: NaiveDate, today: NaiveDate) -> Option<BabyAge> {
    let days = (today - birth).num_days();
    if days < 0 {
        return None;
    }
    Some(BabyAge {
        days,
        weeks: days / 7,
        months: full_months(birth, today),
    })
}

fn parse_date(value: Option<&String>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value?, "%Y-%m-%d").ok()
}

/// Builds the dashboard summary for a profile.
///
/// Pregnancy progress prefers the LMP date and falls back to the self-reported
/// week count. It is only computed for the pregnant stage.
pub fn summarize(profile: &MotherProfile, today: NaiveDate) -> ProfileSummary {
    let pregnancy = match profile.stage {
        Stage::Pregnant => parse_date(profile.lmp_date.as_ref())
            .or_else(|| {
                profile
                    .weeks_pregnant
                    .map(|weeks| today - Duration::days(weeks * 7))
            })
            .and_then(|lmp| pregnancy_progress(lmp, today)),
        _ => None,
    };
    let baby_age = match profile.stage {
        Stage::Pregnant => None,
        _ => parse_date(profile.baby_birth_date.as_ref()).and_then(|birth| baby_age(birth, today)),
    };
    ProfileSummary {
        stage: profile.stage,
        pregnancy,
        baby_age,
        tools: profile.stage.tools(),
    }
}
