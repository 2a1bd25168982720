//! Kick counter and contraction timer.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Kicks a counting session aims for.
pub const KICK_GOAL: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KickStatus {
    Excellent,
    Good,
    Normal,
    /// Goal not reached yet, but the session is still young.
    InProgress,
    Low,
}

impl KickStatus {
    pub fn label(&self) -> &'static str {
        match self {
            KickStatus::Excellent => "Excellent",
            KickStatus::Good => "Good",
            KickStatus::Normal => "Normal",
            KickStatus::InProgress => "Keep counting",
            KickStatus::Low => "Low",
        }
    }
}

/// 10 kicks in 25 minutes is Excellent; 4 kicks in 70 minutes is Low.
pub fn classify_kicks(kicks: u32, minutes: f64) -> KickStatus {
    if kicks >= KICK_GOAL {
        if minutes <= 30.0 {
            KickStatus::Excellent
        } else if minutes <= 60.0 {
            KickStatus::Good
        } else if minutes <= 120.0 {
            KickStatus::Normal
        } else {
            KickStatus::Low
        }
    } else if minutes < 60.0 {
        KickStatus::InProgress
    } else {
        KickStatus::Low
    }
}

/// One kick-counting session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KickSession {
    pub started_at: DateTime<Utc>,
    pub kicks: Vec<DateTime<Utc>>,
}

impl KickSession {
    pub fn start(at: DateTime<Utc>) -> Self {
        Self {
            started_at: at,
            kicks: Vec::new(),
        }
    }

    pub fn record_kick(&mut self, at: DateTime<Utc>) {
        self.kicks.push(at);
    }

    pub fn count(&self) -> u32 {
        self.kicks.len() as u32
    }

    /// Minutes from the start to the goal kick, or to `now` while counting.
    pub fn elapsed_minutes(&self, now: DateTime<Utc>) -> f64 {
        let end = match self.kicks.get(KICK_GOAL as usize - 1) {
            Some(goal_kick) => *goal_kick,
            None => now,
        };
        (end - self.started_at).num_seconds() as f64 / 60.0
    }

    pub fn status(&self, now: DateTime<Utc>) -> KickStatus {
        classify_kicks(self.count(), self.elapsed_minutes(now))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaborPhase {
    Early,
    Active,
    Transition,
}

impl LaborPhase {
    pub fn label(&self) -> &'static str {
        match self {
            LaborPhase::Early => "Early Labor",
            LaborPhase::Active => "Active Labor",
            LaborPhase::Transition => "Transition",
        }
    }
}

/// Phase from the start-to-start interval between contractions.
///
/// Over 5 minutes apart is early labor, 3 to 5 minutes is active labor, and
/// under 3 minutes is transition. Long contractions (90 s or more) are
/// transition regardless of spacing once they come 5 minutes apart or closer.
pub fn classify_labor(interval_minutes: f64, duration_seconds: f64) -> LaborPhase {
    if interval_minutes > 5.0 {
        LaborPhase::Early
    } else if interval_minutes >= 3.0 && duration_seconds < 90.0 {
        LaborPhase::Active
    } else {
        LaborPhase::Transition
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contraction {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl Contraction {
    pub fn duration_seconds(&self) -> f64 {
        (self.ended_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimerError {
    #[error("a contraction is already being timed")]
    AlreadyTiming,
    #[error("no contraction is being timed")]
    NotTiming,
    #[error("a contraction cannot end before it starts")]
    EndsBeforeStart,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerState {
    Idle,
    Timing { started_at: DateTime<Utc> },
}

/// Number of recent contractions averaged for the summary.
pub const SUMMARY_WINDOW: usize = 6;

/// Records contractions one start/stop pair at a time.
#[derive(Debug, Clone)]
pub struct ContractionTimer {
    state: TimerState,
    contractions: Vec<Contraction>,
}

impl Default for ContractionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractionTimer {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            contractions: Vec::new(),
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn contractions(&self) -> &[Contraction] {
        &self.contractions
    }

    pub fn start(&mut self, at: DateTime<Utc>) -> Result<(), TimerError> {
        match self.state {
            TimerState::Timing { .. } => Err(TimerError::AlreadyTiming),
            TimerState::Idle => {
                self.state = TimerState::Timing { started_at: at };
                Ok(())
            }
        }
    }

    pub fn stop(&mut self, at: DateTime<Utc>) -> Result<Contraction, TimerError> {
        let TimerState::Timing { started_at } = self.state else {
            return Err(TimerError::NotTiming);
        };
        if at < started_at {
            return Err(TimerError::EndsBeforeStart);
        }
        let contraction = Contraction {
            started_at,
            ended_at: at,
        };
        self.contractions.push(contraction);
        self.state = TimerState::Idle;
        Ok(contraction)
    }

    /// Drops an in-flight contraction without recording it.
    pub fn cancel(&mut self) {
        self.state = TimerState::Idle;
    }

    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.contractions.clear();
    }

    fn recent(&self) -> &[Contraction] {
        let skip = self.contractions.len().saturating_sub(SUMMARY_WINDOW);
        &self.contractions[skip..]
    }

    /// Average start-to-start spacing of recent contractions.
    pub fn average_interval_minutes(&self) -> Option<f64> {
        let recent = self.recent();
        if recent.len() < 2 {
            return None;
        }
        let total: f64 = recent
            .windows(2)
            .map(|pair| (pair[1].started_at - pair[0].started_at).num_seconds() as f64 / 60.0)
            .sum();
        Some(total / (recent.len() - 1) as f64)
    }

    pub fn average_duration_seconds(&self) -> Option<f64> {
        let recent = self.recent();
        if recent.is_empty() {
            return None;
        }
        let total: f64 = recent.iter().map(Contraction::duration_seconds).sum();
        Some(total / recent.len() as f64)
    }

    pub fn phase(&self) -> Option<LaborPhase> {
        Some(classify_labor(
            self.average_interval_minutes()?,
            self.average_duration_seconds()?,
        ))
    }

    /// The 5-1-1 rule: contractions at most 5 minutes apart, each lasting at
    /// least a minute, sustained for at least an hour.
    pub fn follows_5_1_1(&self) -> bool {
        let Some(last) = self.contractions.last() else {
            return false;
        };
        if last.duration_seconds() < 60.0 {
            return false;
        }
        let mut earliest = last.started_at;
        for pair in self.contractions.windows(2).rev() {
            let interval = pair[1].started_at - pair[0].started_at;
            if interval > Duration::minutes(5) || pair[0].duration_seconds() < 60.0 {
                break;
            }
            earliest = pair[0].started_at;
        }
        last.started_at - earliest >= Duration::minutes(60)
    }
}
