use serde::{Deserialize, Serialize};

use crate::error::{CompetitionError, Result};

pub const MAX_SPEED_SECONDS: f64 = 300.0;

/// Zone/top flags for one boulder problem. Unattempted is false/false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoulderAttempt {
    pub zone: bool,
    pub top: bool,
}

/// Highest hold number reached on one top-rope route. Unattempted is 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopRopeAttempt {
    pub reached_hold: u32,
}

/// Which of the two speed runs on the run-sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedRun {
    First,
    Second,
}

impl SpeedRun {
    pub fn from_number(number: u8) -> Result<Self> {
        match number {
            1 => Ok(SpeedRun::First),
            2 => Ok(SpeedRun::Second),
            n => Err(CompetitionError::configuration(format!(
                "speed run {} out of range (expected 1 or 2)",
                n
            ))),
        }
    }
}

/// Both recorded speed runs in seconds. 0.0 means the run was not taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeedAttempt {
    pub first: f64,
    pub second: f64,
}

impl SpeedAttempt {
    pub fn run(&self, run: SpeedRun) -> f64 {
        match run {
            SpeedRun::First => self.first,
            SpeedRun::Second => self.second,
        }
    }

    /// Record one run, rejecting NaN and anything outside 0.0..=300.0
    pub fn set_run(&mut self, run: SpeedRun, seconds: f64) -> Result<()> {
        if !(0.0..=MAX_SPEED_SECONDS).contains(&seconds) {
            return Err(CompetitionError::validation(format!(
                "speed time {} out of range (0-{} seconds)",
                seconds, MAX_SPEED_SECONDS
            )));
        }
        match run {
            SpeedRun::First => self.first = seconds,
            SpeedRun::Second => self.second = seconds,
        }
        Ok(())
    }

    /// The faster of the taken runs, or 0.0 if neither run was taken
    pub fn best_time(&self) -> f64 {
        [self.first, self.second]
            .into_iter()
            .filter(|t| *t > 0.0)
            .reduce(f64::min)
            .unwrap_or(0.0)
    }
}

/// Everything recorded for one athlete within a class
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AthleteResults {
    pub boulders: [BoulderAttempt; 3],
    pub routes: [TopRopeAttempt; 3],
    pub speed: SpeedAttempt,
}
