use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::types::{AthleteResults, BoulderAttempt, SpeedAttempt, SpeedRun};
use crate::competition::{AthleteId, Slot};
use crate::error::Result;

/// Raw per-athlete entries of one competition class.
///
/// Reads never fail: an athlete without entries reads as the default
/// (unattempted) results. Writes overwrite without keeping history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultRepository {
    results: BTreeMap<AthleteId, AthleteResults>,
}

impl ResultRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn athlete(&self, id: AthleteId) -> AthleteResults {
        self.results.get(&id).copied().unwrap_or_default()
    }

    fn athlete_mut(&mut self, id: AthleteId) -> &mut AthleteResults {
        self.results.entry(id).or_default()
    }

    pub fn boulder(&self, problem: Slot, id: AthleteId) -> BoulderAttempt {
        self.athlete(id).boulders[problem.index()]
    }

    pub fn set_boulder(&mut self, problem: Slot, id: AthleteId, attempt: BoulderAttempt) {
        self.athlete_mut(id).boulders[problem.index()] = attempt;
    }

    pub fn reached_hold(&self, route: Slot, id: AthleteId) -> u32 {
        self.athlete(id).routes[route.index()].reached_hold
    }

    /// Store a reached hold, clamped to the route's max-hold count.
    /// Returns the value actually stored.
    pub fn set_reached_hold(&mut self, route: Slot, id: AthleteId, hold: u32, max_holds: u32) -> u32 {
        let stored = hold.min(max_holds);
        if stored != hold {
            tracing::debug!(
                "Route {}: reached hold {} clamped to {}",
                route.number(),
                hold,
                stored
            );
        }
        self.athlete_mut(id).routes[route.index()].reached_hold = stored;
        stored
    }

    pub fn speed(&self, id: AthleteId) -> SpeedAttempt {
        self.athlete(id).speed
    }

    pub fn set_speed_run(&mut self, id: AthleteId, run: SpeedRun, seconds: f64) -> Result<()> {
        // validate before touching the map so a rejected time leaves no entry behind
        let mut speed = self.speed(id);
        speed.set_run(run, seconds)?;
        self.athlete_mut(id).speed = speed;
        Ok(())
    }

    /// Drop entries of athletes that are no longer on any team.
    /// Returns how many athletes were removed.
    pub fn retain_athletes(&mut self, keep: &BTreeSet<AthleteId>) -> usize {
        let before = self.results.len();
        self.results.retain(|id, _| keep.contains(id));
        before - self.results.len()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
