use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::competition::{AthleteId, ClassId, ClassStore, Slot};
use crate::entries::{BoulderAttempt, ResultRepository, SpeedRun};
use crate::error::Result;
use crate::import::{write_roster, Roster};
use crate::scoring::{score_class, ClassResults};
use crate::state::{load_or_empty, save_snapshot, Snapshot};

/// The operator-facing competition state.
///
/// Every mutating call validates first, applies the change, drops attempts of
/// athletes who left their team and then saves the whole snapshot. A failed
/// save is reported but the in-memory change stays applied.
#[derive(Debug, Clone)]
pub struct Session {
    store: ClassStore,
    results: BTreeMap<ClassId, ResultRepository>,
    path: Option<PathBuf>,
}

impl Session {
    /// Load the competition stored at `path`, or start empty if it is missing
    /// or unreadable
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (store, results) = load_or_empty(&path).restore();
        debug!("Loaded competition state from {}", path.display());
        Self {
            store,
            results,
            path: Some(path),
        }
    }

    /// A session that is never written to disk
    pub fn in_memory() -> Self {
        let (store, results) = Snapshot::new().restore();
        Self {
            store,
            results,
            path: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn store(&self) -> &ClassStore {
        &self.store
    }

    pub fn results(&self, class: ClassId) -> &ResultRepository {
        // restore() creates a repository for every class
        &self.results[&class]
    }

    fn results_mut(&mut self, class: ClassId) -> &mut ResultRepository {
        self.results.entry(class).or_default()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.store, &self.results)
    }

    /// Write the current state. In-memory sessions have nothing to write.
    pub fn save(&self) -> Result<()> {
        match &self.path {
            Some(path) => {
                save_snapshot(path, &self.snapshot())?;
                debug!("Saved competition state to {}", path.display());
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Drop attempts of athletes who are no longer on a team of `class`
    fn prune(&mut self, class: ClassId) {
        let keep = self.store.class(class).athlete_ids();
        let removed = self.results_mut(class).retain_athletes(&keep);
        if removed > 0 {
            info!("{}: dropped recorded attempts of {} former members", class, removed);
        }
    }

    fn athlete_id(&self, class: ClassId, team: &str, member: &str) -> Result<AthleteId> {
        Ok(self.store.class(class).athlete(team, member)?.id)
    }

    pub fn add_team(&mut self, class: ClassId, name: &str, members: &[String]) -> Result<()> {
        self.store.add_team(class, name, members)?;
        info!("{}: team '{}' saved", class, name.trim());
        self.prune(class);
        self.save()
    }

    pub fn edit_team(&mut self, class: ClassId, name: &str, members: &[String]) -> Result<()> {
        self.store.edit_team(class, name, members)?;
        info!("{}: team '{}' updated", class, name.trim());
        self.prune(class);
        self.save()
    }

    pub fn set_route_max_holds(&mut self, class: ClassId, route: Slot, holds: u32) -> Result<()> {
        self.store.set_route_max_holds(class, route, holds)?;
        info!("{}: Route {} set to {} holds", class, route.number(), holds);
        self.save()
    }

    pub fn record_boulder(
        &mut self,
        class: ClassId,
        team: &str,
        member: &str,
        problem: Slot,
        attempt: BoulderAttempt,
    ) -> Result<()> {
        let id = self.athlete_id(class, team, member)?;
        self.results_mut(class).set_boulder(problem, id, attempt);
        info!(
            "{}: {} ({}) boulder {}: zone={} top={}",
            class,
            member.trim(),
            team.trim(),
            problem.number(),
            attempt.zone,
            attempt.top
        );
        self.save()
    }

    /// Record a reached hold; returns the value stored after clamping to the
    /// route's max-hold count
    pub fn record_reached_hold(
        &mut self,
        class: ClassId,
        team: &str,
        member: &str,
        route: Slot,
        hold: u32,
    ) -> Result<u32> {
        let id = self.athlete_id(class, team, member)?;
        let max_holds = self.store.class(class).toprope_routes.get(route);
        let stored = self
            .results_mut(class)
            .set_reached_hold(route, id, hold, max_holds);
        info!(
            "{}: {} ({}) Route {}: hold {}",
            class,
            member.trim(),
            team.trim(),
            route.number(),
            stored
        );
        self.save()?;
        Ok(stored)
    }

    pub fn record_speed_run(
        &mut self,
        class: ClassId,
        team: &str,
        member: &str,
        run: SpeedRun,
        seconds: f64,
    ) -> Result<()> {
        let id = self.athlete_id(class, team, member)?;
        self.results_mut(class).set_speed_run(id, run, seconds)?;
        info!(
            "{}: {} ({}) speed {:?}: {:.2}s",
            class,
            member.trim(),
            team.trim(),
            run,
            seconds
        );
        self.save()
    }

    /// Replace the teams of every class named in the roster.
    /// Nothing changes unless every team of every class is valid.
    pub fn import_roster(&mut self, roster: &Roster) -> Result<()> {
        let mut staged = self.store.clone();
        for (class, teams) in &roster.classes {
            staged.replace_teams(*class, teams)?;
        }
        self.store = staged;

        for (class, teams) in &roster.classes {
            info!("{}: imported {} teams", class, teams.len());
            self.prune(*class);
        }
        self.save()
    }

    pub fn export_roster<W: Write>(&self, writer: W) -> Result<()> {
        write_roster(&self.store, writer)
    }

    pub fn score(&self, class: ClassId) -> ClassResults {
        score_class(self.store.class(class), self.results(class))
    }
}
