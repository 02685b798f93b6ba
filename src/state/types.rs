use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::competition::{ClassId, ClassStore, CompetitionClass, RouteHolds, Team};
use crate::entries::ResultRepository;

pub const SNAPSHOT_VERSION: u32 = 1;

/// The whole competition as written to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u32,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub classes: BTreeMap<ClassId, ClassSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSnapshot {
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub toprope_routes: RouteHolds,
    #[serde(default)]
    pub results: ResultRepository,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl Snapshot {
    /// Empty state with every class initialised (no teams, routes at 40 holds)
    pub fn new() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: None,
            classes: ClassId::ALL
                .into_iter()
                .map(|id| (id, ClassSnapshot::default()))
                .collect(),
        }
    }

    pub fn capture(store: &ClassStore, results: &BTreeMap<ClassId, ResultRepository>) -> Self {
        let classes = store
            .classes()
            .map(|class| {
                let snapshot = ClassSnapshot {
                    teams: class.teams.clone(),
                    toprope_routes: class.toprope_routes,
                    results: results.get(&class.id).cloned().unwrap_or_default(),
                };
                (class.id, snapshot)
            })
            .collect();
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Some(Utc::now()),
            classes,
        }
    }

    /// Split into the live store and repositories.
    /// Hold counts outside 1..=100 are clamped on the way in.
    pub fn restore(self) -> (ClassStore, BTreeMap<ClassId, ResultRepository>) {
        let mut results: BTreeMap<ClassId, ResultRepository> = ClassId::ALL
            .into_iter()
            .map(|id| (id, ResultRepository::new()))
            .collect();
        let mut classes = Vec::new();

        for (id, snapshot) in self.classes {
            classes.push(CompetitionClass {
                id,
                teams: snapshot.teams,
                toprope_routes: snapshot.toprope_routes.clamped(),
            });
            results.insert(id, snapshot.results);
        }

        (ClassStore::from_classes(classes), results)
    }
}
