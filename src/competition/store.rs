use std::collections::{BTreeMap, BTreeSet};

use super::class::{ClassId, RouteHolds, Slot};
use super::team::{Athlete, AthleteId, Team};
use super::validation::{normalize_members, validate_team};
use crate::error::{CompetitionError, Result};

/// One competition class: its teams (in insertion order) and route setup
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitionClass {
    pub id: ClassId,
    pub teams: Vec<Team>,
    pub toprope_routes: RouteHolds,
}

impl CompetitionClass {
    pub fn new(id: ClassId) -> Self {
        Self {
            id,
            teams: Vec::new(),
            toprope_routes: RouteHolds::default(),
        }
    }

    pub fn team(&self, name: &str) -> Option<&Team> {
        let name = name.trim();
        self.teams.iter().find(|t| t.name == name)
    }

    /// Resolve a member by team and member name
    pub fn athlete(&self, team: &str, member: &str) -> Result<&Athlete> {
        let found = self.team(team).ok_or_else(|| {
            CompetitionError::validation(format!("{}: unknown team '{}'", self.id, team.trim()))
        })?;
        found.member(member).ok_or_else(|| {
            CompetitionError::validation(format!(
                "{}: team '{}' has no member '{}'",
                self.id,
                found.name,
                member.trim()
            ))
        })
    }

    /// Identifiers of everyone currently on a team in this class
    pub fn athlete_ids(&self) -> BTreeSet<AthleteId> {
        self.teams
            .iter()
            .flat_map(|t| t.members.iter().map(|m| m.id))
            .collect()
    }

    fn upsert(&mut self, team: Team) {
        match self.teams.iter_mut().find(|t| t.name == team.name) {
            Some(slot) => *slot = team,
            None => self.teams.push(team),
        }
    }
}

/// Holds every competition class. All five classes always exist.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassStore {
    classes: BTreeMap<ClassId, CompetitionClass>,
}

impl Default for ClassStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassStore {
    pub fn new() -> Self {
        Self {
            classes: ClassId::ALL
                .into_iter()
                .map(|id| (id, CompetitionClass::new(id)))
                .collect(),
        }
    }

    /// Rebuild a store from loaded classes; classes that are missing start empty
    pub fn from_classes(loaded: impl IntoIterator<Item = CompetitionClass>) -> Self {
        let mut store = Self::new();
        for class in loaded {
            store.classes.insert(class.id, class);
        }
        store
    }

    pub fn class(&self, id: ClassId) -> &CompetitionClass {
        // every ClassId is inserted by new()
        &self.classes[&id]
    }

    fn class_mut(&mut self, id: ClassId) -> &mut CompetitionClass {
        self.classes
            .entry(id)
            .or_insert_with(|| CompetitionClass::new(id))
    }

    pub fn classes(&self) -> impl Iterator<Item = &CompetitionClass> {
        self.classes.values()
    }

    pub fn team(&self, class: ClassId, name: &str) -> Option<&Team> {
        self.class(class).team(name)
    }

    /// Insert a team, or overwrite an existing team of the same name.
    /// Overwriting keeps the identifiers of members whose name survives.
    pub fn add_team(&mut self, class: ClassId, name: &str, members: &[String]) -> Result<()> {
        let team = match self.team(class, name) {
            Some(existing) => existing.with_members(members)?,
            None => Team::new(name, members)?,
        };
        self.class_mut(class).upsert(team);
        Ok(())
    }

    /// Replace the member list of an existing team. On failure nothing changes.
    pub fn edit_team(&mut self, class: ClassId, name: &str, members: &[String]) -> Result<()> {
        let existing = self.team(class, name).ok_or_else(|| {
            CompetitionError::validation(format!("{}: unknown team '{}'", class, name.trim()))
        })?;
        let edited = existing.with_members(members)?;
        self.class_mut(class).upsert(edited);
        Ok(())
    }

    /// Set a route's max-hold count. Existing reached holds are not reclamped.
    pub fn set_route_max_holds(&mut self, class: ClassId, route: Slot, holds: u32) -> Result<()> {
        self.class_mut(class).toprope_routes.set(route, holds)
    }

    /// Replace all teams of a class wholesale.
    ///
    /// Every team is validated before anything changes. Members that already
    /// existed under the same team and name keep their identifiers.
    pub fn replace_teams(&mut self, class: ClassId, teams: &[(String, Vec<String>)]) -> Result<()> {
        let mut seen = BTreeSet::new();
        for (name, members) in teams {
            validate_team(name, &normalize_members(members))?;
            if !seen.insert(name.trim()) {
                return Err(CompetitionError::validation(format!(
                    "{}: team '{}' appears twice",
                    class,
                    name.trim()
                )));
            }
        }

        let current = self.class(class);
        let replacement = teams
            .iter()
            .map(|(name, members)| match current.team(name) {
                Some(existing) => existing.with_members(members),
                None => Team::new(name, members),
            })
            .collect::<Result<Vec<_>>>()?;

        self.class_mut(class).teams = replacement;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_new_store_has_all_classes() {
        let store = ClassStore::new();
        assert_eq!(store.classes().count(), 5);
        for class in store.classes() {
            assert!(class.teams.is_empty());
            assert_eq!(class.toprope_routes, RouteHolds::default());
        }
    }

    #[test]
    fn test_add_team() {
        let mut store = ClassStore::new();
        store
            .add_team(ClassId::Wk1, "Red", &roster(&["A", "B", "C", "D"]))
            .unwrap();
        assert_eq!(store.class(ClassId::Wk1).teams.len(), 1);
        assert!(store.class(ClassId::Wk2).teams.is_empty());
    }

    #[test]
    fn test_add_team_overwrites_same_name() {
        let mut store = ClassStore::new();
        store
            .add_team(ClassId::Wk1, "Red", &roster(&["A", "B", "C", "D"]))
            .unwrap();
        let a_id = store.team(ClassId::Wk1, "Red").unwrap().member("A").unwrap().id;

        store
            .add_team(ClassId::Wk1, "Red", &roster(&["A", "B", "C", "D", "E"]))
            .unwrap();

        let class = store.class(ClassId::Wk1);
        assert_eq!(class.teams.len(), 1);
        assert_eq!(class.teams[0].members.len(), 5);
        assert_eq!(class.teams[0].member("A").unwrap().id, a_id);
    }

    #[test]
    fn test_add_team_rejected_leaves_state() {
        let mut store = ClassStore::new();
        store
            .add_team(ClassId::Wk1, "Red", &roster(&["A", "B", "C", "D"]))
            .unwrap();
        let before = store.clone();

        assert!(store
            .add_team(ClassId::Wk1, "Red", &roster(&["A", "B", "C"]))
            .is_err());
        assert!(store
            .add_team(ClassId::Wk1, "Blue", &roster(&["A", "B", "C", "D", "E", "F", "G"]))
            .is_err());
        assert_eq!(store, before);
    }

    #[test]
    fn test_edit_unknown_team() {
        let mut store = ClassStore::new();
        let err = store
            .edit_team(ClassId::Wk1, "Ghost", &roster(&["A", "B", "C", "D"]))
            .unwrap_err();
        assert!(err.to_string().contains("unknown team 'Ghost'"));
    }

    #[test]
    fn test_edit_team_rejected_leaves_state() {
        let mut store = ClassStore::new();
        store
            .add_team(ClassId::Wk1, "Red", &roster(&["A", "B", "C", "D"]))
            .unwrap();
        let before = store.clone();
        assert!(store
            .edit_team(ClassId::Wk1, "Red", &roster(&["A", "B", "C"]))
            .is_err());
        assert_eq!(store, before);
    }

    #[test]
    fn test_teams_keep_insertion_order() {
        let mut store = ClassStore::new();
        for name in ["Zebra", "Alpha", "Mid"] {
            store
                .add_team(ClassId::Wk3, name, &roster(&["A", "B", "C", "D"]))
                .unwrap();
        }
        let names: Vec<_> = store
            .class(ClassId::Wk3)
            .teams
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["Zebra", "Alpha", "Mid"]);
    }

    #[test]
    fn test_set_route_max_holds() {
        let mut store = ClassStore::new();
        let route = Slot::new(3).unwrap();
        store.set_route_max_holds(ClassId::Wk2, route, 25).unwrap();
        assert_eq!(store.class(ClassId::Wk2).toprope_routes.get(route), 25);
        assert!(store.set_route_max_holds(ClassId::Wk2, route, 0).is_err());
        assert_eq!(store.class(ClassId::Wk2).toprope_routes.get(route), 25);
    }

    #[test]
    fn test_replace_teams_is_all_or_nothing() {
        let mut store = ClassStore::new();
        store
            .add_team(ClassId::Wk1, "Old", &roster(&["A", "B", "C", "D"]))
            .unwrap();
        let before = store.clone();

        let teams = vec![
            ("Red".to_string(), roster(&["A", "B", "C", "D"])),
            ("Blue".to_string(), roster(&["E", "F", "G"])),
        ];
        assert!(store.replace_teams(ClassId::Wk1, &teams).is_err());
        assert_eq!(store, before);
    }

    #[test]
    fn test_replace_teams_reuses_ids() {
        let mut store = ClassStore::new();
        store
            .add_team(ClassId::Wk1, "Red", &roster(&["A", "B", "C", "D"]))
            .unwrap();
        let a_id = store.team(ClassId::Wk1, "Red").unwrap().member("A").unwrap().id;

        let teams = vec![
            ("Red".to_string(), roster(&["A", "X", "Y", "Z"])),
            ("Blue".to_string(), roster(&["E", "F", "G", "H"])),
        ];
        store.replace_teams(ClassId::Wk1, &teams).unwrap();

        let class = store.class(ClassId::Wk1);
        assert_eq!(class.teams.len(), 2);
        assert_eq!(class.team("Red").unwrap().member("A").unwrap().id, a_id);
    }

    #[test]
    fn test_athlete_lookup() {
        let mut store = ClassStore::new();
        store
            .add_team(ClassId::Wk1, "Red", &roster(&["A", "B", "C", "D"]))
            .unwrap();
        let class = store.class(ClassId::Wk1);
        assert_eq!(class.athlete("Red", "B").unwrap().name, "B");
        assert!(class.athlete("Red", "Q").is_err());
        assert!(class.athlete("Blue", "A").is_err());
        assert_eq!(class.athlete_ids().len(), 4);
    }
}
