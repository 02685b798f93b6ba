pub mod class;
pub mod store;
pub mod team;
pub mod validation;

pub use class::{ClassId, RouteHolds, Slot, DEFAULT_ROUTE_HOLDS, MAX_ROUTE_HOLDS, MIN_ROUTE_HOLDS};
pub use store::{ClassStore, CompetitionClass};
pub use team::{Athlete, AthleteId, Team};
pub use validation::{normalize_members, validate_team, MAX_TEAM_SIZE, MIN_TEAM_SIZE};
