use super::rules::{best_of, TOP_POINTS, WEIGHTS, ZONE_POINTS};
use super::speed::{display_speed_ranking, rank_speed, team_speed_contribution, SpeedResult};
use crate::competition::{ClassId, CompetitionClass, RouteHolds, Slot, Team};
use crate::entries::{BoulderAttempt, ResultRepository};

/// Per-discipline totals behind a team's combined score
#[derive(Debug, Clone, PartialEq)]
pub struct TeamResult {
    pub team: String,
    pub boulder: f64,
    pub top_rope: f64,
    pub speed: f64,
    /// Weighted total, rounded to 2 decimals
    pub score: f64,
    pub boulder_problems: [f64; 3],
    pub top_rope_routes: [f64; 3],
}

/// Everything a results report for one class needs
#[derive(Debug, Clone, PartialEq)]
pub struct ClassResults {
    pub class: ClassId,
    /// Best team first
    pub teams: Vec<TeamResult>,
    /// Fastest athlete first
    pub speed: Vec<SpeedResult>,
}

/// 50 for a top, 25 for a zone, 0 otherwise. Not cumulative.
pub fn boulder_points(attempt: BoulderAttempt) -> u32 {
    if attempt.top {
        TOP_POINTS
    } else if attempt.zone {
        ZONE_POINTS
    } else {
        0
    }
}

/// Reached hold normalised to 0..=100 by the route's max-hold count
pub fn top_rope_points(reached_hold: u32, max_holds: u32) -> f64 {
    // max_holds is at least 1 by construction; a hold stored before the
    // maximum was lowered still caps at 100
    let max_holds = max_holds.max(1);
    (f64::from(reached_hold) / f64::from(max_holds) * 100.0).min(100.0)
}

/// Best-four boulder sum for each problem
pub fn boulder_by_problem(team: &Team, results: &ResultRepository) -> [f64; 3] {
    Slot::ALL.map(|problem| {
        let scores = team
            .members
            .iter()
            .map(|m| f64::from(boulder_points(results.boulder(problem, m.id))))
            .collect();
        best_of(scores)
    })
}

/// Best-four top-rope sum for each route
pub fn top_rope_by_route(team: &Team, routes: &RouteHolds, results: &ResultRepository) -> [f64; 3] {
    Slot::ALL.map(|route| {
        let max_holds = routes.get(route);
        let scores = team
            .members
            .iter()
            .map(|m| top_rope_points(results.reached_hold(route, m.id), max_holds))
            .collect();
        best_of(scores)
    })
}

pub fn boulder_score(team: &Team, results: &ResultRepository) -> f64 {
    boulder_by_problem(team, results).iter().sum()
}

pub fn top_rope_score(team: &Team, routes: &RouteHolds, results: &ResultRepository) -> f64 {
    top_rope_by_route(team, routes, results).iter().sum()
}

/// Combine all three disciplines for one team.
///
/// `speed_ranking` must be the class-wide ranking from `rank_speed`.
pub fn team_result(
    team: &Team,
    routes: &RouteHolds,
    results: &ResultRepository,
    speed_ranking: &[SpeedResult],
) -> TeamResult {
    let boulder_problems = boulder_by_problem(team, results);
    let top_rope_routes = top_rope_by_route(team, routes, results);
    let boulder: f64 = boulder_problems.iter().sum();
    let top_rope: f64 = top_rope_routes.iter().sum();
    let speed = team_speed_contribution(team, speed_ranking);

    TeamResult {
        team: team.name.clone(),
        boulder,
        top_rope,
        speed,
        score: WEIGHTS.combine(speed, top_rope, boulder),
        boulder_problems,
        top_rope_routes,
    }
}

/// Teams sorted by combined score, best first. Ties keep insertion order.
pub fn rank_teams(class: &CompetitionClass, results: &ResultRepository) -> Vec<TeamResult> {
    rank_teams_by(class, results, &rank_speed(class, results))
}

fn rank_teams_by(
    class: &CompetitionClass,
    results: &ResultRepository,
    speed_ranking: &[SpeedResult],
) -> Vec<TeamResult> {
    let mut ranked: Vec<TeamResult> = class
        .teams
        .iter()
        .map(|team| team_result(team, &class.toprope_routes, results, speed_ranking))
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// Full scoring pass for one class. The speed ranking is computed once and
/// shared by the team totals and the display table.
pub fn score_class(class: &CompetitionClass, results: &ResultRepository) -> ClassResults {
    let speed_ranking = rank_speed(class, results);
    ClassResults {
        class: class.id,
        teams: rank_teams_by(class, results, &speed_ranking),
        speed: display_speed_ranking(&speed_ranking),
    }
}
