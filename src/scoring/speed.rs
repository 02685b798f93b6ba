use super::rules::{best_of, SPEED_MAX_POINTS, SPEED_POINTS_PER_RANK};
use crate::competition::{AthleteId, CompetitionClass, Team};
use crate::entries::ResultRepository;

/// One athlete's place in the class-wide speed ranking
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedResult {
    pub athlete: AthleteId,
    pub member: String,
    pub team: String,
    pub time: f64,
    /// 0-based position, fastest first
    pub rank: usize,
    pub score: u32,
}

/// Points for a 0-based speed rank: 100, 98, 96, ... floored at 0
pub fn speed_points(rank: usize) -> u32 {
    let step = u32::try_from(rank)
        .unwrap_or(u32::MAX)
        .saturating_mul(SPEED_POINTS_PER_RANK);
    SPEED_MAX_POINTS.saturating_sub(step)
}

/// Rank every athlete of the class who has a recorded time.
///
/// The scale is shared by all teams of the class. Equal times keep roster
/// order (teams in insertion order, members in list order).
pub fn rank_speed(class: &CompetitionClass, results: &ResultRepository) -> Vec<SpeedResult> {
    let mut timed: Vec<(AthleteId, &str, &str, f64)> = class
        .teams
        .iter()
        .flat_map(|team| {
            team.members
                .iter()
                .map(move |m| (m.id, m.name.as_str(), team.name.as_str()))
        })
        .map(|(id, member, team)| (id, member, team, results.speed(id).best_time()))
        .filter(|(_, _, _, time)| *time > 0.0)
        .collect();

    // sort_by is stable
    timed.sort_by(|a, b| a.3.partial_cmp(&b.3).unwrap_or(std::cmp::Ordering::Equal));

    timed
        .into_iter()
        .enumerate()
        .map(|(rank, (athlete, member, team, time))| SpeedResult {
            athlete,
            member: member.to_string(),
            team: team.to_string(),
            time,
            rank,
            score: speed_points(rank),
        })
        .collect()
}

/// Sum of the team's best four individual speed scores
pub fn team_speed_contribution(team: &Team, ranking: &[SpeedResult]) -> f64 {
    let scores = ranking
        .iter()
        .filter(|r| team.members.iter().any(|m| m.id == r.athlete))
        .map(|r| f64::from(r.score))
        .collect();
    best_of(scores)
}

/// Order speed results for display, fastest first
pub fn display_speed_ranking(ranking: &[SpeedResult]) -> Vec<SpeedResult> {
    let mut display = ranking.to_vec();
    display.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(std::cmp::Ordering::Equal));
    display
}
