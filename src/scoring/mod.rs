pub mod engine;
pub mod rules;
pub mod speed;

pub use engine::{
    boulder_points, boulder_score, rank_teams, score_class, team_result, top_rope_points,
    top_rope_score, ClassResults, TeamResult,
};
pub use rules::{best_of, round2, Weights, WEIGHTS};
pub use speed::{
    display_speed_ranking, rank_speed, speed_points, team_speed_contribution, SpeedResult,
};
