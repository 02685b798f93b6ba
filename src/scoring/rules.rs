/// Points for topping a boulder problem
pub const TOP_POINTS: u32 = 50;

/// Points for reaching the zone without topping
pub const ZONE_POINTS: u32 = 25;

/// Only the best four members count per problem, route and in speed
pub const BEST_OF: usize = 4;

/// Score of the fastest climber in a class
pub const SPEED_MAX_POINTS: u32 = 100;

/// Points lost per place in the speed ranking
pub const SPEED_POINTS_PER_RANK: u32 = 2;

/// Share of each discipline in the combined team score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub speed: f64,
    pub top_rope: f64,
    pub boulder: f64,
}

/// Speed 20%, top-rope 40%, boulder 40%
pub const WEIGHTS: Weights = Weights {
    speed: 1.0 / 5.0,
    top_rope: 2.0 / 5.0,
    boulder: 2.0 / 5.0,
};

impl Weights {
    pub fn combine(&self, speed: f64, top_rope: f64, boulder: f64) -> f64 {
        round2(self.speed * speed + self.top_rope * top_rope + self.boulder * boulder)
    }
}

/// Round to two decimal places, exact halves to the even neighbour
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Sum of the `BEST_OF` highest scores (all of them if there are fewer)
pub fn best_of(mut scores: Vec<f64>) -> f64 {
    scores.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    scores.into_iter().take(BEST_OF).sum()
}
