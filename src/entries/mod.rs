pub mod repository;
pub mod types;

pub use repository::ResultRepository;
pub use types::{
    AthleteResults, BoulderAttempt, SpeedAttempt, SpeedRun, TopRopeAttempt, MAX_SPEED_SECONDS,
};
