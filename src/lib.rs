//! Scoring for school climbing competitions.
//!
//! Teams of four to six athletes compete per class in bouldering, top-rope and
//! speed. Attempts are recorded per athlete, turned into discipline points and
//! combined into one weighted team score per class.

pub mod competition;
pub mod config;
pub mod entries;
pub mod error;
pub mod import;
pub mod output;
pub mod scoring;
pub mod session;
pub mod state;

pub use error::{CompetitionError, Result};
pub use session::Session;
