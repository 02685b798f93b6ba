pub mod roster;

pub use roster::{parse_roster, sniff_delimiter, write_roster, Roster};
