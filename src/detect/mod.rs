pub mod parse;
pub mod tracker;

pub use parse::parse_timer_text;
pub use tracker::{Candidate, CandidateTracker, Observation};
