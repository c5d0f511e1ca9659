//! Growth-rate module
pub mod calculator;
pub mod scoring;

pub use self::calculator::GrowthRateCalculator;
pub use self::scoring::{CandidateScorer, HeuristicScorer};
