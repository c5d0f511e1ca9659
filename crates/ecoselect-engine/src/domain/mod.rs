//! Domain layer for EcoSelect

pub mod context;
pub mod ecosystem;
pub mod entropy;

pub use context::SelectionContext;
pub use ecosystem::LVEcosystem;
pub use entropy::{EntropyEstimator, EntropySignals, EMPTY_PROMPT_ENTROPY};
