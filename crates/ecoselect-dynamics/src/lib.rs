//! # EcoSelect Dynamics
//!
//! Lotka-Volterra competition dynamics over candidate outputs.
//!
//! ## Growth Rate
//!
//! ```text
//! r_i = w_q·quality_i + w_n·novelty_i + w_b·bias_i + w_c·cost_i
//! ```
//!
//! Weights come from the entropy regime (precision / balanced / creativity).
//!
//! ## Population Update
//!
//! ```text
//! n_i(t+1) = n_i(t) · exp(d · (r_i + Σ_j A_ij · n_j(t)))   then renormalise
//! ```
//!
//! Where:
//! - d: damping factor
//! - A: interaction matrix, negative for competing (semantically similar) pairs
//!
//! ## Selection
//!
//! Candidates are ranked by final population; those with a share below
//! `1/(2N)` are dropped, but the top candidate is always kept.
//!
//! Everything in this crate is synchronous and allocation-local: one run owns
//! its candidates, matrix and simulation state.

pub mod culling;
pub mod dynamics;
pub mod fitness;
pub mod interaction;

pub use culling::{DiversitySelector, Selection, SelectionPolicy};
pub use dynamics::{PopulationDynamicsSimulator, SimulationConfig, SimulationOutcome};
pub use fitness::{CandidateScorer, GrowthRateCalculator, HeuristicScorer};
pub use interaction::{
    EigenStability, InteractionConfig, InteractionMatrixBuilder, StabilityValidator,
};
