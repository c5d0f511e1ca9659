//! # EcoSelect Common
//!
//! Shared types, errors, and similarity helpers for the EcoSelect
//! Lotka-Volterra candidate-selection engine.
//!
//! ## Core Types
//!
//! - [`Candidate`]: one proposed output plus its derived scores
//! - [`EntropyProfile`]: entropy thresholds and per-regime growth weights
//! - [`InteractionMatrix`]: pairwise competition coefficients
//! - [`SelectionResult`]: selected outputs plus diagnostics
//!
//! ## Errors
//!
//! Every [`EcoSelectError`] names the pipeline [`Stage`] that raised it.

pub mod error;
pub mod similarity;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{ConfigError, EcoSelectError, EmbeddingError, Result, Stage};
pub use types::{
    candidate::Candidate,
    matrix::InteractionMatrix,
    profile::{EntropyProfile, EntropyRegime, RegimeWeights},
    selection::{
        DiversityMetrics, SelectedOutput, SelectionResult, SelectionWarning, StabilityReport,
    },
};

/// EcoSelect version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default simulation iteration cap
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Default step-size scaling in the population update
pub const DEFAULT_DAMPING_FACTOR: f64 = 0.15;

/// Default convergence threshold on the L2 population delta
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default cap on selected outputs
pub const DEFAULT_MAX_SELECTED: usize = 5;

/// Bound on the exponent of the population update
pub const DEFAULT_EXPONENT_CLAMP: f64 = 50.0;

/// Entropy above which multi-candidate selection is worthwhile
pub const DEFAULT_ENHANCEMENT_THRESHOLD: f64 = 0.4;
