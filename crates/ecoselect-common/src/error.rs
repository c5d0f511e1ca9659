//! Error types for EcoSelect
//!
//! Provides a unified error type in which every variant records the pipeline
//! stage that raised it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using EcoSelectError
pub type Result<T> = std::result::Result<T, EcoSelectError>;

/// Pipeline stage of a `select_diverse_outputs` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Configuration,
    EntropyEstimation,
    Embedding,
    ScoringRates,
    MatrixBuild,
    Simulation,
    Selection,
}

impl Stage {
    /// Stable label, used for metric labels and log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Configuration => "configuration",
            Stage::EntropyEstimation => "entropy_estimation",
            Stage::Embedding => "embedding",
            Stage::ScoringRates => "scoring_rates",
            Stage::MatrixBuild => "matrix_build",
            Stage::Simulation => "simulation",
            Stage::Selection => "selection",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for selection runs
#[derive(Debug, Error)]
pub enum EcoSelectError {
    #[error("Invalid input at stage {stage}: {reason}")]
    InvalidInput { stage: Stage, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Embedding failure at stage {stage}: {source}")]
    Embedding {
        stage: Stage,
        #[source]
        source: EmbeddingError,
    },

    #[error("Numeric instability at stage {stage} (iteration {iteration}): {detail}")]
    NumericInstability {
        stage: Stage,
        iteration: usize,
        detail: String,
    },
}

impl EcoSelectError {
    /// Build an input error for the given stage
    pub fn invalid_input(stage: Stage, reason: impl Into<String>) -> Self {
        EcoSelectError::InvalidInput {
            stage,
            reason: reason.into(),
        }
    }

    /// Build a simulation instability error
    pub fn instability(iteration: usize, detail: impl Into<String>) -> Self {
        EcoSelectError::NumericInstability {
            stage: Stage::Simulation,
            iteration,
            detail: detail.into(),
        }
    }

    /// The stage at which the pipeline failed
    pub fn stage(&self) -> Stage {
        match self {
            EcoSelectError::InvalidInput { stage, .. } => *stage,
            EcoSelectError::Config(_) => Stage::Configuration,
            EcoSelectError::Embedding { stage, .. } => *stage,
            EcoSelectError::NumericInstability { stage, .. } => *stage,
        }
    }
}

impl From<EmbeddingError> for EcoSelectError {
    fn from(source: EmbeddingError) -> Self {
        EcoSelectError::Embedding {
            stage: Stage::Embedding,
            source,
        }
    }
}

/// Malformed configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Entropy thresholds out of order: expected 0 <= low ({low}) < high ({high}) <= 1")]
    ThresholdOrder { low: f64, high: f64 },

    #[error("Weights for {regime} regime must be non-negative and sum to 1.0, got sum {sum}")]
    WeightSum { regime: String, sum: f64 },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Failed to read configuration: {0}")]
    Load(String),
}

/// Errors from embedding operations
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable")]
    Unavailable,

    #[error("Embedding request timed out after {0}ms")]
    Timeout(u64),

    #[error("Expected {expected} embeddings, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Embedding {index} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Embedding {0} contains non-finite components")]
    NonFinite(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_names_stage() {
        let err = EcoSelectError::instability(3, "population sum is NaN");
        assert_eq!(err.stage(), Stage::Simulation);
        assert!(err.to_string().contains("simulation"));
        assert!(err.to_string().contains("iteration 3"));
    }

    #[test]
    fn test_embedding_error_defaults_to_embedding_stage() {
        let err: EcoSelectError = EmbeddingError::Timeout(500).into();
        assert_eq!(err.stage(), Stage::Embedding);
        assert!(err.to_string().contains("500ms"));
    }

    #[test]
    fn test_config_error_stage() {
        let err: EcoSelectError = ConfigError::ThresholdOrder { low: 0.7, high: 0.3 }.into();
        assert_eq!(err.stage(), Stage::Configuration);
        assert!(err.to_string().contains("0.7"));
    }
}
