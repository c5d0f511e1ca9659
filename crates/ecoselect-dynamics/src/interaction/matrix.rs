//! Competition coefficients from semantic similarity
//!
//! For i ≠ j, with s = cos(e_i, e_j):
//!
//! ```text
//! same strategy (or both untagged):  A_ij = -high·s       if s > threshold
//!                                    A_ij = -moderate·s   otherwise
//! different, both-present strategies: A_ij = -cross·s, never stronger than
//!                                    the same-strategy value
//! A_ii = 0
//! ```
//!
//! Candidates with the same content hash count as s = 1 whatever their
//! embeddings.
//!
//! Every entry is capped at `cooperation_ceiling`, so negatively similar
//! pairs gain at most a small mutual boost.

use ecoselect_common::{
    similarity::candidate_similarities, Candidate, ConfigError, EcoSelectError, InteractionMatrix,
    Result, Stage,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tunable interaction constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Similarity above which same-strategy competition is strong
    pub similarity_threshold: f64,
    /// Multiplier for strongly similar same-strategy pairs
    pub high_similarity_coefficient: f64,
    /// Multiplier for moderately similar same-strategy pairs
    pub moderate_similarity_coefficient: f64,
    /// Multiplier for pairs with different strategies
    pub cross_strategy_coefficient: f64,
    /// Largest positive (cooperative) coefficient allowed
    pub cooperation_ceiling: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.7,
            high_similarity_coefficient: 1.2,
            moderate_similarity_coefficient: 0.6,
            cross_strategy_coefficient: 0.3,
            cooperation_ceiling: 0.05,
        }
    }
}

impl InteractionConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let non_negative = [
            ("interaction.high_similarity_coefficient", self.high_similarity_coefficient),
            ("interaction.moderate_similarity_coefficient", self.moderate_similarity_coefficient),
            ("interaction.cross_strategy_coefficient", self.cross_strategy_coefficient),
            ("interaction.cooperation_ceiling", self.cooperation_ceiling),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("must be a non-negative number, got {}", value),
                });
            }
        }
        if !(-1.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "interaction.similarity_threshold",
                reason: format!("must lie in [-1, 1], got {}", self.similarity_threshold),
            });
        }
        Ok(())
    }

    /// Coefficient for a pair with similarity `s`
    pub fn coefficient(&self, similarity: f64, complementary: bool) -> f64 {
        let same_strategy = if similarity > self.similarity_threshold {
            -self.high_similarity_coefficient * similarity
        } else {
            -self.moderate_similarity_coefficient * similarity
        };

        let value = if complementary {
            let cross = -self.cross_strategy_coefficient * similarity;
            if cross.abs() > same_strategy.abs() {
                same_strategy
            } else {
                cross
            }
        } else {
            same_strategy
        };

        value.min(self.cooperation_ceiling)
    }
}

/// Builds the N×N alpha matrix for one selection run
#[derive(Debug, Clone, Default)]
pub struct InteractionMatrixBuilder {
    config: InteractionConfig,
}

impl InteractionMatrixBuilder {
    pub fn new(config: InteractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Build the alpha matrix; `embeddings[i]` must belong to `candidates[i]`
    pub fn build_alpha_matrix(
        &self,
        candidates: &[Candidate],
        embeddings: &[Vec<f32>],
    ) -> Result<InteractionMatrix> {
        let n = candidates.len();
        if embeddings.len() != n {
            return Err(EcoSelectError::invalid_input(
                Stage::MatrixBuild,
                format!("{} candidates but {} embeddings", n, embeddings.len()),
            ));
        }

        let sims = candidate_similarities(candidates, embeddings);
        let mut matrix = InteractionMatrix::zeros(n);

        for i in 0..n {
            for j in (i + 1)..n {
                let complementary = candidates[i].complementary_strategy(&candidates[j]);
                let a = self.config.coefficient(sims[i * n + j], complementary);
                matrix.set(i, j, a);
                matrix.set(j, i, a);
            }
        }

        if !matrix.all_finite() {
            return Err(EcoSelectError::invalid_input(
                Stage::MatrixBuild,
                "interaction matrix contains non-finite coefficients",
            ));
        }

        debug!(size = n, "built interaction matrix");
        Ok(matrix)
    }
}
