//! Selection results returned to callers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::matrix::InteractionMatrix;
use super::profile::EntropyRegime;

/// A candidate that survived selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedOutput {
    /// Position of the candidate in the caller's input list
    pub index: usize,
    pub content: String,
    pub content_hash: String,
    pub population: f64,
    pub quality_score: f64,
    pub novelty_score: f64,
    pub strategy_tag: Option<String>,
}

/// Diversity and quality summary of a selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiversityMetrics {
    /// 1 - mean pairwise cosine similarity of the selected outputs
    /// (0 when fewer than two were selected)
    pub semantic_diversity: f64,

    /// Shannon entropy of the final populations, normalised by ln N
    pub population_diversity: f64,

    pub num_selected: usize,

    pub mean_quality: f64,

    pub mean_novelty: f64,
}

/// Read-only eigenvalue diagnostic over the interaction matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityReport {
    /// Eigenvalues of the community matrix `A - I`, ascending
    pub eigenvalues: Vec<f64>,

    pub max_eigenvalue: f64,

    /// All eigenvalues strictly negative
    pub ecosystem_stable: bool,
}

/// Non-fatal conditions observed during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionWarning {
    /// Iteration cap reached before the population delta fell below tolerance
    NotConverged { iterations: usize, last_delta: f64 },
}

/// Everything a selection run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    /// Unique per call; excluded from determinism comparisons
    pub run_id: Uuid,

    /// Unique per call; excluded from determinism comparisons
    pub computed_at: DateTime<Utc>,

    /// Selected outputs, highest population first
    pub selected_outputs: Vec<SelectedOutput>,

    pub entropy: f64,

    pub regime: EntropyRegime,

    /// Per-candidate growth rates, in input order
    pub growth_rates: Vec<f64>,

    pub alpha_matrix: InteractionMatrix,

    /// Converged population shares, in input order
    pub final_populations: Vec<f64>,

    pub convergence_iterations: usize,

    pub converged: bool,

    pub diversity_metrics: DiversityMetrics,

    pub stability: Option<StabilityReport>,

    pub warnings: Vec<SelectionWarning>,
}

impl SelectionResult {
    /// Degenerate result for a run with no candidates
    pub fn empty(entropy: f64, regime: EntropyRegime) -> Self {
        Self {
            run_id: Uuid::now_v7(),
            computed_at: Utc::now(),
            selected_outputs: Vec::new(),
            entropy,
            regime,
            growth_rates: Vec::new(),
            alpha_matrix: InteractionMatrix::zeros(0),
            final_populations: Vec::new(),
            convergence_iterations: 0,
            converged: true,
            diversity_metrics: DiversityMetrics::default(),
            stability: None,
            warnings: Vec::new(),
        }
    }

    /// Content of the selected outputs, in rank order
    pub fn selected_contents(&self) -> Vec<&str> {
        self.selected_outputs
            .iter()
            .map(|o| o.content.as_str())
            .collect()
    }

    /// Compare everything except `run_id` and `computed_at`
    pub fn same_outcome(&self, other: &SelectionResult) -> bool {
        self.selected_outputs == other.selected_outputs
            && self.entropy.to_bits() == other.entropy.to_bits()
            && self.regime == other.regime
            && bits_eq(&self.growth_rates, &other.growth_rates)
            && self.alpha_matrix == other.alpha_matrix
            && bits_eq(&self.final_populations, &other.final_populations)
            && self.convergence_iterations == other.convergence_iterations
            && self.converged == other.converged
            && self.diversity_metrics == other.diversity_metrics
            && self.stability == other.stability
            && self.warnings == other.warnings
    }
}

fn bits_eq(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result() {
        let r = SelectionResult::empty(0.1, EntropyRegime::Precision);
        assert!(r.selected_outputs.is_empty());
        assert!(r.alpha_matrix.is_empty());
        assert_eq!(r.diversity_metrics.semantic_diversity, 0.0);
        assert!(r.converged);
    }

    #[test]
    fn test_same_outcome_ignores_run_identity() {
        let a = SelectionResult::empty(0.2, EntropyRegime::Precision);
        let b = SelectionResult::empty(0.2, EntropyRegime::Precision);
        assert_ne!(a.run_id, b.run_id);
        assert!(a.same_outcome(&b));

        let c = SelectionResult::empty(0.5, EntropyRegime::Balanced);
        assert!(!a.same_outcome(&c));
    }

    #[test]
    fn test_warning_serialization() {
        let w = SelectionWarning::NotConverged {
            iterations: 2,
            last_delta: 0.01,
        };
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["kind"], "not_converged");
        assert_eq!(json["iterations"], 2);
    }
}
