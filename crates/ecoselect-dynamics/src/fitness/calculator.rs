//! Growth rate: r = w_q·quality + w_n·novelty + w_b·bias + w_c·cost
//!
//! Weights come from the [`EntropyProfile`] regime selected by the prompt
//! entropy.

use std::sync::Arc;

use ecoselect_common::{
    similarity::candidate_similarities, Candidate, EcoSelectError, EntropyProfile, Result, Stage,
};
use tracing::debug;

use super::scoring::{CandidateScorer, HeuristicScorer};

pub struct GrowthRateCalculator {
    scorer: Arc<dyn CandidateScorer>,
}

impl Default for GrowthRateCalculator {
    fn default() -> Self {
        Self::new(Arc::new(HeuristicScorer))
    }
}

impl GrowthRateCalculator {
    pub fn new(scorer: Arc<dyn CandidateScorer>) -> Self {
        Self { scorer }
    }

    /// Fill in quality, novelty, bias and cost for every candidate.
    ///
    /// `embeddings[i]` must belong to `candidates[i]`.
    pub fn score_candidates(
        &self,
        candidates: &mut [Candidate],
        embeddings: &[Vec<f32>],
    ) -> Result<()> {
        if candidates.len() != embeddings.len() {
            return Err(EcoSelectError::invalid_input(
                Stage::ScoringRates,
                format!(
                    "{} candidates but {} embeddings",
                    candidates.len(),
                    embeddings.len()
                ),
            ));
        }

        let novelty = Self::novelty_scores(candidates, embeddings);
        for (candidate, novelty) in candidates.iter_mut().zip(novelty) {
            candidate.quality_score = self.scorer.quality(candidate.content()).clamp(0.0, 1.0);
            candidate.bias_score = self.scorer.bias(candidate.content()).clamp(0.0, 1.0);
            candidate.cost_score = self.scorer.cost(candidate.content()).clamp(0.0, 1.0);
            candidate.novelty_score = novelty;
        }
        Ok(())
    }

    /// 1 - max cosine similarity to any other candidate.
    ///
    /// A lone candidate is maximally novel; an exact duplicate has none.
    pub fn novelty_scores(candidates: &[Candidate], embeddings: &[Vec<f32>]) -> Vec<f64> {
        let n = embeddings.len();
        let sims = candidate_similarities(candidates, embeddings);
        (0..n)
            .map(|i| {
                let max_sim = (0..n)
                    .filter(|&j| j != i)
                    .map(|j| sims[i * n + j])
                    .fold(f64::NEG_INFINITY, f64::max);
                if max_sim.is_finite() {
                    (1.0 - max_sim).clamp(0.0, 1.0)
                } else {
                    1.0
                }
            })
            .collect()
    }

    /// Combine the stored scores with the regime weights for `entropy`
    pub fn compute_growth_rates(
        candidates: &[Candidate],
        entropy: f64,
        profile: &EntropyProfile,
    ) -> Vec<f64> {
        let regime = profile.regime(entropy);
        let weights = profile.weights(regime);
        debug!(%regime, entropy, count = candidates.len(), "computing growth rates");

        candidates
            .iter()
            .map(|c| {
                weights.combine(c.quality_score, c.novelty_score, c.bias_score, c.cost_score)
            })
            .collect()
    }
}
