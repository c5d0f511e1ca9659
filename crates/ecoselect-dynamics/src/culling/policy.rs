//! Selection policy: rank by population, keep while the share stays above the floor
//!
//! Candidates are taken in descending population order until either
//! `max_selected` is reached or the next share drops below the floor
//! (`1/(2N)` unless configured). The top-ranked candidate is always kept.

use ecoselect_common::{
    similarity::mean_pairwise_similarity, Candidate, ConfigError, DiversityMetrics,
    EcoSelectError, Result, SelectedOutput, Stage, DEFAULT_MAX_SELECTED,
};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    /// Cap on the number of selected outputs
    pub max_selected: usize,
    /// Minimum population share for inclusion; `None` means half of uniform
    pub min_population_floor: Option<f64>,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            max_selected: DEFAULT_MAX_SELECTED,
            min_population_floor: None,
        }
    }
}

impl SelectionPolicy {
    pub fn new(max_selected: usize, min_population_floor: Option<f64>) -> Self {
        Self {
            max_selected,
            min_population_floor,
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.max_selected == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_selected",
                reason: "must be at least 1".to_string(),
            });
        }
        if let Some(floor) = self.min_population_floor {
            if !(0.0..=1.0).contains(&floor) {
                return Err(ConfigError::InvalidValue {
                    field: "min_population_floor",
                    reason: format!("must lie in [0, 1], got {}", floor),
                });
            }
        }
        Ok(())
    }

    /// Share below which a candidate is dropped for a population of size n
    pub fn floor(&self, n: usize) -> f64 {
        match self.min_population_floor {
            Some(floor) => floor,
            None if n == 0 => 0.0,
            None => 1.0 / (2.0 * n as f64),
        }
    }

    /// Indices of the kept candidates, highest population first.
    ///
    /// Equal populations keep input order.
    pub fn rank(&self, populations: &[f64]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..populations.len()).collect();
        order.sort_by(|&a, &b| OrderedFloat(populations[b]).cmp(&OrderedFloat(populations[a])));

        let floor = self.floor(populations.len());
        order
            .into_iter()
            .enumerate()
            .take_while(|&(rank, idx)| rank == 0 || populations[idx] >= floor)
            .take(self.max_selected.max(1))
            .map(|(_, idx)| idx)
            .collect()
    }
}

/// What the selector hands back to the facade
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub selected_outputs: Vec<SelectedOutput>,
    pub diversity_metrics: DiversityMetrics,
}

#[derive(Debug, Clone, Default)]
pub struct DiversitySelector {
    policy: SelectionPolicy,
}

impl DiversitySelector {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    /// Pick the final outputs and summarise their diversity
    pub fn select(
        &self,
        candidates: &[Candidate],
        embeddings: &[Vec<f32>],
        final_populations: &[f64],
    ) -> Result<Selection> {
        let n = candidates.len();
        if embeddings.len() != n || final_populations.len() != n {
            return Err(EcoSelectError::invalid_input(
                Stage::Selection,
                format!(
                    "{} candidates, {} embeddings, {} populations",
                    n,
                    embeddings.len(),
                    final_populations.len()
                ),
            ));
        }

        let ranked = self.policy.rank(final_populations);

        let selected_outputs: Vec<SelectedOutput> = ranked
            .iter()
            .map(|&i| {
                let c = &candidates[i];
                SelectedOutput {
                    index: i,
                    content: c.content().to_string(),
                    content_hash: c.content_hash().to_string(),
                    population: final_populations[i],
                    quality_score: c.quality_score,
                    novelty_score: c.novelty_score,
                    strategy_tag: c.strategy_tag.clone(),
                }
            })
            .collect();

        let selected_embeddings: Vec<&[f32]> =
            ranked.iter().map(|&i| embeddings[i].as_slice()).collect();

        let diversity_metrics = DiversityMetrics {
            semantic_diversity: semantic_diversity(&selected_embeddings),
            population_diversity: population_diversity(final_populations),
            num_selected: selected_outputs.len(),
            mean_quality: mean(selected_outputs.iter().map(|o| o.quality_score)),
            mean_novelty: mean(selected_outputs.iter().map(|o| o.novelty_score)),
        };

        Ok(Selection {
            selected_outputs,
            diversity_metrics,
        })
    }
}

/// 1 - mean pairwise cosine similarity; 0 for fewer than two
pub fn semantic_diversity(embeddings: &[&[f32]]) -> f64 {
    mean_pairwise_similarity(embeddings)
        .map(|s| (1.0 - s).clamp(0.0, 1.0))
        .unwrap_or(0.0)
}

/// Shannon entropy of the population shares normalised by ln N
pub fn population_diversity(populations: &[f64]) -> f64 {
    let n = populations.len();
    if n <= 1 {
        return 0.0;
    }
    let h: f64 = populations
        .iter()
        .filter(|p| **p > 0.0)
        .map(|p| -p * p.ln())
        .sum();
    (h / (n as f64).ln()).clamp(0.0, 1.0)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(n: usize) -> Vec<Candidate> {
        (0..n).map(|i| Candidate::new(format!("candidate {}", i))).collect()
    }

    fn orthogonal(n: usize) -> Vec<Vec<f32>> {
        (0..n)
            .map(|i| {
                let mut v = vec![0.0; n];
                v[i] = 1.0;
                v
            })
            .collect()
    }

    #[test]
    fn test_rank_orders_and_floors() {
        let policy = SelectionPolicy::default();
        // Floor for N=4 is 0.125
        let ranked = policy.rank(&[0.1, 0.5, 0.3, 0.1]);
        assert_eq!(ranked, vec![1, 2]);
    }

    #[test]
    fn test_top_always_selected() {
        let policy = SelectionPolicy::new(5, Some(0.9));
        assert_eq!(policy.rank(&[0.2, 0.5, 0.3]), vec![1]);
    }

    #[test]
    fn test_max_selected_caps() {
        let policy = SelectionPolicy::new(2, Some(0.0));
        assert_eq!(policy.rank(&[0.25, 0.25, 0.25, 0.25]), vec![0, 1]);
    }

    #[test]
    fn test_empty_selection() {
        let selection = DiversitySelector::default().select(&[], &[], &[]).unwrap();
        assert!(selection.selected_outputs.is_empty());
        assert_eq!(selection.diversity_metrics.semantic_diversity, 0.0);
        assert_eq!(selection.diversity_metrics.num_selected, 0);
    }

    #[test]
    fn test_single_selection_has_zero_diversity() {
        let selection = DiversitySelector::default()
            .select(&candidates(1), &orthogonal(1), &[1.0])
            .unwrap();
        assert_eq!(selection.selected_outputs.len(), 1);
        assert_eq!(selection.diversity_metrics.semantic_diversity, 0.0);
        assert_eq!(selection.diversity_metrics.population_diversity, 0.0);
    }

    #[test]
    fn test_orthogonal_selection_fully_diverse() {
        let selection = DiversitySelector::default()
            .select(&candidates(4), &orthogonal(4), &[0.25; 4])
            .unwrap();
        assert_eq!(selection.selected_outputs.len(), 4);
        assert!((selection.diversity_metrics.semantic_diversity - 1.0).abs() < 1e-9);
        assert!((selection.diversity_metrics.population_diversity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_selected_carry_scores() {
        let mut cs = candidates(2);
        cs[1].quality_score = 0.8;
        cs[1].novelty_score = 0.6;
        let selection = DiversitySelector::default()
            .select(&cs, &orthogonal(2), &[0.3, 0.7])
            .unwrap();

        let top = &selection.selected_outputs[0];
        assert_eq!(top.index, 1);
        assert_eq!(top.content, "candidate 1");
        assert_eq!(top.population, 0.7);
        assert_eq!(top.quality_score, 0.8);
    }

    #[test]
    fn test_population_diversity_concentrated() {
        assert!(population_diversity(&[1.0, 0.0, 0.0]).abs() < 1e-12);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = DiversitySelector::default()
            .select(&candidates(2), &orthogonal(2), &[1.0])
            .unwrap_err();
        assert_eq!(err.stage(), Stage::Selection);
    }

    #[test]
    fn test_policy_validation() {
        assert!(SelectionPolicy::default().validate().is_ok());
        assert!(SelectionPolicy::new(0, None).validate().is_err());
        assert!(SelectionPolicy::new(3, Some(1.5)).validate().is_err());
    }
}
