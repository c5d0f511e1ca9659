//! Candidate - one proposed output under selection
//!
//! A candidate is created once per input string at the start of a selection
//! run, scored, mutated in place while the simulation runs, and dropped when
//! the run returns.

use serde::{Deserialize, Serialize};

/// One proposed output string plus its derived scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Textual output
    content: String,

    /// BLAKE3 hex digest of `content`
    content_hash: String,

    /// Informativeness (0.0 - 1.0)
    pub quality_score: f64,

    /// Distance from the nearest other candidate (0.0 - 1.0)
    pub novelty_score: f64,

    /// Non-degeneracy: 1.0 for text with no internal repetition (0.0 - 1.0)
    pub bias_score: f64,

    /// Conciseness: 1.0 for very short text (0.0 - 1.0)
    pub cost_score: f64,

    /// Simulation state, renormalized every iteration
    pub population: f64,

    /// Coarse generation strategy ("conservative", "creative", ...)
    pub strategy_tag: Option<String>,
}

impl Candidate {
    /// Create an unscored candidate
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let content_hash = Self::hash_content(&content);
        Self {
            content,
            content_hash,
            quality_score: 0.0,
            novelty_score: 0.0,
            bias_score: 0.0,
            cost_score: 0.0,
            population: 0.0,
            strategy_tag: None,
        }
    }

    /// Create a candidate tagged with a generation strategy
    pub fn with_strategy(content: impl Into<String>, strategy: impl Into<String>) -> Self {
        let mut candidate = Self::new(content);
        candidate.strategy_tag = Some(strategy.into());
        candidate
    }

    /// Stable content identifier
    pub fn hash_content(content: &str) -> String {
        blake3::hash(content.as_bytes()).to_hex().to_string()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// Whether two candidates share a strategy for interaction purposes.
    ///
    /// Two untagged candidates count as the same strategy.
    pub fn same_strategy(&self, other: &Candidate) -> bool {
        self.strategy_tag == other.strategy_tag
    }

    /// Whether both candidates are tagged and the tags differ
    pub fn complementary_strategy(&self, other: &Candidate) -> bool {
        matches!(
            (&self.strategy_tag, &other.strategy_tag),
            (Some(a), Some(b)) if a != b
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable() {
        let a = Candidate::new("Paris");
        let b = Candidate::new("Paris");
        let c = Candidate::new("Lyon");

        assert_eq!(a.content_hash(), b.content_hash());
        assert_ne!(a.content_hash(), c.content_hash());
        assert_eq!(a.content_hash().len(), 64);
    }

    #[test]
    fn test_new_candidate_is_unscored() {
        let c = Candidate::new("text");
        assert_eq!(c.quality_score, 0.0);
        assert_eq!(c.novelty_score, 0.0);
        assert_eq!(c.population, 0.0);
        assert!(c.strategy_tag.is_none());
    }

    #[test]
    fn test_strategy_relations() {
        let untagged_a = Candidate::new("a");
        let untagged_b = Candidate::new("b");
        let creative = Candidate::with_strategy("c", "creative");
        let conservative = Candidate::with_strategy("d", "conservative");
        let creative_2 = Candidate::with_strategy("e", "creative");

        assert!(untagged_a.same_strategy(&untagged_b));
        assert!(creative.same_strategy(&creative_2));
        assert!(creative.complementary_strategy(&conservative));

        // One tagged, one untagged: neither same nor complementary
        assert!(!creative.same_strategy(&untagged_a));
        assert!(!creative.complementary_strategy(&untagged_a));
    }
}
