//! Per-candidate scoring heuristics
//!
//! Quality, bias and cost are pluggable through [`CandidateScorer`]. The
//! defaults are cheap lexical heuristics; an external judge can replace any
//! of them. Novelty is not pluggable: it is defined by embedding similarity
//! and computed by the growth-rate calculator.

/// Token count at which the length component of quality saturates
const QUALITY_SATURATION_TOKENS: f64 = 12.0;

/// Character count at which the cost score halves
const COST_HALF_LENGTH_CHARS: f64 = 200.0;

/// Quality deducted per filler phrase
const FILLER_PENALTY: f64 = 0.2;

const FILLER_PHRASES: &[&str] = &[
    "as an ai",
    "i think",
    "basically",
    "in conclusion",
    "it is important to note",
    "needless to say",
    "to be honest",
    "kind of",
    "sort of",
    "you know",
];

/// Scoring functions feeding the growth rate; every score is in [0, 1]
pub trait CandidateScorer: Send + Sync {
    /// Informativeness of the content
    fn quality(&self, content: &str) -> f64 {
        heuristic_quality(content)
    }

    /// Non-degeneracy: 1.0 for no internal repetition
    fn bias(&self, content: &str) -> f64 {
        heuristic_bias(content)
    }

    /// Conciseness: 1.0 for empty content, decaying with length
    fn cost(&self, content: &str) -> f64 {
        heuristic_cost(content)
    }
}

/// Default scorer using the lexical heuristics
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

impl CandidateScorer for HeuristicScorer {}

/// Lowercased alphanumeric tokens
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

fn unique_ratio(tokens: &[String]) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let unique: std::collections::HashSet<&String> = tokens.iter().collect();
    unique.len() as f64 / tokens.len() as f64
}

/// Length-normalised informativeness minus filler penalties
pub fn heuristic_quality(content: &str) -> f64 {
    let tokens = tokenize(content);
    if tokens.is_empty() {
        return 0.0;
    }

    let length_factor = (tokens.len() as f64 / QUALITY_SATURATION_TOKENS).min(1.0);
    let lexical_diversity = unique_ratio(&tokens);

    let normalized = format!(" {} ", tokens.join(" "));
    let filler_hits = FILLER_PHRASES
        .iter()
        .filter(|p| normalized.contains(&format!(" {} ", p)))
        .count() as f64;

    (0.6 * length_factor + 0.4 * lexical_diversity - FILLER_PENALTY * filler_hits).clamp(0.0, 1.0)
}

/// Inverse of the internal repetition ratio
pub fn heuristic_bias(content: &str) -> f64 {
    unique_ratio(&tokenize(content))
}

/// Inverse of length
pub fn heuristic_cost(content: &str) -> f64 {
    let chars = content.chars().count() as f64;
    1.0 / (1.0 + chars / COST_HALF_LENGTH_CHARS)
}
