//! Prompt entropy estimation
//!
//! Scores how open-ended a prompt is, from 0.0 (one correct answer) to 1.0
//! (many equally valid answers), by blending three signals:
//!
//! ```text
//! lexical  = 0.5 + 0.5·tanh((open - closed) / 2)
//! length   = min(1, words / 40)
//! question = min(1, (extra '?' + conjunctions) / 3)
//!
//! entropy  = 0.65·lexical + 0.15·length + 0.20·question
//! ```
//!
//! `open` and `closed` count cue hits. A cue matches a whole token or a
//! simple inflection of it ("idea" matches "ideas", never "ideal"). One cue
//! moves the lexical signal by about a quarter; it takes several open cues
//! to reach the creativity regime.
//!
//! With a prompt history the blend is scaled by 0.8 and the mean lexical
//! signal of the history contributes the remaining 0.2.

use ecoselect_dynamics::fitness::scoring::tokenize;
use serde::{Deserialize, Serialize};

/// Entropy of an empty prompt: low, but not zero
pub const EMPTY_PROMPT_ENTROPY: f64 = 0.1;

/// Cue difference at which the lexical signal reaches tanh(1)
const CUE_SCALE: f64 = 2.0;

/// Inflections accepted after a single-word cue
const CUE_SUFFIXES: &[&str] = &["s", "es", "d", "ed", "ing", "ly"];

/// Cues suggesting many valid answers
const OPEN_CUES: &[&str] = &[
    "brainstorm",
    "explore",
    "imagine",
    "creative",
    "diverse",
    "alternative",
    "idea",
    "innovative",
    "novel",
    "possibility",
    "different",
    "variety",
    "multiple",
    "way",
    "approach",
    "invent",
    "design",
    "generate",
    "suggest",
];

/// Cues suggesting a single correct answer
const CLOSED_CUES: &[&str] = &[
    "what is",
    "what's",
    "calculate",
    "compute",
    "exact",
    "define",
    "definition",
    "how many",
    "how much",
    "when did",
    "when was",
    "who is",
    "who was",
    "which year",
    "convert",
    "solve for",
    "value of",
];

/// Phrases joining alternative sub-questions
const CONJUNCTIONS: &[&str] = &["or", "and also", "versus", "vs"];

/// Individual signal values for one prompt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntropySignals {
    pub lexical: f64,
    pub length: f64,
    pub question: f64,
}

/// Signal weights and saturation points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropyEstimator {
    pub lexical_weight: f64,
    pub length_weight: f64,
    pub question_weight: f64,
    /// Share of the final score taken by the history signal
    pub history_weight: f64,
    /// Word count at which the length signal saturates
    pub length_saturation_words: f64,
    /// Extra question marks plus conjunctions at which the question signal saturates
    pub question_saturation: f64,
}

impl Default for EntropyEstimator {
    fn default() -> Self {
        Self {
            lexical_weight: 0.65,
            length_weight: 0.15,
            question_weight: 0.20,
            history_weight: 0.2,
            length_saturation_words: 40.0,
            question_saturation: 3.0,
        }
    }
}

impl EntropyEstimator {
    /// Estimate prompt entropy in [0, 1]; deterministic, never fails
    pub fn estimate_prompt_entropy(&self, prompt: &str, history: Option<&[String]>) -> f64 {
        if prompt.trim().is_empty() {
            return EMPTY_PROMPT_ENTROPY;
        }

        let signals = self.signals(prompt);
        let base = self.lexical_weight * signals.lexical
            + self.length_weight * signals.length
            + self.question_weight * signals.question;

        let history_signal = history.and_then(|h| self.history_signal(h));
        let entropy = match history_signal {
            Some(h) => (1.0 - self.history_weight) * base + self.history_weight * h,
            None => base,
        };

        entropy.clamp(0.0, 1.0)
    }

    /// Compute the three prompt signals
    pub fn signals(&self, prompt: &str) -> EntropySignals {
        let tokens = tokenize(prompt);

        let extra_questions = prompt.matches('?').count().saturating_sub(1);
        let conjunctions: usize = CONJUNCTIONS.iter().map(|c| phrase_count(&tokens, c)).sum();

        EntropySignals {
            lexical: lexical_signal(&tokens),
            length: (tokens.len() as f64 / self.length_saturation_words).min(1.0),
            question: ((extra_questions + conjunctions) as f64 / self.question_saturation)
                .min(1.0),
        }
    }

    /// Mean lexical signal over non-empty history prompts
    fn history_signal(&self, history: &[String]) -> Option<f64> {
        let scores: Vec<f64> = history
            .iter()
            .filter(|h| !h.trim().is_empty())
            .map(|h| lexical_signal(&tokenize(h)))
            .collect();
        if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        }
    }
}

fn lexical_signal(tokens: &[String]) -> f64 {
    let open = cue_hits(tokens, OPEN_CUES) as f64;
    let closed = cue_hits(tokens, CLOSED_CUES) as f64;
    0.5 + 0.5 * ((open - closed) / CUE_SCALE).tanh()
}

/// Single-word cues match a whole token, at most once per token;
/// multi-word cues match the token sequence.
fn cue_hits(tokens: &[String], cues: &[&str]) -> usize {
    let (words, phrases): (Vec<Vec<String>>, Vec<Vec<String>>) =
        cues.iter().map(|c| tokenize(c)).partition(|t| t.len() == 1);

    let word_hits = tokens
        .iter()
        .filter(|t| words.iter().any(|w| matches_cue(t, &w[0])))
        .count();
    let phrase_hits: usize = phrases.iter().map(|p| sequence_count(tokens, p)).sum();

    word_hits + phrase_hits
}

/// `token` is `cue` itself or `cue` plus a plain inflection
/// (imagine → imagined, imagining; variety → varieties)
fn matches_cue(token: &str, cue: &str) -> bool {
    if token == cue {
        return true;
    }
    if let Some(stem) = token.strip_suffix("ies") {
        if cue.strip_suffix('y') == Some(stem) {
            return true;
        }
    }
    let silent_e = cue.strip_suffix('e');
    CUE_SUFFIXES
        .iter()
        .filter_map(|suffix| token.strip_suffix(*suffix))
        .any(|stem| stem == cue || Some(stem) == silent_e)
}

fn phrase_count(tokens: &[String], phrase: &str) -> usize {
    sequence_count(tokens, &tokenize(phrase))
}

fn sequence_count(tokens: &[String], phrase: &[String]) -> usize {
    if phrase.is_empty() || phrase.len() > tokens.len() {
        return 0;
    }
    tokens.windows(phrase.len()).filter(|w| *w == phrase).count()
}
