//! Caller-supplied metadata for a selection run

use std::collections::HashMap;

use ecoselect_common::{EcoSelectError, Result, Stage};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Optional context passed to `select_diverse_outputs`
///
/// Unknown keys are kept in `extra` and otherwise ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionContext {
    /// Prior prompts in the conversation, oldest first
    #[serde(default)]
    pub history: Vec<String>,

    /// One optional strategy tag per candidate; empty means untagged
    #[serde(default)]
    pub strategy_tags: Vec<Option<String>>,

    /// Externally judged quality per candidate, replacing the heuristic
    #[serde(default)]
    pub quality_scores: Option<Vec<f64>>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl SelectionContext {
    pub fn with_history(history: Vec<String>) -> Self {
        Self {
            history,
            ..Default::default()
        }
    }

    /// Parse from a loosely-typed JSON map
    pub fn from_json_map(map: serde_json::Map<String, Value>) -> Result<Self> {
        serde_json::from_value(Value::Object(map)).map_err(|e| {
            EcoSelectError::invalid_input(Stage::Configuration, format!("bad context: {}", e))
        })
    }

    pub fn history(&self) -> Option<&[String]> {
        if self.history.is_empty() {
            None
        } else {
            Some(&self.history)
        }
    }

    /// Tag for candidate `index`, if any
    pub fn strategy_tag(&self, index: usize) -> Option<&str> {
        self.strategy_tags.get(index).and_then(|t| t.as_deref())
    }

    /// Check per-candidate fields against the candidate count
    pub fn validate_for(&self, candidate_count: usize) -> Result<()> {
        if !self.strategy_tags.is_empty() && self.strategy_tags.len() != candidate_count {
            return Err(EcoSelectError::invalid_input(
                Stage::Configuration,
                format!(
                    "{} strategy tags for {} candidates",
                    self.strategy_tags.len(),
                    candidate_count
                ),
            ));
        }

        if let Some(scores) = &self.quality_scores {
            if scores.len() != candidate_count {
                return Err(EcoSelectError::invalid_input(
                    Stage::ScoringRates,
                    format!("{} quality scores for {} candidates", scores.len(), candidate_count),
                ));
            }
            if let Some(i) = scores
                .iter()
                .position(|s| !s.is_finite() || !(0.0..=1.0).contains(s))
            {
                return Err(EcoSelectError::invalid_input(
                    Stage::ScoringRates,
                    format!("quality score {} is {}, expected [0, 1]", i, scores[i]),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_map() {
        let Value::Object(map) = json!({
            "history": ["earlier question"],
            "strategy_tags": ["creative", null],
            "session": "abc"
        }) else {
            unreachable!()
        };
        let ctx = SelectionContext::from_json_map(map).unwrap();

        assert_eq!(ctx.history(), Some(&["earlier question".to_string()][..]));
        assert_eq!(ctx.strategy_tag(0), Some("creative"));
        assert_eq!(ctx.strategy_tag(1), None);
        assert_eq!(ctx.strategy_tag(7), None);
        assert_eq!(ctx.extra.get("session"), Some(&json!("abc")));
    }

    #[test]
    fn test_bad_field_type() {
        let Value::Object(map) = json!({ "history": 3 }) else {
            unreachable!()
        };
        let err = SelectionContext::from_json_map(map).unwrap_err();
        assert!(matches!(err, EcoSelectError::InvalidInput { .. }));
    }

    #[test]
    fn test_validate_lengths() {
        let ctx = SelectionContext {
            strategy_tags: vec![Some("a".into())],
            ..Default::default()
        };
        assert!(ctx.validate_for(1).is_ok());
        assert_eq!(ctx.validate_for(2).unwrap_err().stage(), Stage::Configuration);

        let ctx = SelectionContext {
            quality_scores: Some(vec![0.5, 1.2]),
            ..Default::default()
        };
        assert_eq!(ctx.validate_for(2).unwrap_err().stage(), Stage::ScoringRates);
    }

    #[test]
    fn test_empty_history_is_none() {
        assert!(SelectionContext::default().history().is_none());
        assert!(SelectionContext::with_history(vec!["q".into()]).history().is_some());
    }
}
