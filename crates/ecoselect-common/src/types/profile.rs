//! Entropy profile - how growth-rate weights vary with prompt entropy
//!
//! Entropy in [0, 1] is partitioned into three regimes:
//!
//! ```text
//! 0 ────── low ────── high ────── 1
//!  precision   balanced   creativity
//! ```
//!
//! Boundary values belong to the lower regime: `entropy <= low` is
//! precision, `entropy <= high` is balanced, everything above is creativity.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Allowed deviation of a weight tuple's sum from 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Selection regime derived from prompt entropy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntropyRegime {
    /// Closed-form prompts: favour quality
    Precision,
    /// Mixed prompts: quality with some exploration
    Balanced,
    /// Open-ended prompts: favour novelty
    Creativity,
}

impl std::fmt::Display for EntropyRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntropyRegime::Precision => f.write_str("precision"),
            EntropyRegime::Balanced => f.write_str("balanced"),
            EntropyRegime::Creativity => f.write_str("creativity"),
        }
    }
}

/// Growth-rate weights for one regime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeWeights {
    pub quality: f64,
    pub novelty: f64,
    pub bias: f64,
    pub cost: f64,
}

impl RegimeWeights {
    pub const fn new(quality: f64, novelty: f64, bias: f64, cost: f64) -> Self {
        Self {
            quality,
            novelty,
            bias,
            cost,
        }
    }

    pub fn sum(&self) -> f64 {
        self.quality + self.novelty + self.bias + self.cost
    }

    /// r = w_q·q + w_n·n + w_b·b + w_c·c
    #[inline]
    pub fn combine(&self, quality: f64, novelty: f64, bias: f64, cost: f64) -> f64 {
        self.quality * quality + self.novelty * novelty + self.bias * bias + self.cost * cost
    }

    fn validate(&self, regime: EntropyRegime) -> Result<(), ConfigError> {
        let components = [self.quality, self.novelty, self.bias, self.cost];
        let sum = self.sum();
        if components.iter().any(|w| !w.is_finite() || *w < 0.0)
            || (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE
        {
            return Err(ConfigError::WeightSum {
                regime: regime.to_string(),
                sum,
            });
        }
        Ok(())
    }
}

/// Thresholds and per-regime weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropyProfile {
    pub low_threshold: f64,
    pub high_threshold: f64,
    pub precision: RegimeWeights,
    pub balanced: RegimeWeights,
    pub creativity: RegimeWeights,
}

impl Default for EntropyProfile {
    fn default() -> Self {
        Self {
            low_threshold: 0.3,
            high_threshold: 0.6,
            precision: RegimeWeights::new(0.9, 0.0, 0.05, 0.05),
            balanced: RegimeWeights::new(0.6, 0.3, 0.05, 0.05),
            creativity: RegimeWeights::new(0.2, 0.7, 0.05, 0.05),
        }
    }
}

impl EntropyProfile {
    /// Check threshold ordering and weight sums
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (low, high) = (self.low_threshold, self.high_threshold);
        if !(low.is_finite() && high.is_finite() && 0.0 <= low && low < high && high <= 1.0) {
            return Err(ConfigError::ThresholdOrder { low, high });
        }
        self.precision.validate(EntropyRegime::Precision)?;
        self.balanced.validate(EntropyRegime::Balanced)?;
        self.creativity.validate(EntropyRegime::Creativity)?;
        Ok(())
    }

    /// Regime for an entropy value; ties go to the lower regime
    pub fn regime(&self, entropy: f64) -> EntropyRegime {
        if entropy <= self.low_threshold {
            EntropyRegime::Precision
        } else if entropy <= self.high_threshold {
            EntropyRegime::Balanced
        } else {
            EntropyRegime::Creativity
        }
    }

    pub fn weights(&self, regime: EntropyRegime) -> &RegimeWeights {
        match regime {
            EntropyRegime::Precision => &self.precision,
            EntropyRegime::Balanced => &self.balanced,
            EntropyRegime::Creativity => &self.creativity,
        }
    }

    /// Weights for an entropy value
    pub fn weights_for(&self, entropy: f64) -> &RegimeWeights {
        self.weights(self.regime(entropy))
    }
}
