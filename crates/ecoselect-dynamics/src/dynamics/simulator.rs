//! Discrete-time Lotka-Volterra population update
//!
//! ```text
//! effect_i  = Σ_j A_ij · n_j(t)
//! n_i(t+1)  = n_i(t) · exp(clamp(d · (r_i + effect_i), ±E))
//! n(t+1)   /= Σ_k n_k(t+1)
//! ```
//!
//! Starts from the uniform distribution and stops at the iteration cap or
//! when ‖n(t+1) − n(t)‖₂ < tolerance.

use ecoselect_common::{
    ConfigError, EcoSelectError, InteractionMatrix, Result, Stage, DEFAULT_DAMPING_FACTOR,
    DEFAULT_EXPONENT_CLAMP, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Simulation tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub max_iterations: usize,
    pub damping_factor: f64,
    pub tolerance: f64,
    /// Bound on |d · (r_i + effect_i)| before exponentiation
    pub exponent_clamp: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            damping_factor: DEFAULT_DAMPING_FACTOR,
            tolerance: DEFAULT_TOLERANCE,
            exponent_clamp: DEFAULT_EXPONENT_CLAMP,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !self.damping_factor.is_finite() || self.damping_factor <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "damping_factor",
                reason: format!("must be positive, got {}", self.damping_factor),
            });
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "tolerance",
                reason: format!("must be non-negative, got {}", self.tolerance),
            });
        }
        if !self.exponent_clamp.is_finite() || self.exponent_clamp <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "exponent_clamp",
                reason: format!("must be positive, got {}", self.exponent_clamp),
            });
        }
        Ok(())
    }
}

/// Snapshot returned when a run ends
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    pub final_populations: Vec<f64>,
    pub iterations_used: usize,
    pub converged: bool,
    /// L2 norm of the last population change (0 when no step ran)
    pub last_delta: f64,
}

/// Evolving state, private to a single run
struct SimulationState {
    populations: Vec<f64>,
    iteration: usize,
    last_delta: f64,
}

impl SimulationState {
    fn uniform(n: usize) -> Self {
        Self {
            populations: vec![1.0 / n as f64; n],
            iteration: 0,
            last_delta: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PopulationDynamicsSimulator {
    config: SimulationConfig,
}

impl PopulationDynamicsSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Iterate the update rule from the uniform distribution
    #[instrument(skip(self, growth_rates, alpha), fields(n = growth_rates.len()))]
    pub fn simulate(
        &self,
        growth_rates: &[f64],
        alpha: &InteractionMatrix,
    ) -> Result<SimulationOutcome> {
        let n = growth_rates.len();
        if alpha.size() != n {
            return Err(EcoSelectError::invalid_input(
                Stage::Simulation,
                format!("{} growth rates but {}x{} matrix", n, alpha.size(), alpha.size()),
            ));
        }
        if let Some(i) = growth_rates.iter().position(|r| !r.is_finite()) {
            return Err(EcoSelectError::instability(
                0,
                format!("growth rate {} is {}", i, growth_rates[i]),
            ));
        }
        if !alpha.all_finite() {
            return Err(EcoSelectError::instability(
                0,
                "interaction matrix contains non-finite coefficients",
            ));
        }

        if n == 0 {
            return Ok(SimulationOutcome {
                final_populations: Vec::new(),
                iterations_used: 0,
                converged: true,
                last_delta: 0.0,
            });
        }

        let mut state = SimulationState::uniform(n);
        let mut converged = false;

        while state.iteration < self.config.max_iterations {
            let next = self.step(&state.populations, growth_rates, alpha, state.iteration + 1)?;
            let delta = l2_distance(&next, &state.populations);

            state.populations = next;
            state.iteration += 1;
            state.last_delta = delta;

            if delta < self.config.tolerance {
                converged = true;
                break;
            }
        }

        if converged {
            debug!(iterations = state.iteration, delta = state.last_delta, "populations converged");
        } else {
            warn!(
                iterations = state.iteration,
                delta = state.last_delta,
                "iteration cap reached before convergence"
            );
        }

        Ok(SimulationOutcome {
            final_populations: state.populations,
            iterations_used: state.iteration,
            converged,
            last_delta: state.last_delta,
        })
    }

    fn step(
        &self,
        populations: &[f64],
        growth_rates: &[f64],
        alpha: &InteractionMatrix,
        iteration: usize,
    ) -> Result<Vec<f64>> {
        let clamp = self.config.exponent_clamp;
        let effects = alpha.apply(populations);

        let mut next: Vec<f64> = populations
            .iter()
            .zip(growth_rates)
            .zip(&effects)
            .map(|((n, r), effect)| {
                let exponent = (self.config.damping_factor * (r + effect)).clamp(-clamp, clamp);
                n * exponent.exp()
            })
            .collect();

        let total: f64 = next.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(EcoSelectError::instability(
                iteration,
                format!("population total is {}", total),
            ));
        }

        for n in &mut next {
            *n /= total;
        }

        if let Some(i) = next.iter().position(|n| !n.is_finite()) {
            return Err(EcoSelectError::instability(
                iteration,
                format!("population {} is {}", i, next[i]),
            ));
        }

        Ok(next)
    }
}

fn l2_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn simulator(max_iterations: usize, tolerance: f64) -> PopulationDynamicsSimulator {
        PopulationDynamicsSimulator::new(SimulationConfig {
            max_iterations,
            tolerance,
            ..Default::default()
        })
    }

    #[test]
    fn test_empty() {
        let out = simulator(10, 1e-6)
            .simulate(&[], &InteractionMatrix::zeros(0))
            .unwrap();
        assert!(out.final_populations.is_empty());
        assert_eq!(out.iterations_used, 0);
    }

    #[test]
    fn test_single_candidate() {
        let out = simulator(10, 1e-6)
            .simulate(&[0.7], &InteractionMatrix::zeros(1))
            .unwrap();
        assert_eq!(out.final_populations, vec![1.0]);
        assert!(out.converged);
        assert_eq!(out.iterations_used, 1);
    }

    #[test]
    fn test_identical_candidates_stay_uniform() {
        let alpha = InteractionMatrix::from_rows(vec![
            vec![0.0, -0.5, -0.5],
            vec![-0.5, 0.0, -0.5],
            vec![-0.5, -0.5, 0.0],
        ])
        .unwrap();
        let out = simulator(10, 1e-9).simulate(&[0.4, 0.4, 0.4], &alpha).unwrap();
        assert!(out.converged);
        for p in &out.final_populations {
            assert!((p - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_higher_growth_gains_share() {
        let out = simulator(10, 1e-12)
            .simulate(&[0.9, 0.1], &InteractionMatrix::zeros(2))
            .unwrap();
        assert!(out.final_populations[0] > out.final_populations[1]);
    }

    #[test]
    fn test_non_convergence_reported() {
        let alpha =
            InteractionMatrix::from_rows(vec![vec![0.0, -1.2], vec![-1.2, 0.0]]).unwrap();
        let out = simulator(2, 1e-12).simulate(&[1.0, 0.2], &alpha).unwrap();

        assert!(!out.converged);
        assert_eq!(out.iterations_used, 2);
        assert!(out.last_delta > 0.0);
        let total: f64 = out.final_populations.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(out.final_populations.iter().all(|p| p.is_finite() && *p >= 0.0));
    }

    #[test]
    fn test_zero_iterations_returns_uniform() {
        let out = simulator(0, 1e-6)
            .simulate(&[0.3, 0.6], &InteractionMatrix::zeros(2))
            .unwrap();
        assert_eq!(out.final_populations, vec![0.5, 0.5]);
        assert_eq!(out.iterations_used, 0);
        assert!(!out.converged);
    }

    #[test]
    fn test_non_finite_growth_rate_is_fatal() {
        let err = simulator(10, 1e-6)
            .simulate(&[f64::NAN, 0.2], &InteractionMatrix::zeros(2))
            .unwrap_err();
        assert!(matches!(err, EcoSelectError::NumericInstability { .. }));
        assert_eq!(err.stage(), Stage::Simulation);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let err = simulator(10, 1e-6)
            .simulate(&[0.1, 0.2], &InteractionMatrix::zeros(3))
            .unwrap_err();
        assert!(matches!(err, EcoSelectError::InvalidInput { .. }));
    }

    #[test]
    fn test_extreme_damping_is_clamped() {
        let sim = PopulationDynamicsSimulator::new(SimulationConfig {
            damping_factor: 1e6,
            ..Default::default()
        });
        let out = sim
            .simulate(&[1.0, 0.0, 0.5], &InteractionMatrix::zeros(3))
            .unwrap();
        let total: f64 = out.final_populations.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(out.final_populations.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_validate() {
        assert!(SimulationConfig::default().validate().is_ok());
        let bad = SimulationConfig {
            damping_factor: 0.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    fn rates_and_matrix() -> impl Strategy<Value = (Vec<f64>, InteractionMatrix)> {
        (1usize..8).prop_flat_map(|n| {
            (
                prop::collection::vec(0.0f64..1.0, n),
                prop::collection::vec(-1.2f64..0.05, n * n),
            )
                .prop_map(move |(rates, raw)| {
                    let mut m = InteractionMatrix::zeros(n);
                    for i in 0..n {
                        for j in (i + 1)..n {
                            m.set(i, j, raw[i * n + j]);
                            m.set(j, i, raw[i * n + j]);
                        }
                    }
                    (rates, m)
                })
        })
    }

    proptest! {
        #[test]
        fn prop_populations_normalised((rates, alpha) in rates_and_matrix(), max_iter in 0usize..30) {
            let out = simulator(max_iter, 1e-6).simulate(&rates, &alpha).unwrap();
            let total: f64 = out.final_populations.iter().sum();
            prop_assert!((total - 1.0).abs() < 1e-6);
            prop_assert!(out.final_populations.iter().all(|p| *p >= 0.0));
            prop_assert!(out.iterations_used <= max_iter);
        }
    }
}
