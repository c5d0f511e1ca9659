//! LVEcosystem - the selection pipeline
//!
//! ```text
//! prompt ──▶ entropy ──▶ regime weights ─┐
//! candidates ──▶ embed (one batch) ──▶ scores ──▶ growth rates ─┐
//!                               └──▶ alpha matrix ──────────────┴─▶ simulate ─▶ select
//! ```
//!
//! Stages run strictly in order and the first failure aborts the call. An
//! ecosystem holds only read-only configuration and shared services, so a
//! single instance can serve concurrent calls.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ecoselect_common::{
    Candidate, EmbeddingError, Result, SelectionResult, SelectionWarning,
};
use ecoselect_dynamics::{
    CandidateScorer, DiversitySelector, GrowthRateCalculator, HeuristicScorer,
    InteractionMatrixBuilder, PopulationDynamicsSimulator, StabilityValidator,
};
use tracing::{debug, info, instrument};

use super::context::SelectionContext;
use super::entropy::EntropyEstimator;
use crate::config::EcosystemConfig;
use crate::infra::embedding::{validate_batch, EmbeddingService};
use crate::infra::telemetry::SelectionMetrics;

/// Entry point for entropy-adaptive candidate selection
#[derive(Clone)]
pub struct LVEcosystem {
    embedder: Arc<dyn EmbeddingService>,
    config: Arc<EcosystemConfig>,
    estimator: EntropyEstimator,
    scorer: Arc<dyn CandidateScorer>,
    stability: Option<Arc<dyn StabilityValidator>>,
    metrics: Option<Arc<SelectionMetrics>>,
}

impl LVEcosystem {
    /// Create an ecosystem with default configuration and heuristic scoring
    pub fn new(embedder: Arc<dyn EmbeddingService>) -> Self {
        Self {
            embedder,
            config: Arc::new(EcosystemConfig::default()),
            estimator: EntropyEstimator::default(),
            scorer: Arc::new(HeuristicScorer),
            stability: None,
            metrics: None,
        }
    }

    /// Copy of this ecosystem bound to a different configuration
    pub fn with_config(&self, config: EcosystemConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            ..self.clone()
        })
    }

    pub fn with_scorer(mut self, scorer: Arc<dyn CandidateScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_estimator(mut self, estimator: EntropyEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Attach a read-only stability diagnostic
    pub fn with_stability_validator(mut self, validator: Arc<dyn StabilityValidator>) -> Self {
        self.stability = Some(validator);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<SelectionMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &EcosystemConfig {
        &self.config
    }

    pub fn estimate_prompt_entropy(&self, prompt: &str, history: Option<&[String]>) -> f64 {
        self.estimator.estimate_prompt_entropy(prompt, history)
    }

    /// Whether the prompt is open-ended enough to justify generating and
    /// selecting among several candidates
    pub fn should_enhance(&self, prompt: &str, history: Option<&[String]>) -> bool {
        self.estimate_prompt_entropy(prompt, history) > self.config.enhancement_threshold
    }

    /// Select a diverse, quality-weighted subset of `candidates`
    pub async fn select_diverse_outputs(
        &self,
        candidates: &[String],
        prompt: &str,
        context: Option<&SelectionContext>,
    ) -> Result<SelectionResult> {
        self.select_diverse_outputs_with(&self.config, candidates, prompt, context)
            .await
    }

    /// Same as [`select_diverse_outputs`](Self::select_diverse_outputs) with
    /// a per-call configuration
    #[instrument(
        skip(self, config, candidates, prompt, context),
        fields(candidates = candidates.len())
    )]
    pub async fn select_diverse_outputs_with(
        &self,
        config: &EcosystemConfig,
        candidates: &[String],
        prompt: &str,
        context: Option<&SelectionContext>,
    ) -> Result<SelectionResult> {
        let started = Instant::now();
        if let Some(metrics) = &self.metrics {
            metrics.runs_total.inc();
        }

        let outcome = self.run(config, candidates, prompt, context).await;

        let elapsed = started.elapsed().as_secs_f64();
        match &outcome {
            Ok(result) => {
                info!(
                    selected = result.selected_outputs.len(),
                    entropy = result.entropy,
                    regime = %result.regime,
                    iterations = result.convergence_iterations,
                    converged = result.converged,
                    "selection complete"
                );
                if let Some(metrics) = &self.metrics {
                    metrics.record_success(result, elapsed);
                }
            }
            Err(e) => {
                info!(stage = %e.stage(), error = %e, "selection failed");
                if let Some(metrics) = &self.metrics {
                    metrics.record_failure(e.stage(), elapsed);
                }
            }
        }
        outcome
    }

    async fn run(
        &self,
        config: &EcosystemConfig,
        contents: &[String],
        prompt: &str,
        context: Option<&SelectionContext>,
    ) -> Result<SelectionResult> {
        config.validate()?;

        // Entropy
        let history = context.and_then(|c| c.history());
        let entropy = self.estimator.estimate_prompt_entropy(prompt, history);
        let regime = config.entropy_profile.regime(entropy);
        debug!(entropy, %regime, "estimated prompt entropy");

        if contents.is_empty() {
            return Ok(SelectionResult::empty(entropy, regime));
        }
        if let Some(ctx) = context {
            ctx.validate_for(contents.len())?;
        }

        // Embeddings
        let embeddings = self.embed(contents, config.embedding_timeout_ms).await?;

        // Scores and growth rates
        let mut candidates: Vec<Candidate> = contents
            .iter()
            .enumerate()
            .map(|(i, content)| {
                let mut candidate = Candidate::new(content.as_str());
                candidate.strategy_tag = context
                    .and_then(|c| c.strategy_tag(i))
                    .map(str::to_string);
                candidate
            })
            .collect();

        GrowthRateCalculator::new(self.scorer.clone())
            .score_candidates(&mut candidates, &embeddings)?;
        if let Some(scores) = context.and_then(|c| c.quality_scores.as_ref()) {
            for (candidate, score) in candidates.iter_mut().zip(scores) {
                candidate.quality_score = *score;
            }
        }
        let growth_rates =
            GrowthRateCalculator::compute_growth_rates(&candidates, entropy, &config.entropy_profile);

        // Interaction matrix
        let alpha = InteractionMatrixBuilder::new(config.interaction.clone())
            .build_alpha_matrix(&candidates, &embeddings)?;
        let stability = self.stability.as_ref().map(|v| v.assess(&alpha));
        if let Some(report) = &stability {
            debug!(
                stable = report.ecosystem_stable,
                max_eigenvalue = report.max_eigenvalue,
                "stability diagnostic"
            );
        }

        // Simulation
        let outcome = PopulationDynamicsSimulator::new(config.simulation())
            .simulate(&growth_rates, &alpha)?;
        for (candidate, population) in candidates.iter_mut().zip(&outcome.final_populations) {
            candidate.population = *population;
        }

        // Selection
        let selection = DiversitySelector::new(config.selection_policy()).select(
            &candidates,
            &embeddings,
            &outcome.final_populations,
        )?;

        let mut warnings = Vec::new();
        if !outcome.converged {
            warnings.push(SelectionWarning::NotConverged {
                iterations: outcome.iterations_used,
                last_delta: outcome.last_delta,
            });
        }

        Ok(SelectionResult {
            selected_outputs: selection.selected_outputs,
            growth_rates,
            alpha_matrix: alpha,
            final_populations: outcome.final_populations,
            convergence_iterations: outcome.iterations_used,
            converged: outcome.converged,
            diversity_metrics: selection.diversity_metrics,
            stability,
            warnings,
            ..SelectionResult::empty(entropy, regime)
        })
    }

    /// One batch request under the configured timeout
    async fn embed(&self, contents: &[String], timeout_ms: u64) -> Result<Vec<Vec<f32>>> {
        let request = self.embedder.embed_batch(contents);
        let embeddings = tokio::time::timeout(Duration::from_millis(timeout_ms), request)
            .await
            .map_err(|_| EmbeddingError::Timeout(timeout_ms))??;

        validate_batch(&embeddings, contents.len())?;
        debug!(count = embeddings.len(), "embedded candidates");
        Ok(embeddings)
    }
}
