//! Prometheus metrics for selection runs

use ecoselect_common::{SelectionResult, Stage};

/// Per-run counters and histograms
#[derive(Clone)]
pub struct SelectionMetrics {
    pub runs_total: prometheus::IntCounter,
    pub runs_failed: prometheus::IntCounterVec,
    pub runs_not_converged: prometheus::IntCounter,
    pub iterations_used: prometheus::Histogram,
    pub selected_count: prometheus::Histogram,
    pub run_duration_seconds: prometheus::Histogram,
}

impl SelectionMetrics {
    pub fn new() -> prometheus::Result<Self> {
        Ok(Self {
            runs_total: prometheus::IntCounter::new(
                "ecoselect_runs_total",
                "Total selection runs started",
            )?,
            runs_failed: prometheus::IntCounterVec::new(
                prometheus::Opts::new(
                    "ecoselect_runs_failed_total",
                    "Selection runs aborted, by pipeline stage",
                ),
                &["stage"],
            )?,
            runs_not_converged: prometheus::IntCounter::new(
                "ecoselect_runs_not_converged_total",
                "Runs that hit the iteration cap before converging",
            )?,
            iterations_used: prometheus::Histogram::with_opts(
                prometheus::HistogramOpts::new(
                    "ecoselect_simulation_iterations",
                    "Simulation iterations per run",
                )
                .buckets(vec![1.0, 2.0, 3.0, 5.0, 10.0, 20.0, 50.0, 100.0]),
            )?,
            selected_count: prometheus::Histogram::with_opts(
                prometheus::HistogramOpts::new(
                    "ecoselect_selected_outputs",
                    "Outputs selected per run",
                )
                .buckets(prometheus::linear_buckets(0.0, 1.0, 11)?),
            )?,
            run_duration_seconds: prometheus::Histogram::with_opts(
                prometheus::HistogramOpts::new(
                    "ecoselect_run_duration_seconds",
                    "Wall-clock duration of a selection run",
                )
                .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0, 30.0]),
            )?,
        })
    }

    pub fn register(&self, registry: &prometheus::Registry) -> prometheus::Result<()> {
        registry.register(Box::new(self.runs_total.clone()))?;
        registry.register(Box::new(self.runs_failed.clone()))?;
        registry.register(Box::new(self.runs_not_converged.clone()))?;
        registry.register(Box::new(self.iterations_used.clone()))?;
        registry.register(Box::new(self.selected_count.clone()))?;
        registry.register(Box::new(self.run_duration_seconds.clone()))?;
        Ok(())
    }

    pub fn record_success(&self, result: &SelectionResult, elapsed_secs: f64) {
        self.iterations_used
            .observe(result.convergence_iterations as f64);
        self.selected_count
            .observe(result.selected_outputs.len() as f64);
        if !result.converged {
            self.runs_not_converged.inc();
        }
        self.run_duration_seconds.observe(elapsed_secs);
    }

    pub fn record_failure(&self, stage: Stage, elapsed_secs: f64) {
        self.runs_failed.with_label_values(&[stage.as_str()]).inc();
        self.run_duration_seconds.observe(elapsed_secs);
    }
}
