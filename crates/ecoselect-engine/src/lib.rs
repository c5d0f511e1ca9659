//! # EcoSelect Engine
//!
//! Entropy-adaptive selection of diverse candidate outputs.
//!
//! Given several candidate answers to one prompt, the engine estimates how
//! open-ended the prompt is, lets the candidates compete in a discrete
//! Lotka-Volterra simulation seeded by their semantic similarity, and keeps
//! the survivors.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       LVEcosystem                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐    │
//! │  │   Entropy    │  │  Embedding   │  │   Metrics    │    │
//! │  │  Estimator   │  │   Service    │  │ (prometheus) │    │
//! │  └──────┬───────┘  └──────┬───────┘  └──────────────┘    │
//! │         │                 │                              │
//! │  ┌──────┴─────────────────┴─────────────────────────┐    │
//! │  │              ecoselect-dynamics                  │    │
//! │  │  growth rates → alpha matrix → simulate → select │    │
//! │  └──────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ecoselect_engine::{LVEcosystem, LocalEmbedding};
//!
//! # async fn run() -> ecoselect_common::Result<()> {
//! let eco = LVEcosystem::new(Arc::new(LocalEmbedding::default()));
//! let candidates = vec!["Paris".to_string(), "Lyon".to_string()];
//! let result = eco
//!     .select_diverse_outputs(&candidates, "What is the capital of France?", None)
//!     .await?;
//! println!("{:?}", result.selected_contents());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod infra;

// Re-export core types
pub use config::{EcosystemConfig, EmbeddingSettings, EngineSettings};
pub use domain::{EntropyEstimator, LVEcosystem, SelectionContext};

// Re-export infrastructure
pub use infra::{
    CachedEmbedding, EmbeddingService, LocalEmbedding, SelectionMetrics, StaticEmbedding,
};

/// Engine version
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
