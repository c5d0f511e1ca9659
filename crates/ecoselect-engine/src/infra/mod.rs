//! Infrastructure: embedding backends and metrics

pub mod embedding;
pub mod telemetry;

pub use embedding::{CachedEmbedding, EmbeddingService, LocalEmbedding, StaticEmbedding};
pub use telemetry::SelectionMetrics;
