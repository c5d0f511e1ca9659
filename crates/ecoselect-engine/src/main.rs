//! EcoSelect Binary
//!
//! Reads a selection request as JSON on stdin and writes the result as JSON
//! on stdout:
//!
//! ```text
//! {"candidates": ["..."], "prompt": "...", "context": {...}}
//! ```

use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ecoselect_dynamics::EigenStability;
use ecoselect_engine::{
    CachedEmbedding, EmbeddingService, EngineSettings, LVEcosystem, LocalEmbedding,
    SelectionContext, ENGINE_VERSION,
};

#[derive(Debug, Deserialize)]
struct SelectionRequest {
    candidates: Vec<String>,
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    context: Option<SelectionContext>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the result
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting EcoSelect v{}", ENGINE_VERSION);

    let settings = EngineSettings::load().context("loading configuration")?;
    info!("Loaded configuration: {:?}", settings);

    let local = LocalEmbedding::new(settings.embedding.dimension);
    let embedder: Arc<dyn EmbeddingService> = if settings.embedding.enable_cache {
        Arc::new(CachedEmbedding::new(local, settings.embedding.cache_size))
    } else {
        Arc::new(local)
    };

    let eco = LVEcosystem::new(embedder)
        .with_stability_validator(Arc::new(EigenStability::default()))
        .with_config(settings.ecosystem)?;

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("reading request from stdin")?;
    let request: SelectionRequest =
        serde_json::from_str(&input).context("parsing selection request")?;

    let result = eco
        .select_diverse_outputs(&request.candidates, &request.prompt, request.context.as_ref())
        .await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
