//! EcoSelect configuration

use std::path::Path;

use ecoselect_common::{
    ConfigError, EntropyProfile, DEFAULT_DAMPING_FACTOR, DEFAULT_ENHANCEMENT_THRESHOLD,
    DEFAULT_EXPONENT_CLAMP, DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_SELECTED, DEFAULT_TOLERANCE,
};
use ecoselect_dynamics::{InteractionConfig, SelectionPolicy, SimulationConfig};
use serde::{Deserialize, Serialize};

/// Tunables for one selection run
///
/// Bound into an `LVEcosystem` at construction or passed per call; never
/// mutated while a call is in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcosystemConfig {
    /// Cap on simulation iterations
    pub max_iterations: usize,
    /// Step-size scaling in the population update
    pub damping_factor: f64,
    /// Convergence threshold on the L2 population delta
    pub tolerance: f64,
    /// Bound on the update exponent
    pub exponent_clamp: f64,
    /// Entropy thresholds and per-regime weights
    pub entropy_profile: EntropyProfile,
    /// Cap on selected outputs
    pub max_selected: usize,
    /// Minimum population share for inclusion (`None` = 1/(2N))
    pub min_population_floor: Option<f64>,
    /// Interaction matrix constants
    pub interaction: InteractionConfig,
    /// Wall-clock limit on the embedding batch
    pub embedding_timeout_ms: u64,
    /// Entropy above which generating multiple candidates is worthwhile
    pub enhancement_threshold: f64,
}

impl Default for EcosystemConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            damping_factor: DEFAULT_DAMPING_FACTOR,
            tolerance: DEFAULT_TOLERANCE,
            exponent_clamp: DEFAULT_EXPONENT_CLAMP,
            entropy_profile: EntropyProfile::default(),
            max_selected: DEFAULT_MAX_SELECTED,
            min_population_floor: None,
            interaction: InteractionConfig::default(),
            embedding_timeout_ms: 30_000,
            enhancement_threshold: DEFAULT_ENHANCEMENT_THRESHOLD,
        }
    }
}

impl EcosystemConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.entropy_profile.validate()?;
        self.simulation().validate()?;
        self.selection_policy().validate()?;
        self.interaction.validate()?;

        if self.embedding_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "embedding_timeout_ms",
                reason: "must be positive".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.enhancement_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "enhancement_threshold",
                reason: format!("must lie in [0, 1], got {}", self.enhancement_threshold),
            });
        }
        Ok(())
    }

    pub fn simulation(&self) -> SimulationConfig {
        SimulationConfig {
            max_iterations: self.max_iterations,
            damping_factor: self.damping_factor,
            tolerance: self.tolerance,
            exponent_clamp: self.exponent_clamp,
        }
    }

    pub fn selection_policy(&self) -> SelectionPolicy {
        SelectionPolicy::new(self.max_selected, self.min_population_floor)
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Load(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Embedding backend settings for the binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// Local embedding dimension
    pub dimension: usize,
    /// Whether to wrap the backend in a cache
    pub enable_cache: bool,
    /// Maximum cached entries
    pub cache_size: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            dimension: 256,
            enable_cache: true,
            cache_size: 10_000,
        }
    }
}

/// Process-level settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineSettings {
    pub ecosystem: EcosystemConfig,
    pub embedding: EmbeddingSettings,
}

impl EngineSettings {
    /// Load configuration from `.env`, environment and an optional JSON file
    pub fn load() -> Result<Self, ConfigError> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source
    ///
    /// `ECOSELECT_CONFIG_FILE` supplies the base ecosystem config; individual
    /// `ECOSELECT_*` variables override it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(path) = lookup("ECOSELECT_CONFIG_FILE") {
            cfg.ecosystem = read_config_file(Path::new(&path))?;
        }

        // Simulation settings
        if let Some(v) = parse(&lookup, "ECOSELECT_MAX_ITERATIONS")? {
            cfg.ecosystem.max_iterations = v;
        }
        if let Some(v) = parse(&lookup, "ECOSELECT_DAMPING_FACTOR")? {
            cfg.ecosystem.damping_factor = v;
        }
        if let Some(v) = parse(&lookup, "ECOSELECT_TOLERANCE")? {
            cfg.ecosystem.tolerance = v;
        }

        // Selection settings
        if let Some(v) = parse(&lookup, "ECOSELECT_MAX_SELECTED")? {
            cfg.ecosystem.max_selected = v;
        }
        if let Some(v) = parse(&lookup, "ECOSELECT_MIN_POPULATION_FLOOR")? {
            cfg.ecosystem.min_population_floor = Some(v);
        }
        if let Some(v) = parse(&lookup, "ECOSELECT_ENHANCEMENT_THRESHOLD")? {
            cfg.ecosystem.enhancement_threshold = v;
        }

        // Embedding settings
        if let Some(v) = parse(&lookup, "ECOSELECT_EMBEDDING_TIMEOUT_MS")? {
            cfg.ecosystem.embedding_timeout_ms = v;
        }
        if let Some(v) = parse(&lookup, "ECOSELECT_EMBEDDING_DIMENSION")? {
            cfg.embedding.dimension = v;
        }
        if let Some(v) = parse(&lookup, "ECOSELECT_EMBEDDING_CACHE")? {
            cfg.embedding.enable_cache = v;
        }

        cfg.ecosystem.validate()?;
        if cfg.embedding.dimension == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ECOSELECT_EMBEDDING_DIMENSION",
                reason: "must be positive".to_string(),
            });
        }
        Ok(cfg)
    }
}

fn read_config_file(path: &Path) -> Result<EcosystemConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&raw).map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))
}

fn parse<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                field: key,
                reason: format!("cannot parse {:?}: {}", raw, e),
            }),
    }
}
