use anyhow::{Context, Result};
use flexoplate_iq_core::equivalency::{DEFAULT_CANDIDATE_LIMIT, DEFAULT_TOP_N};
use flexoplate_iq_core::weights::EquivalencyWeights;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub equivalency: EquivalencyConfig,
    #[serde(default)]
    pub exposure: ExposureConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// JSON catalog file. Relative paths resolve against the config file.
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EquivalencyConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,
    #[serde(default = "default_exclude_same_supplier")]
    pub exclude_same_supplier: bool,
    #[serde(default)]
    pub weights: EquivalencyWeights,
}

impl Default for EquivalencyConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            exclude_same_supplier: true,
            weights: EquivalencyWeights::default(),
        }
    }
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}
fn default_candidate_limit() -> usize {
    DEFAULT_CANDIDATE_LIMIT
}
fn default_exclude_same_supplier() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ExposureConfig {
    /// Used by `fpiq exposure calculate` when `--intensity` is omitted.
    #[serde(default)]
    pub default_intensity_mw_cm2: Option<f64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate equivalency
    if config.equivalency.top_n < 1 {
        anyhow::bail!("equivalency.top_n must be >= 1");
    }
    if config.equivalency.candidate_limit < 1 {
        anyhow::bail!("equivalency.candidate_limit must be >= 1");
    }
    config
        .equivalency
        .weights
        .validate()
        .with_context(|| "Invalid [equivalency.weights]")?;

    // Validate exposure
    if let Some(intensity) = config.exposure.default_intensity_mw_cm2 {
        if !intensity.is_finite() || intensity <= 0.0 {
            anyhow::bail!("exposure.default_intensity_mw_cm2 must be > 0");
        }
    }

    if config.catalog.path.is_relative() {
        if let Some(dir) = path.parent() {
            config.catalog.path = dir.join(&config.catalog.path);
        }
    }

    Ok(config)
}
