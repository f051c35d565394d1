//! CLI Commands

pub mod compile;
pub mod config;
pub mod parse;
pub mod synthesize;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use stepscribe_core::{GeneratorConfig, Observation};
use tracing::debug;

/// Configuration file used when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "stepscribe.toml";

/// Resolve the configuration path from an optional override
pub fn config_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Load the generator configuration, falling back to defaults when the file
/// does not exist
pub async fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    let path = config_path(path);
    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        debug!("No config at {}, using defaults", path.display());
        return Ok(GeneratorConfig::default());
    }
    let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = GeneratorConfig::from_toml(&content)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Read a text file
pub async fn read_text(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Read a JSON array of observations
pub async fn read_observations(path: &Path) -> Result<Vec<Observation>> {
    let content = read_text(path).await?;
    let observations: Vec<Observation> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid observations file {}", path.display()))?;
    debug!("Read {} observation(s) from {}", observations.len(), path.display());
    Ok(observations)
}
