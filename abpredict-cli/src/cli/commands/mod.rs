pub mod align_markers;
pub mod cluster_similarity;
pub mod config;
pub mod predict_function;
pub mod run;
pub mod status;

use abpredict_core::{default_config_path, load_config, AbpredictError, Config};
use anyhow::{Context, Result};
use std::path::Path;

/// `--config` if given, else `$ABPREDICT_HOME/config.toml` if it exists, else defaults
pub fn load_effective_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        AbpredictError::require_exists(path)?;
        return load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    let default_path = default_config_path();
    if default_path.exists() {
        tracing::debug!("Using config {}", default_path.display());
        load_config(&default_path)
            .with_context(|| format!("Failed to load config from {}", default_path.display()))
    } else {
        Ok(Config::default())
    }
}
