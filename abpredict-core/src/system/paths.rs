use crate::{AbpredictError, AbpredictResult};
use std::path::PathBuf;
use std::sync::OnceLock;

static ABPREDICT_HOME: OnceLock<PathBuf> = OnceLock::new();

/// Worker count sentinel meaning "one worker per available core"
pub const ALL_CORES: i32 = -1;

/// Generate a UTC timestamp, format: YYYYMMDD_HHMMSS
pub fn generate_utc_timestamp() -> String {
    chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Get the abpredict home directory
/// Checks ABPREDICT_HOME environment variable, falls back to ${HOME}/.abpredict
pub fn abpredict_home() -> PathBuf {
    ABPREDICT_HOME
        .get_or_init(|| {
            if let Ok(path) = std::env::var("ABPREDICT_HOME") {
                PathBuf::from(path)
            } else {
                let home = std::env::var("HOME").unwrap_or_else(|_| {
                    std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string())
                });
                PathBuf::from(home).join(".abpredict")
            }
        })
        .clone()
}

/// Config file picked up when `--config` is not given
pub fn default_config_path() -> PathBuf {
    abpredict_home().join("config.toml")
}

/// Turn a configured worker count into a thread count.
/// `-1` means every available core; zero and other negatives are rejected.
pub fn resolve_concurrency(ncpus: i32) -> AbpredictResult<usize> {
    match ncpus {
        ALL_CORES => Ok(num_cpus::get()),
        n if n > 0 => Ok(n as usize),
        n => Err(AbpredictError::Configuration(format!(
            "ncpus must be a positive worker count or -1, got {}",
            n
        ))),
    }
}

/// Get a human-readable description of the current path configuration
pub fn describe_paths() -> String {
    format!(
        "abpredict paths:\n  Home: {}\n  Config: {}\n  Custom: {}",
        abpredict_home().display(),
        default_config_path().display(),
        if std::env::var("ABPREDICT_HOME").is_ok() {
            "Yes"
        } else {
            "No (using defaults)"
        }
    )
}
