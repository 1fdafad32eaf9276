//! Core utilities and types shared across all abpredict crates

pub mod config;
pub mod error;
pub mod system;

// Re-export commonly used types
pub use config::{default_config, load_config, save_config, CachePolicy, Config};
pub use error::{AbpredictError, AbpredictResult};

pub use system::{
    abpredict_home, default_config_path, describe_paths, generate_utc_timestamp,
    resolve_concurrency, ALL_CORES,
};
