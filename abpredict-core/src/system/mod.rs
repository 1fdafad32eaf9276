pub mod paths;

pub use paths::{
    abpredict_home, default_config_path, describe_paths, generate_utc_timestamp,
    resolve_concurrency, ALL_CORES,
};
