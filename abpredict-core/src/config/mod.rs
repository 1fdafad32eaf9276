//! Configuration types for abpredict

use crate::AbpredictError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub prefilter: PrefilterConfig,
    #[serde(default)]
    pub alignment: AlignmentConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// How the result cache decides that a task directory is complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CachePolicy {
    /// The directory existing is enough (partial outputs of a crashed run count as done)
    Existence,
    /// A persisted status record must say the task finished
    #[default]
    Status,
}

impl std::str::FromStr for CachePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "existence" | "exists" => Ok(CachePolicy::Existence),
            "status" => Ok(CachePolicy::Status),
            _ => Err(format!("Unknown cache policy: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Worker count, -1 uses every available core
    #[serde(default = "default_ncpus")]
    pub ncpus: i32,
    #[serde(default)]
    pub cache_policy: CachePolicy,
    /// Restrict marker alignment targets to the query's gene family
    #[serde(default = "default_family_filter")]
    pub family_filter: bool,
    /// Leave sequence similarity network features out of function prediction
    #[serde(default)]
    pub no_ssn: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefilterConfig {
    /// Hits are kept only when their e-value is strictly below this
    #[serde(default = "default_evalue_threshold")]
    pub evalue_threshold: f64,
    #[serde(default = "default_n_hits")]
    pub n_hits: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentConfig {
    #[serde(default = "default_matrix")]
    pub matrix: String,
    #[serde(default = "default_gap_open")]
    pub gap_open: f64,
    #[serde(default = "default_gap_extend")]
    pub gap_extend: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_rgi")]
    pub rgi: String,
    /// Extra arguments appended to every `rgi main` call
    #[serde(default = "default_rgi_args")]
    pub rgi_args: Vec<String>,
    #[serde(default = "default_blastp")]
    pub blastp: String,
    #[serde(default = "default_clinker")]
    pub clinker: String,
    /// BGC function predictor, called as `<predictor> <genome> <output_dir> <True|False>`
    #[serde(default = "default_predictor")]
    pub predictor: String,
}

// Default value functions
fn default_ncpus() -> i32 { -1 }
fn default_family_filter() -> bool { true }
fn default_evalue_threshold() -> f64 { 0.01 }
fn default_n_hits() -> usize { 10 }
fn default_matrix() -> String { "BLOSUM62".to_string() }
fn default_gap_open() -> f64 { -15.0 }
fn default_gap_extend() -> f64 { -6.67 }
fn default_rgi() -> String { "rgi".to_string() }
fn default_rgi_args() -> Vec<String> {
    vec!["--input_type".to_string(), "contig".to_string(), "--clean".to_string()]
}
fn default_blastp() -> String { "blastp".to_string() }
fn default_clinker() -> String { "clinker".to_string() }
fn default_predictor() -> String { "predict_function.sh".to_string() }

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ncpus: default_ncpus(),
            cache_policy: CachePolicy::default(),
            family_filter: default_family_filter(),
            no_ssn: false,
        }
    }
}

impl Default for PrefilterConfig {
    fn default() -> Self {
        Self {
            evalue_threshold: default_evalue_threshold(),
            n_hits: default_n_hits(),
        }
    }
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            matrix: default_matrix(),
            gap_open: default_gap_open(),
            gap_extend: default_gap_extend(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            rgi: default_rgi(),
            rgi_args: default_rgi_args(),
            blastp: default_blastp(),
            clinker: default_clinker(),
            predictor: default_predictor(),
        }
    }
}

impl Config {
    /// Reject values no stage can run with
    pub fn validate(&self) -> Result<(), AbpredictError> {
        if self.pipeline.ncpus == 0 || self.pipeline.ncpus < -1 {
            return Err(AbpredictError::Configuration(format!(
                "ncpus must be a positive worker count or -1, got {}",
                self.pipeline.ncpus
            )));
        }
        if self.prefilter.n_hits == 0 {
            return Err(AbpredictError::Configuration(
                "prefilter.n_hits must be at least 1".to_string(),
            ));
        }
        if !self.alignment.matrix.eq_ignore_ascii_case("BLOSUM62") {
            return Err(AbpredictError::Configuration(format!(
                "Unsupported substitution matrix: {}",
                self.alignment.matrix
            )));
        }
        if self.alignment.gap_open > 0.0 || self.alignment.gap_extend > 0.0 {
            return Err(AbpredictError::Configuration(
                "Gap scores must be zero or negative".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, AbpredictError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| AbpredictError::Configuration(format!("Failed to parse config: {}", e)))?;
    config.validate()?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), AbpredictError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| AbpredictError::Configuration(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.pipeline.ncpus, -1);
        assert_eq!(config.pipeline.cache_policy, CachePolicy::Status);
        assert!(config.pipeline.family_filter);
        assert!(!config.pipeline.no_ssn);

        assert_eq!(config.prefilter.evalue_threshold, 0.01);
        assert_eq!(config.prefilter.n_hits, 10);

        assert_eq!(config.alignment.matrix, "BLOSUM62");
        assert_eq!(config.alignment.gap_open, -15.0);
        assert_eq!(config.alignment.gap_extend, -6.67);

        assert_eq!(config.tools.rgi, "rgi");
        assert_eq!(config.tools.blastp, "blastp");
        assert_eq!(config.tools.clinker, "clinker");
        assert_eq!(config.tools.predictor, "predict_function.sh");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_config() {
        let toml_content = r#"
[pipeline]
ncpus = 4
cache_policy = "existence"

[prefilter]
n_hits = 3
"#;
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", toml_content).unwrap();

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config.pipeline.ncpus, 4);
        assert_eq!(config.pipeline.cache_policy, CachePolicy::Existence);
        assert_eq!(config.prefilter.n_hits, 3);

        // Unspecified values fall back to defaults
        assert!(config.pipeline.family_filter);
        assert_eq!(config.prefilter.evalue_threshold, 0.01);
        assert_eq!(config.alignment.gap_open, -15.0);
        assert_eq!(config.tools.clinker, "clinker");
    }

    #[test]
    fn test_load_invalid_config() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "this is not valid TOML {{").unwrap();

        match load_config(temp_file.path()).unwrap_err() {
            AbpredictError::Configuration(msg) => assert!(msg.contains("Failed to parse config")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_rejects_zero_workers() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[pipeline]\nncpus = 0\n").unwrap();

        match load_config(temp_file.path()).unwrap_err() {
            AbpredictError::Configuration(msg) => assert!(msg.contains("ncpus")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_unknown_matrix() {
        let mut config = Config::default();
        config.alignment.matrix = "PAM250".to_string();
        assert!(config.validate().is_err());

        config.alignment.matrix = "blosum62".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_nonexistent_file() {
        match load_config("/nonexistent/path/to/config.toml").unwrap_err() {
            AbpredictError::Io(_) => {}
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = Config::default();
        config.pipeline.ncpus = 8;
        config.pipeline.family_filter = false;
        config.tools.rgi_args = vec!["--local".to_string()];

        let temp_file = NamedTempFile::new().unwrap();
        save_config(temp_file.path(), &config).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert_eq!(loaded.pipeline.ncpus, 8);
        assert!(!loaded.pipeline.family_filter);
        assert_eq!(loaded.tools.rgi_args, vec!["--local".to_string()]);
    }

    #[test]
    fn test_cache_policy_from_str() {
        assert_eq!("status".parse::<CachePolicy>().unwrap(), CachePolicy::Status);
        assert_eq!("EXISTENCE".parse::<CachePolicy>().unwrap(), CachePolicy::Existence);
        assert!("mtime".parse::<CachePolicy>().is_err());
    }
}
