//! Core error types for abpredict

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for abpredict operations
#[derive(Error, Debug)]
pub enum AbpredictError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Input not found: {}", .0.display())]
    InputMissing(PathBuf),

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Contract violation: {0}")]
    ContractViolation(String),
}

/// Result type alias for abpredict operations
pub type AbpredictResult<T> = Result<T, AbpredictError>;

impl AbpredictError {
    /// Fail with `InputMissing` unless `path` exists
    pub fn require_exists(path: impl Into<PathBuf>) -> AbpredictResult<()> {
        let path = path.into();
        if path.exists() {
            Ok(())
        } else {
            Err(AbpredictError::InputMissing(path))
        }
    }
}

impl From<serde_json::Error> for AbpredictError {
    fn from(err: serde_json::Error) -> Self {
        AbpredictError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_display() {
        let io_error = AbpredictError::Io(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        assert!(format!("{}", io_error).contains("IO error"));

        let config_error = AbpredictError::Configuration("missing field".to_string());
        assert_eq!(format!("{}", config_error), "Configuration error: missing field");

        let missing = AbpredictError::InputMissing(PathBuf::from("/data/genomes"));
        assert_eq!(format!("{}", missing), "Input not found: /data/genomes");

        let contract = AbpredictError::ContractViolation("3 clusters".to_string());
        assert_eq!(format!("{}", contract), "Contract violation: 3 clusters");

        let parse_error = AbpredictError::Parse("bad row".to_string());
        assert_eq!(format!("{}", parse_error), "Parsing error: bad row");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: AbpredictError = io_err.into();

        match err {
            AbpredictError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::PermissionDenied),
            _ => panic!("Expected Io error variant"),
        }
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let parse_result: Result<serde_json::Value, serde_json::Error> =
            serde_json::from_str("{invalid json}");
        let err: AbpredictError = parse_result.unwrap_err().into();

        match err {
            AbpredictError::Serialization(msg) => assert!(msg.contains("key must be a string")),
            _ => panic!("Expected Serialization error variant"),
        }
    }

    #[test]
    fn test_require_exists() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(AbpredictError::require_exists(dir.path()).is_ok());

        let missing = dir.path().join("nope");
        match AbpredictError::require_exists(&missing).unwrap_err() {
            AbpredictError::InputMissing(p) => assert_eq!(p, missing),
            other => panic!("Expected InputMissing, got {:?}", other),
        }
    }
}
