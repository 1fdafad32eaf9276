//! Pipeline error types

use crate::tasks::Stage;
use abpredict_core::AbpredictError;
use abpredict_tools::ToolError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] AbpredictError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("Stage {stage} failed: {} of {total} tasks failed ({})", .failed.len(), .failed.join(", "))]
    StageFailed {
        stage: Stage,
        total: usize,
        failed: Vec<String>,
    },
}

pub type PipelineResult<T> = Result<T, PipelineError>;

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Core(AbpredictError::Serialization(err.to_string()))
    }
}
