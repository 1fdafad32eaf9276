/// Traits for the external collaborators
use crate::command::ToolResult;
use crate::types::{ClusterAlignment, SearchHit};
use std::path::{Path, PathBuf};

/// Detects resistance markers in a genome assembly
pub trait MarkerCaller: Send + Sync {
    /// Write the marker table for `genome` into `output_dir` and return its path
    fn call_markers(&self, genome: &Path, output_dir: &Path) -> ToolResult<PathBuf>;

    fn name(&self) -> &str;
}

/// Local (BLAST-like) protein search
pub trait LocalSearch: Send + Sync {
    /// Search every query in `query_fasta` against `target_fasta`, writing the
    /// raw table to `output`
    fn search(
        &self,
        query_fasta: &Path,
        target_fasta: &Path,
        output: &Path,
    ) -> ToolResult<Vec<SearchHit>>;

    fn name(&self) -> &str;
}

/// Predicts the function of the BGCs found in a genome
pub trait FunctionPredictor: Send + Sync {
    /// Write predictions for `genome` into `output_dir`
    fn predict(&self, genome: &Path, output_dir: &Path, no_ssn: bool) -> ToolResult<()>;

    fn name(&self) -> &str;
}

/// Aligns gene clusters and reports a cluster similarity matrix
pub trait ClusterAligner: Send + Sync {
    fn align_clusters(
        &self,
        source: &Path,
        target: &Path,
        output_dir: &Path,
    ) -> ToolResult<ClusterAlignment>;

    fn name(&self) -> &str;
}
