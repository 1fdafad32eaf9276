//! Cluster-level similarity between two BGCs

use crate::error::PipelineResult;
use crate::tasks::file_stem;
use abpredict_core::{AbpredictError, AbpredictResult};
use abpredict_tools::{ClusterAligner, ClusterAlignment};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSimilarityResult {
    pub source_bgc: String,
    pub target_bgc: String,
    #[serde(rename = "cluster_similarity")]
    pub similarity: f64,
}

pub struct ClusterSimilarityEngine<'a> {
    aligner: &'a dyn ClusterAligner,
}

impl<'a> ClusterSimilarityEngine<'a> {
    pub fn new(aligner: &'a dyn ClusterAligner) -> Self {
        Self { aligner }
    }

    /// Align exactly `source` and `target`; tool artifacts go to `output_dir`
    pub fn similarity(
        &self,
        source: &Path,
        target: &Path,
        output_dir: &Path,
    ) -> PipelineResult<ClusterSimilarityResult> {
        let alignment = self.aligner.align_clusters(source, target, output_dir)?;
        let similarity = similarity_from_alignment(&alignment)?;

        Ok(ClusterSimilarityResult {
            source_bgc: file_stem(source),
            target_bgc: file_stem(target),
            similarity,
        })
    }
}

/// Off-diagonal entry of a two-cluster similarity matrix
pub fn similarity_from_alignment(alignment: &ClusterAlignment) -> AbpredictResult<f64> {
    if alignment.cluster_count() != 2 {
        return Err(AbpredictError::ContractViolation(format!(
            "expected exactly 2 clusters in the alignment, found {} ({})",
            alignment.cluster_count(),
            alignment.clusters.join(", ")
        )));
    }
    if !alignment.is_square() {
        return Err(AbpredictError::Parse(
            "cluster similarity matrix is not 2x2".to_string(),
        ));
    }

    let value = alignment.matrix[0][1];
    if !value.is_finite() {
        return Err(AbpredictError::Parse(format!(
            "cluster similarity is not finite: {}",
            value
        )));
    }
    Ok(value)
}

/// Write results with header `source_bgc,target_bgc,cluster_similarity`
pub fn write_similarity_csv(path: &Path, results: &[ClusterSimilarityResult]) -> PipelineResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for result in results {
        writer.serialize(result)?;
    }
    writer.flush()?;
    Ok(())
}
