//! Bodies of the three task kinds, shared by the orchestrator and the
//! standalone commands

use crate::cluster::{write_similarity_csv, ClusterSimilarityEngine, ClusterSimilarityResult};
use crate::engine::{filter_by_family, AlignmentEngine, AlignmentResult};
use crate::prefilter::PrefilterStage;
use crate::tasks::file_stem;
use abpredict_bio::read_marker_table;
use abpredict_core::config::PrefilterConfig;
use abpredict_core::AbpredictError;
use abpredict_tools::{ClusterAligner, FunctionPredictor, LocalSearch, MarkerCaller};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Stage 1: run the marker caller for one genome
pub fn detect_markers(caller: &dyn MarkerCaller, genome: &Path, output_dir: &Path) -> Result<PathBuf> {
    AbpredictError::require_exists(genome)?;
    caller
        .call_markers(genome, output_dir)
        .with_context(|| format!("{} failed on {}", caller.name(), genome.display()))
}

/// Run the function predictor over the clusters of one genome
pub fn predict_function(
    predictor: &dyn FunctionPredictor,
    genome: &Path,
    output_dir: &Path,
    no_ssn: bool,
) -> Result<()> {
    AbpredictError::require_exists(genome)?;
    predictor
        .predict(genome, output_dir, no_ssn)
        .with_context(|| format!("{} failed on {}", predictor.name(), genome.display()))
}

#[derive(Debug, Clone, Serialize)]
struct AlignmentRow<'a> {
    query_id: &'a str,
    target_id: &'a str,
    alignment: String,
    score: f64,
}

#[derive(Debug)]
pub struct MarkerAlignmentReport {
    pub csv_path: PathBuf,
    pub results: Vec<AlignmentResult>,
    pub mean_score: f64,
}

/// Settings for one marker-table comparison
pub struct MarkerAlignment<'a> {
    pub engine: &'a AlignmentEngine,
    pub search: &'a dyn LocalSearch,
    pub prefilter: &'a PrefilterConfig,
    pub family_filter: bool,
}

impl<'a> MarkerAlignment<'a> {
    /// Best alignment of every query marker against the target table.
    ///
    /// Writes `<query stem>_alignment.csv` into `output_dir` and returns the
    /// mean best score over query markers.
    pub fn run(
        &self,
        query_table: &Path,
        target_table: &Path,
        output_dir: &Path,
    ) -> Result<MarkerAlignmentReport> {
        let queries = read_marker_table(query_table)
            .with_context(|| format!("Failed to read query markers {}", query_table.display()))?;
        let targets = read_marker_table(target_table)
            .with_context(|| format!("Failed to read target markers {}", target_table.display()))?;
        std::fs::create_dir_all(output_dir)?;

        let prefilter = PrefilterStage::from_config(self.search, self.prefilter);
        let mut results = Vec::with_capacity(queries.len());

        for (n, query) in queries.iter().enumerate() {
            debug!("{}: aligning {}", n, query.contig);
            let pool = if self.family_filter {
                filter_by_family(query, &targets)
            } else {
                targets.clone()
            };

            let result = if pool.is_empty() {
                AlignmentResult::sentinel(query.contig.clone())
            } else {
                let prefilter_dir = output_dir
                    .join("prefilter")
                    .join(format!("{}_{}", n, sanitize(&query.contig)));
                let candidates = prefilter
                    .shortlist(query, &pool, &prefilter_dir)
                    .with_context(|| format!("Prefilter failed for {}", query.contig))?;
                self.engine.best_alignment(query, &candidates)
            };
            results.push(result);
        }

        let mean_score = if results.is_empty() {
            warn!("No query markers in {}", query_table.display());
            0.0
        } else {
            results.iter().map(|r| r.score).sum::<f64>() / results.len() as f64
        };

        let csv_path = output_dir.join(format!("{}_alignment.csv", file_stem(query_table)));
        write_alignment_csv(&csv_path, &results)?;

        Ok(MarkerAlignmentReport {
            csv_path,
            results,
            mean_score,
        })
    }
}

fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect()
}

/// Header `query_id,target_id,alignment,score`; one row per query marker
pub fn write_alignment_csv(path: &Path, results: &[AlignmentResult]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for result in results {
        writer.serialize(AlignmentRow {
            query_id: &result.query_id,
            target_id: &result.target_id,
            alignment: result
                .alignment
                .as_ref()
                .map(|a| a.pretty())
                .unwrap_or_default(),
            score: result.score,
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// One source BGC against each target; all rows go to
/// `<source stem>_cluster_similarity.csv` in `output_dir`
pub fn compare_clusters(
    aligner: &dyn ClusterAligner,
    source: &Path,
    targets: &[PathBuf],
    output_dir: &Path,
) -> Result<(PathBuf, Vec<ClusterSimilarityResult>)> {
    AbpredictError::require_exists(source)?;
    for target in targets {
        AbpredictError::require_exists(target)?;
    }
    std::fs::create_dir_all(output_dir)?;

    let engine = ClusterSimilarityEngine::new(aligner);
    let mut results = Vec::with_capacity(targets.len());
    for (i, target) in targets.iter().enumerate() {
        // Separate tool directories so targets with equal stems do not collide
        let work_dir = if targets.len() == 1 {
            output_dir.to_path_buf()
        } else {
            output_dir.join(format!("{}_{}", i, file_stem(target)))
        };
        let result = engine
            .similarity(source, target, &work_dir)
            .with_context(|| {
                format!(
                    "Cluster alignment of {} and {} failed",
                    source.display(),
                    target.display()
                )
            })?;
        results.push(result);
    }

    let csv_path = output_dir.join(format!("{}_cluster_similarity.csv", file_stem(source)));
    write_similarity_csv(&csv_path, &results)?;
    Ok((csv_path, results))
}
