//! Shortlisting alignment targets with a fast local search

use crate::error::PipelineResult;
use abpredict_bio::{write_fasta, ResistanceMarker, Sequence};
use abpredict_core::config::PrefilterConfig;
use abpredict_tools::{LocalSearch, SearchHit};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

pub const QUERY_FASTA: &str = "query.faa";
pub const TARGET_FASTA: &str = "target.faa";
pub const HITS_TABLE: &str = "hits.tsv";

pub struct PrefilterStage<'a> {
    search: &'a dyn LocalSearch,
    evalue_threshold: f64,
    n_hits: usize,
}

impl<'a> PrefilterStage<'a> {
    pub fn new(search: &'a dyn LocalSearch, evalue_threshold: f64, n_hits: usize) -> Self {
        Self {
            search,
            evalue_threshold,
            n_hits,
        }
    }

    pub fn from_config(search: &'a dyn LocalSearch, config: &PrefilterConfig) -> Self {
        Self::new(search, config.evalue_threshold, config.n_hits)
    }

    /// Targets worth a full alignment against `query`, in their original order.
    ///
    /// Search inputs and raw output stay in `output_dir`.
    pub fn shortlist(
        &self,
        query: &ResistanceMarker,
        targets: &[ResistanceMarker],
        output_dir: &Path,
    ) -> PipelineResult<Vec<ResistanceMarker>> {
        if targets.is_empty() {
            return Ok(Vec::new());
        }

        std::fs::create_dir_all(output_dir)?;
        let query_fasta = output_dir.join(QUERY_FASTA);
        let target_fasta = output_dir.join(TARGET_FASTA);
        write_fasta(&query_fasta, &[query.to_sequence()])?;
        let target_seqs: Vec<Sequence> = targets.iter().map(|t| t.to_sequence()).collect();
        write_fasta(&target_fasta, &target_seqs)?;

        let hits = self
            .search
            .search(&query_fasta, &target_fasta, &output_dir.join(HITS_TABLE))?;
        let keep = select_top_hits(&hits, self.evalue_threshold, self.n_hits);
        debug!(
            "{}: {} hits, {} targets kept",
            query.contig,
            hits.len(),
            keep.len()
        );

        Ok(targets
            .iter()
            .filter(|t| keep.contains(t.contig.as_str()))
            .cloned()
            .collect())
    }
}

/// Up to `n_hits` distinct target ids from hits with e-value strictly below
/// `evalue_threshold`, best bit score first. Equal bit scores keep file order.
pub fn select_top_hits(hits: &[SearchHit], evalue_threshold: f64, n_hits: usize) -> HashSet<&str> {
    let mut passing: Vec<&SearchHit> = hits
        .iter()
        .filter(|h| h.evalue < evalue_threshold)
        .collect();
    passing.sort_by(|a, b| b.bit_score.total_cmp(&a.bit_score));

    let mut selected = HashSet::with_capacity(n_hits);
    for hit in passing {
        if selected.len() == n_hits {
            break;
        }
        selected.insert(hit.hit_id.as_str());
    }
    selected
}
