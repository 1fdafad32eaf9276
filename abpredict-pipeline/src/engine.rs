//! Best-match global alignment between resistance markers

use abpredict_bio::{GlobalAligner, GlobalAlignment, ResistanceMarker, BLOSUM62};
use abpredict_core::config::AlignmentConfig;
use abpredict_core::{AbpredictError, AbpredictResult};

/// Best alignment found for one query marker.
///
/// With no candidate better than zero the target id is empty and the score
/// is 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentResult {
    pub query_id: String,
    pub target_id: String,
    pub score: f64,
    pub alignment: Option<GlobalAlignment>,
}

impl AlignmentResult {
    pub fn sentinel(query_id: impl Into<String>) -> Self {
        Self {
            query_id: query_id.into(),
            target_id: String::new(),
            score: 0.0,
            alignment: None,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.alignment.is_none()
    }
}

pub struct AlignmentEngine {
    aligner: GlobalAligner<BLOSUM62>,
}

impl Default for AlignmentEngine {
    fn default() -> Self {
        Self {
            aligner: GlobalAligner::default(),
        }
    }
}

impl AlignmentEngine {
    pub fn from_config(config: &AlignmentConfig) -> AbpredictResult<Self> {
        if !config.matrix.eq_ignore_ascii_case("BLOSUM62") {
            return Err(AbpredictError::Configuration(format!(
                "Unsupported substitution matrix: {}",
                config.matrix
            )));
        }
        let scoring = BLOSUM62::new().with_gap_scores(config.gap_open, config.gap_extend);
        Ok(Self {
            aligner: GlobalAligner::new(scoring),
        })
    }

    /// Align `query` against each candidate and keep the best.
    ///
    /// The running best starts at the zero-score sentinel and is replaced only
    /// by a strictly greater score, so the first of several equal scores wins
    /// and non-positive scores never win.
    pub fn best_alignment(
        &self,
        query: &ResistanceMarker,
        candidates: &[ResistanceMarker],
    ) -> AlignmentResult {
        let mut best = AlignmentResult::sentinel(query.contig.clone());

        for candidate in candidates {
            let alignment = self
                .aligner
                .align(query.protein.as_bytes(), candidate.protein.as_bytes());
            if alignment.score > best.score {
                best = AlignmentResult {
                    query_id: query.contig.clone(),
                    target_id: candidate.contig.clone(),
                    score: alignment.score,
                    alignment: Some(alignment),
                };
            }
        }

        best
    }
}

/// Targets sharing the query's gene family
pub fn filter_by_family(
    query: &ResistanceMarker,
    targets: &[ResistanceMarker],
) -> Vec<ResistanceMarker> {
    targets
        .iter()
        .filter(|t| t.shares_family(query))
        .cloned()
        .collect()
}
