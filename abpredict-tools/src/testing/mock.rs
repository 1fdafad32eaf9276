//! In-process stand-ins for the external tools

use crate::command::{ToolError, ToolResult};
use crate::traits::{ClusterAligner, FunctionPredictor, LocalSearch, MarkerCaller};
use crate::types::{ClusterAlignment, SearchHit};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Writes a fixed marker table, optionally a different one per genome stem
pub struct MockMarkerCaller {
    table: String,
    per_genome: HashMap<String, String>,
    calls: AtomicUsize,
}

impl MockMarkerCaller {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            per_genome: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_genome_table(mut self, genome: &str, table: impl Into<String>) -> Self {
        self.per_genome.insert(genome.to_string(), table.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MarkerCaller for MockMarkerCaller {
    fn call_markers(&self, genome: &Path, output_dir: &Path) -> ToolResult<PathBuf> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        fs::create_dir_all(output_dir)?;
        let genome = stem(genome);
        let table = self.per_genome.get(&genome).unwrap_or(&self.table);
        let path = output_dir.join(format!("{}.txt", genome));
        fs::write(&path, table)?;
        Ok(path)
    }

    fn name(&self) -> &str {
        "mock-marker-caller"
    }
}

/// Reports a hit for every (query, target) pair found in the FASTA inputs.
///
/// Targets listed in the score table get that (e-value, bit score); all
/// others get the default pair.
pub struct MockLocalSearch {
    default: Option<(f64, f64)>,
    scores: HashMap<String, (f64, f64)>,
    calls: AtomicUsize,
}

impl MockLocalSearch {
    /// Every target hits with the given e-value and bit score
    pub fn every_target(evalue: f64, bit_score: f64) -> Self {
        Self {
            default: Some((evalue, bit_score)),
            scores: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Only the listed targets hit
    pub fn with_scores(scores: HashMap<String, (f64, f64)>) -> Self {
        Self {
            default: None,
            scores,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn fasta_ids(path: &Path) -> ToolResult<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(text
        .lines()
        .filter_map(|l| l.strip_prefix('>'))
        .filter_map(|h| h.split_whitespace().next())
        .map(str::to_string)
        .collect())
}

impl LocalSearch for MockLocalSearch {
    fn search(
        &self,
        query_fasta: &Path,
        target_fasta: &Path,
        output: &Path,
    ) -> ToolResult<Vec<SearchHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut hits = Vec::new();
        for query in fasta_ids(query_fasta)? {
            for target in fasta_ids(target_fasta)? {
                let scored = self.scores.get(&target).copied().or(self.default);
                if let Some((evalue, bit_score)) = scored {
                    hits.push(SearchHit {
                        query_id: query.clone(),
                        query_start: 1,
                        query_end: 1,
                        hit_id: target,
                        hit_start: 1,
                        hit_end: 1,
                        evalue,
                        bit_score,
                    });
                }
            }
        }

        let table: String = hits
            .iter()
            .map(|h| {
                format!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                    h.query_id,
                    h.query_start,
                    h.query_end,
                    h.hit_id,
                    h.hit_start,
                    h.hit_end,
                    h.evalue,
                    h.bit_score
                )
            })
            .collect();
        fs::write(output, table)?;

        Ok(hits)
    }

    fn name(&self) -> &str {
        "mock-local-search"
    }
}

/// Returns a fixed similarity, or a fixed alignment, for every pair
pub struct MockClusterAligner {
    similarity: f64,
    alignment: Option<ClusterAlignment>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockClusterAligner {
    /// Two clusters named after the input stems with `similarity` off the diagonal
    pub fn with_similarity(similarity: f64) -> Self {
        Self {
            similarity,
            alignment: None,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Always return `alignment`, whatever the inputs
    pub fn with_alignment(alignment: ClusterAlignment) -> Self {
        Self {
            similarity: 0.0,
            alignment: Some(alignment),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Every call fails as if the tool exited non-zero
    pub fn failing() -> Self {
        Self {
            similarity: 0.0,
            alignment: None,
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ClusterAligner for MockClusterAligner {
    fn align_clusters(
        &self,
        source: &Path,
        target: &Path,
        _output_dir: &Path,
    ) -> ToolResult<ClusterAlignment> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(ToolError::NonZeroExit {
                program: "mock-clinker".to_string(),
                code: 1,
                stderr: format!("cannot align {}", source.display()),
            });
        }
        if let Some(alignment) = &self.alignment {
            return Ok(alignment.clone());
        }

        Ok(ClusterAlignment::new(
            vec![stem(source), stem(target)],
            vec![
                vec![1.0, self.similarity],
                vec![self.similarity, 1.0],
            ],
        ))
    }

    fn name(&self) -> &str {
        "mock-cluster-aligner"
    }
}

/// Writes `prediction.txt` naming the genome and the SSN switch
pub struct MockFunctionPredictor {
    fail: bool,
    calls: AtomicUsize,
    saw_no_ssn: AtomicBool,
}

impl MockFunctionPredictor {
    pub fn new() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
            saw_no_ssn: AtomicBool::new(false),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Whether any call asked for predictions without SSN features
    pub fn saw_no_ssn(&self) -> bool {
        self.saw_no_ssn.load(Ordering::SeqCst)
    }
}

impl Default for MockFunctionPredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionPredictor for MockFunctionPredictor {
    fn predict(&self, genome: &Path, output_dir: &Path, no_ssn: bool) -> ToolResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if no_ssn {
            self.saw_no_ssn.store(true, Ordering::SeqCst);
        }
        if self.fail {
            return Err(ToolError::NonZeroExit {
                program: "mock-predictor".to_string(),
                code: 2,
                stderr: format!("no clusters in {}", genome.display()),
            });
        }

        fs::create_dir_all(output_dir)?;
        fs::write(
            output_dir.join("prediction.txt"),
            format!("{}	no_ssn={}
", stem(genome), no_ssn),
        )?;
        Ok(())
    }

    fn name(&self) -> &str {
        "mock-function-predictor"
    }
}
