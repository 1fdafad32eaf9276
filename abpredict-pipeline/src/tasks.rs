//! Task expansion for the pipeline stages

use crate::error::PipelineResult;
use crate::progress::percent_complete;
use abpredict_core::AbpredictError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

/// File stem as an owned string
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// A genome assembly, identified by its file stem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genome {
    pub id: String,
    pub path: PathBuf,
}

impl Genome {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            id: file_stem(&path),
            path,
        }
    }
}

/// A biosynthetic gene cluster file owned by one genome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bgc {
    pub genome: String,
    pub path: PathBuf,
}

impl Bgc {
    pub fn new(genome: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            genome: genome.into(),
            path: path.into(),
        }
    }

    pub fn id(&self) -> String {
        file_stem(&self.path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Markers,
    ClusterAlignment,
    MarkerAlignment,
    FunctionPrediction,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Markers => "markers",
            Stage::ClusterAlignment => "cluster-alignment",
            Stage::MarkerAlignment => "marker-alignment",
            Stage::FunctionPrediction => "function-prediction",
        }
    }

    /// Directory under `<out>/<genome>/` holding this stage's task directories
    pub fn dir_name(&self) -> &'static str {
        match self {
            Stage::Markers => "markers",
            Stage::ClusterAlignment => "cluster_alignment",
            Stage::MarkerAlignment => "marker_alignment",
            Stage::FunctionPrediction => "function_prediction",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One unit of work. `target` is `None` for per-genome stages.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTask {
    pub stage: Stage,
    pub query: PathBuf,
    pub target: Option<PathBuf>,
    /// Display name of the target: `<genome>/<bgc>` for cluster alignment,
    /// the genome id for marker alignment
    pub target_label: String,
    pub output_dir: PathBuf,
    /// Informational only
    pub progress: f64,
}

impl ComparisonTask {
    pub fn query_label(&self) -> String {
        file_stem(&self.query)
    }

    pub fn label(&self) -> String {
        match &self.target {
            Some(_) => format!("{} vs {}", self.query_label(), self.target_label),
            None => self.query_label(),
        }
    }
}

/// Expands genomes and data files into per-stage task lists rooted at `output_dir`
pub struct TaskGenerator {
    output_dir: PathBuf,
}

impl TaskGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where stage 1 leaves the marker table of `genome_id`
    pub fn marker_table_path(&self, genome_id: &str) -> PathBuf {
        self.output_dir
            .join(genome_id)
            .join(Stage::Markers.dir_name())
            .join(format!("{}.txt", genome_id))
    }

    /// One task per genome
    pub fn marker_tasks(&self, genomes: &[Genome]) -> PipelineResult<Vec<ComparisonTask>> {
        let tasks = genomes
            .iter()
            .enumerate()
            .map(|(i, genome)| ComparisonTask {
                stage: Stage::Markers,
                query: genome.path.clone(),
                target: None,
                target_label: String::new(),
                output_dir: self.output_dir.join(&genome.id).join(Stage::Markers.dir_name()),
                progress: percent_complete(i, genomes.len()),
            })
            .collect();
        ensure_unique_dirs(tasks)
    }

    /// One prediction task per genome
    pub fn function_tasks(&self, genomes: &[Genome]) -> PipelineResult<Vec<ComparisonTask>> {
        let stage = Stage::FunctionPrediction;
        let tasks = genomes
            .iter()
            .enumerate()
            .map(|(i, genome)| ComparisonTask {
                stage,
                query: genome.path.clone(),
                target: None,
                target_label: String::new(),
                output_dir: self.output_dir.join(&genome.id).join(stage.dir_name()),
                progress: percent_complete(i, genomes.len()),
            })
            .collect();
        ensure_unique_dirs(tasks)
    }

    /// Every BGC of a genome against every BGC of every other genome.
    /// Both directions of a pair are kept.
    pub fn cluster_tasks(
        &self,
        bgcs: &BTreeMap<String, Vec<Bgc>>,
    ) -> PipelineResult<Vec<ComparisonTask>> {
        let mut tasks = Vec::new();

        for (genome, query_bgcs) in bgcs {
            let stage_dir = self
                .output_dir
                .join(genome)
                .join(Stage::ClusterAlignment.dir_name());
            let targets: Vec<&Bgc> = bgcs
                .iter()
                .filter(|(other, _)| *other != genome)
                .flat_map(|(_, list)| list.iter())
                .collect();

            for (j, query) in query_bgcs.iter().enumerate() {
                let progress = percent_complete(j, query_bgcs.len());
                for target in &targets {
                    if query.path == target.path {
                        continue;
                    }
                    tasks.push(ComparisonTask {
                        stage: Stage::ClusterAlignment,
                        query: query.path.clone(),
                        target: Some(target.path.clone()),
                        target_label: format!("{}/{}", target.genome, target.id()),
                        output_dir: stage_dir.join(format!(
                            "{}__{}__{}",
                            query.id(),
                            target.genome,
                            target.id()
                        )),
                        progress,
                    });
                }
            }
        }

        ensure_unique_dirs(tasks)
    }

    /// Every query marker file of a genome against the stage 1 marker table
    /// of every other genome in `genomes`
    pub fn marker_alignment_tasks(
        &self,
        query_markers: &BTreeMap<String, Vec<PathBuf>>,
        genomes: &[Genome],
    ) -> PipelineResult<Vec<ComparisonTask>> {
        let mut tasks = Vec::new();

        for (genome, files) in query_markers {
            let stage_dir = self
                .output_dir
                .join(genome)
                .join(Stage::MarkerAlignment.dir_name());

            for (j, query) in files.iter().enumerate() {
                let progress = percent_complete(j, files.len());
                for target in genomes.iter().filter(|g| &g.id != genome) {
                    tasks.push(ComparisonTask {
                        stage: Stage::MarkerAlignment,
                        query: query.clone(),
                        target: Some(self.marker_table_path(&target.id)),
                        target_label: target.id.clone(),
                        output_dir: stage_dir
                            .join(format!("{}__{}", file_stem(query), target.id)),
                        progress,
                    });
                }
            }
        }

        ensure_unique_dirs(tasks)
    }
}

/// Two tasks writing into one directory would clobber each other's outputs
fn ensure_unique_dirs(tasks: Vec<ComparisonTask>) -> PipelineResult<Vec<ComparisonTask>> {
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        if !seen.insert(task.output_dir.as_path()) {
            return Err(AbpredictError::ContractViolation(format!(
                "two {} tasks share the output directory {}",
                task.stage,
                task.output_dir.display()
            ))
            .into());
        }
    }
    Ok(tasks)
}
