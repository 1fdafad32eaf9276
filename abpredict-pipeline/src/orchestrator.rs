//! Runs the comparison stages in order with a barrier after each, and the
//! standalone function prediction batch

use crate::cache::ResultCache;
use crate::discovery::{discover_bgcs, discover_query_markers};
use crate::engine::AlignmentEngine;
use crate::error::PipelineResult;
use crate::pool::{check_outcomes, run_stage, StageSummary, TaskOutcome};
use crate::progress::progress_message;
use crate::tasks::{ComparisonTask, Genome, Stage, TaskGenerator};
use crate::workers::{compare_clusters, detect_markers, predict_function, MarkerAlignment};
use abpredict_core::config::ToolsConfig;
use abpredict_core::{resolve_concurrency, AbpredictError, Config};
use abpredict_tools::{
    BlastpSearch, ClinkerAligner, ClusterAligner, FunctionPredictor, LocalSearch, MarkerCaller,
    RgiCaller, ScriptPredictor,
};
use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// The external tools a run depends on
#[derive(Clone)]
pub struct Collaborators {
    pub marker_caller: Arc<dyn MarkerCaller>,
    pub search: Arc<dyn LocalSearch>,
    pub cluster_aligner: Arc<dyn ClusterAligner>,
    pub function_predictor: Arc<dyn FunctionPredictor>,
}

impl Collaborators {
    pub fn from_config(config: &ToolsConfig) -> Self {
        Self {
            marker_caller: Arc::new(RgiCaller::from_config(config)),
            search: Arc::new(BlastpSearch::from_config(config)),
            cluster_aligner: Arc::new(ClinkerAligner::from_config(config)),
            function_predictor: Arc::new(ScriptPredictor::from_config(config)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub markers: StageSummary,
    pub cluster_alignment: StageSummary,
    pub marker_alignment: StageSummary,
}

pub struct Orchestrator {
    config: Config,
    generator: TaskGenerator,
    cache: ResultCache,
    engine: AlignmentEngine,
    tools: Collaborators,
}

impl Orchestrator {
    pub fn new(
        config: Config,
        output_dir: impl Into<PathBuf>,
        tools: Collaborators,
    ) -> PipelineResult<Self> {
        config.validate()?;
        let engine = AlignmentEngine::from_config(&config.alignment)?;
        Ok(Self {
            cache: ResultCache::new(config.pipeline.cache_policy),
            config,
            generator: TaskGenerator::new(output_dir),
            engine,
            tools,
        })
    }

    pub fn output_dir(&self) -> &Path {
        self.generator.output_dir()
    }

    /// Marker detection, cluster alignment, then marker alignment, with
    /// BGCs and query markers discovered under `data_dir`.
    ///
    /// Inputs are checked before anything is scheduled. Each stage must
    /// finish without failures before the next one starts.
    pub fn run(&self, data_dir: &Path, genomes: &[Genome]) -> PipelineResult<RunSummary> {
        AbpredictError::require_exists(data_dir)?;
        let concurrency = self.prepare(genomes)?;

        info!(
            "Comparing {} genomes from {} into {}",
            genomes.len(),
            data_dir.display(),
            self.output_dir().display()
        );

        let tasks = self.generator.marker_tasks(genomes)?;
        let markers = self.run_tasks(Stage::Markers, &tasks, concurrency)?;

        let bgcs = discover_bgcs(data_dir)?;
        let tasks = self.generator.cluster_tasks(&bgcs)?;
        let cluster_alignment = self.run_tasks(Stage::ClusterAlignment, &tasks, concurrency)?;

        let query_markers = discover_query_markers(data_dir)?;
        let tasks = self
            .generator
            .marker_alignment_tasks(&query_markers, genomes)?;
        let marker_alignment = self.run_tasks(Stage::MarkerAlignment, &tasks, concurrency)?;

        Ok(RunSummary {
            markers,
            cluster_alignment,
            marker_alignment,
        })
    }

    /// Function prediction for every genome, independent of the comparison stages
    pub fn predict_functions(&self, genomes: &[Genome]) -> PipelineResult<StageSummary> {
        let concurrency = self.prepare(genomes)?;
        info!(
            "Predicting BGC functions for {} genomes into {}",
            genomes.len(),
            self.output_dir().display()
        );

        let tasks = self.generator.function_tasks(genomes)?;
        self.run_tasks(Stage::FunctionPrediction, &tasks, concurrency)
    }

    fn prepare(&self, genomes: &[Genome]) -> PipelineResult<usize> {
        for genome in genomes {
            AbpredictError::require_exists(&genome.path)?;
        }
        let concurrency = resolve_concurrency(self.config.pipeline.ncpus)?;
        std::fs::create_dir_all(self.output_dir())?;
        Ok(concurrency)
    }

    fn run_tasks(
        &self,
        stage: Stage,
        tasks: &[ComparisonTask],
        concurrency: usize,
    ) -> PipelineResult<StageSummary> {
        let outcomes = run_stage(stage, tasks, |task| self.execute(task), concurrency)?;
        check_outcomes(stage, &outcomes)
    }

    /// Cache check, status bookkeeping and the stage-specific work for one task
    pub fn execute(&self, task: &ComparisonTask) -> TaskOutcome {
        let label = task.label();
        if self.cache.is_done(&task.output_dir) {
            return TaskOutcome::Skipped(format!("Output for {} already exists", label));
        }

        let result = self
            .cache
            .begin(&task.output_dir, &label)
            .map_err(anyhow::Error::from)
            .and_then(|_| self.work(task));

        match result {
            Ok(message) => match self.cache.mark_done(&task.output_dir) {
                Ok(()) => TaskOutcome::Completed(progress_message(task.progress, &message)),
                Err(e) => TaskOutcome::Failed {
                    label,
                    error: e.to_string(),
                },
            },
            Err(e) => {
                let error = format!("{:#}", e);
                if let Err(e) = self.cache.mark_failed(&task.output_dir, &error) {
                    warn!("Could not record failure of {}: {}", label, e);
                }
                TaskOutcome::Failed { label, error }
            }
        }
    }

    fn work(&self, task: &ComparisonTask) -> Result<String> {
        match task.stage {
            Stage::Markers => {
                detect_markers(
                    self.tools.marker_caller.as_ref(),
                    &task.query,
                    &task.output_dir,
                )?;
                Ok(format!("Running marker detection on {}", task.query_label()))
            }
            Stage::ClusterAlignment => {
                let target = task
                    .target
                    .as_ref()
                    .ok_or_else(|| anyhow!("cluster task {} has no target", task.label()))?;
                compare_clusters(
                    self.tools.cluster_aligner.as_ref(),
                    &task.query,
                    std::slice::from_ref(target),
                    &task.output_dir,
                )?;
                Ok(format!(
                    "Running cluster alignment on {} and {}",
                    task.query_label(),
                    task.target_label
                ))
            }
            Stage::MarkerAlignment => {
                let target = task
                    .target
                    .as_ref()
                    .ok_or_else(|| anyhow!("alignment task {} has no target", task.label()))?;
                let job = MarkerAlignment {
                    engine: &self.engine,
                    search: self.tools.search.as_ref(),
                    prefilter: &self.config.prefilter,
                    family_filter: self.config.pipeline.family_filter,
                };
                let report = job.run(&task.query, target, &task.output_dir)?;
                println!("{}: mean score {:.2}", task.label(), report.mean_score);
                Ok(format!(
                    "Running alignment on {} and {} (mean score {:.2})",
                    task.query_label(),
                    task.target_label,
                    report.mean_score
                ))
            }
            Stage::FunctionPrediction => {
                predict_function(
                    self.tools.function_predictor.as_ref(),
                    &task.query,
                    &task.output_dir,
                    self.config.pipeline.no_ssn,
                )?;
                Ok(format!(
                    "Running BGC function prediction on {}",
                    task.query_label()
                ))
            }
        }
    }
}
