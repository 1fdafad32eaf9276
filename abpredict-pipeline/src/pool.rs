//! Bounded-parallelism stage execution

use crate::error::{PipelineError, PipelineResult};
use crate::progress::create_progress_bar;
use crate::tasks::Stage;
use rayon::prelude::*;
use tracing::{error, info};

/// Result of one task
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Completed(String),
    /// Already done in an earlier run
    Skipped(String),
    Failed { label: String, error: String },
}

impl TaskOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, TaskOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageSummary {
    pub completed: usize,
    pub skipped: usize,
}

/// Run every task of a stage on `concurrency` workers and wait for all of them.
///
/// A failing task does not stop its siblings. Outcomes come back in task order.
pub fn run_stage<T, F>(
    stage: Stage,
    tasks: &[T],
    worker: F,
    concurrency: usize,
) -> PipelineResult<Vec<TaskOutcome>>
where
    T: Sync,
    F: Fn(&T) -> TaskOutcome + Sync + Send,
{
    info!(
        "Stage {}: {} tasks on {} workers",
        stage,
        tasks.len(),
        concurrency
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(concurrency.max(1))
        .build()
        .map_err(|e| PipelineError::ThreadPool(e.to_string()))?;

    let pb = create_progress_bar(tasks.len() as u64, &format!("Stage {}", stage));

    let outcomes: Vec<TaskOutcome> = pool.install(|| {
        tasks
            .par_iter()
            .map(|task| {
                let outcome = worker(task);
                match &outcome {
                    TaskOutcome::Completed(msg) | TaskOutcome::Skipped(msg) => info!("{}", msg),
                    TaskOutcome::Failed { label, error } => error!("{} failed: {}", label, error),
                }
                pb.inc(1);
                outcome
            })
            .collect()
    });

    pb.finish_and_clear();
    Ok(outcomes)
}

/// Barrier check: any failure fails the whole stage
pub fn check_outcomes(stage: Stage, outcomes: &[TaskOutcome]) -> PipelineResult<StageSummary> {
    let mut summary = StageSummary::default();
    let mut failed = Vec::new();

    for outcome in outcomes {
        match outcome {
            TaskOutcome::Completed(_) => summary.completed += 1,
            TaskOutcome::Skipped(_) => summary.skipped += 1,
            TaskOutcome::Failed { label, .. } => failed.push(label.clone()),
        }
    }

    if !failed.is_empty() {
        return Err(PipelineError::StageFailed {
            stage,
            total: outcomes.len(),
            failed,
        });
    }

    info!(
        "Stage {} finished: {} completed, {} already done",
        stage, summary.completed, summary.skipped
    );
    Ok(summary)
}
