//! Cross-genome marker and gene cluster comparison pipeline
//!
//! Three stages run in order, each behind a barrier:
//! marker detection per genome, all-pairs cluster alignment, and all-pairs
//! marker alignment (prefilter + global alignment). BGC function
//! prediction runs as a separate per-genome batch.

pub mod cache;
pub mod cluster;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod pool;
pub mod prefilter;
pub mod progress;
pub mod tasks;
pub mod workers;

// Re-export commonly used types
pub use cache::{ResultCache, StatusRecord, TaskStatus, STATUS_FILE};
pub use cluster::{ClusterSimilarityEngine, ClusterSimilarityResult};
pub use discovery::{discover_bgcs, discover_genomes, discover_query_markers};
pub use engine::{AlignmentEngine, AlignmentResult};
pub use error::{PipelineError, PipelineResult};
pub use orchestrator::{Collaborators, Orchestrator, RunSummary};
pub use pool::{run_stage, StageSummary, TaskOutcome};
pub use prefilter::PrefilterStage;
pub use tasks::{Bgc, ComparisonTask, Genome, Stage, TaskGenerator};
