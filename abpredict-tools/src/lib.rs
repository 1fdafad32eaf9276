//! External collaborators used by the abpredict pipeline
//!
//! Each tool (marker caller, local search, cluster aligner, function
//! predictor) is wrapped behind a trait so the pipeline can be driven by the
//! real binaries or by in-process mocks in tests.

pub mod blast;
pub mod clinker;
pub mod command;
pub mod predictor;
pub mod rgi;
pub mod testing;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use blast::{parse_search_hits, BlastpSearch};
pub use clinker::{parse_similarity_matrix, ClinkerAligner};
pub use command::{ToolCommand, ToolError, ToolResult};
pub use predictor::ScriptPredictor;
pub use rgi::RgiCaller;
pub use testing::{MockClusterAligner, MockFunctionPredictor, MockLocalSearch, MockMarkerCaller};
pub use traits::{ClusterAligner, FunctionPredictor, LocalSearch, MarkerCaller};
pub use types::{ClusterAlignment, SearchHit, Tool};
