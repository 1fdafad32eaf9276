pub mod nw_aligner;
pub mod scoring;

pub use nw_aligner::{GlobalAligner, GlobalAlignment};
pub use scoring::{ScoringMatrix, BLOSUM62};
