//! Sequence types, file formats and pairwise alignment for abpredict

pub mod alignment;
pub mod formats;
pub mod sequence;

// Re-export commonly used types
pub use alignment::{GlobalAligner, GlobalAlignment, ScoringMatrix, BLOSUM62};
pub use formats::fasta::{write_fasta, write_fasta_to_writer};
pub use formats::marker_table::{parse_marker_table, read_marker_table, ResistanceMarker};
pub use sequence::Sequence;
