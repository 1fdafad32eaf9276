pub mod fasta;
pub mod marker_table;

pub use fasta::{write_fasta, write_fasta_to_writer};
pub use marker_table::{parse_marker_table, read_marker_table, ResistanceMarker};
