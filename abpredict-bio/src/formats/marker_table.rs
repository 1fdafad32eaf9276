//! Resistance-marker tables produced by the marker caller
//!
//! The table is tab separated with a header row. Only four columns are read:
//! `Contig`, `Predicted_Protein`, `AMR Gene Family` and `ID`. Any other
//! columns are ignored, and their order does not matter.

use crate::sequence::Sequence;
use abpredict_core::error::{AbpredictError, AbpredictResult};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// One row of a marker table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResistanceMarker {
    #[serde(rename = "Contig")]
    pub contig: String,
    #[serde(rename = "Predicted_Protein")]
    pub protein: String,
    #[serde(rename = "AMR Gene Family")]
    pub gene_family: String,
    #[serde(rename = "ID")]
    pub id: String,
}

impl ResistanceMarker {
    pub fn new(contig: &str, protein: &str, gene_family: &str, id: &str) -> Self {
        Self {
            contig: strip_whitespace(contig),
            protein: protein.to_string(),
            gene_family: gene_family.to_string(),
            id: id.to_string(),
        }
    }

    /// Protein record keyed by contig, as written to search inputs
    pub fn to_sequence(&self) -> Sequence {
        Sequence::new(self.contig.clone(), self.protein.as_bytes().to_vec())
    }

    pub fn shares_family(&self, other: &ResistanceMarker) -> bool {
        self.gene_family == other.gene_family
    }
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parse a marker table from any reader
pub fn parse_marker_table<R: Read>(reader: R) -> AbpredictResult<Vec<ResistanceMarker>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut markers = Vec::new();
    for (row, record) in rdr.deserialize::<ResistanceMarker>().enumerate() {
        let mut marker = record.map_err(|e| {
            AbpredictError::Parse(format!("marker table row {}: {}", row + 1, e))
        })?;
        marker.contig = strip_whitespace(&marker.contig);
        markers.push(marker);
    }

    Ok(markers)
}

/// Read a marker table from disk; a missing file is `InputMissing`
pub fn read_marker_table<P: AsRef<Path>>(path: P) -> AbpredictResult<Vec<ResistanceMarker>> {
    let path = path.as_ref();
    AbpredictError::require_exists(path)?;
    let file = std::fs::File::open(path)?;
    let markers = parse_marker_table(file)?;
    tracing::debug!("Read {} markers from {}", markers.len(), path.display());
    Ok(markers)
}
