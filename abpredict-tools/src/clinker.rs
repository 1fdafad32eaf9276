//! Gene cluster alignment with clinker

use crate::command::{ToolCommand, ToolError, ToolResult};
use crate::traits::ClusterAligner;
use crate::types::ClusterAlignment;
use abpredict_core::config::ToolsConfig;
use std::path::Path;

/// File name of the similarity matrix written into the task directory
pub const MATRIX_FILE: &str = "matrix.csv";

pub struct ClinkerAligner {
    program: String,
}

impl ClinkerAligner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn from_config(config: &ToolsConfig) -> Self {
        Self::new(config.clinker.clone())
    }

    pub fn command(&self, source: &Path, target: &Path, matrix: &Path) -> ToolCommand {
        ToolCommand::new(self.program.clone())
            .arg(source)
            .arg(target)
            .arg("-mo")
            .arg(matrix)
            .expect_output(matrix)
    }
}

impl ClusterAligner for ClinkerAligner {
    fn align_clusters(
        &self,
        source: &Path,
        target: &Path,
        output_dir: &Path,
    ) -> ToolResult<ClusterAlignment> {
        std::fs::create_dir_all(output_dir)?;
        let matrix = output_dir.join(MATRIX_FILE);
        self.command(source, target, &matrix).run()?;
        let text = std::fs::read_to_string(&matrix)?;
        parse_similarity_matrix(&text)
    }

    fn name(&self) -> &str {
        "clinker"
    }
}

/// Parse a labelled square matrix.
///
/// The header row lists cluster names (optionally after an empty corner
/// cell); each body row starts with a cluster name followed by one value per
/// column. Comma or tab delimited, with CSV quoting.
pub fn parse_similarity_matrix(text: &str) -> ToolResult<ClusterAlignment> {
    let first_line = text
        .lines()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| ToolError::Parse("empty similarity matrix".to_string()))?;
    let delimiter = if first_line.contains('\t') { b'\t' } else { b',' };

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record =
            record.map_err(|e| ToolError::Parse(format!("matrix line {}: {}", i + 1, e)))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect::<Vec<String>>());
    }

    let mut rows = rows.into_iter();
    let mut header_cells = rows
        .next()
        .ok_or_else(|| ToolError::Parse("empty similarity matrix".to_string()))?;
    let body: Vec<Vec<String>> = rows.collect();

    // Drop the corner cell when the header is one column wider than the names
    if header_cells.first().map_or(false, |c| c.is_empty())
        || body.first().map_or(false, |row| row.len() == header_cells.len())
    {
        header_cells.remove(0);
    }
    let clusters = header_cells;

    if body.len() != clusters.len() {
        return Err(ToolError::Parse(format!(
            "matrix has {} names but {} rows",
            clusters.len(),
            body.len()
        )));
    }

    let mut matrix = Vec::with_capacity(body.len());
    for (i, row) in body.iter().enumerate() {
        if row.len() != clusters.len() + 1 {
            return Err(ToolError::Parse(format!(
                "row {} has {} values, expected {}",
                i + 1,
                row.len().saturating_sub(1),
                clusters.len()
            )));
        }
        let values = row[1..]
            .iter()
            .map(|cell| match cell.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(ToolError::Parse(format!(
                    "row {}: '{}' is not a finite number",
                    i + 1,
                    cell
                ))),
            })
            .collect::<ToolResult<Vec<f64>>>()?;
        matrix.push(values);
    }

    Ok(ClusterAlignment::new(clusters, matrix))
}
