//! Protein local search with BLAST+ `blastp`

use crate::command::{ToolCommand, ToolError, ToolResult};
use crate::traits::LocalSearch;
use crate::types::SearchHit;
use abpredict_core::config::ToolsConfig;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

/// Tabular columns requested from blastp, in this order
pub const OUTFMT: &str = "6 qseqid qstart qend sseqid sstart send evalue bitscore";

pub struct BlastpSearch {
    program: String,
}

impl BlastpSearch {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn from_config(config: &ToolsConfig) -> Self {
        Self::new(config.blastp.clone())
    }

    pub fn command(&self, query_fasta: &Path, target_fasta: &Path, output: &Path) -> ToolCommand {
        ToolCommand::new(self.program.clone())
            .arg("-query")
            .arg(query_fasta)
            .arg("-subject")
            .arg(target_fasta)
            .arg("-outfmt")
            .arg(OUTFMT)
            .arg("-out")
            .arg(output)
            .expect_output(output)
    }
}

impl LocalSearch for BlastpSearch {
    fn search(
        &self,
        query_fasta: &Path,
        target_fasta: &Path,
        output: &Path,
    ) -> ToolResult<Vec<SearchHit>> {
        self.command(query_fasta, target_fasta, output).run()?;
        let file = File::open(output)?;
        parse_search_hits(BufReader::new(file))
    }

    fn name(&self) -> &str {
        "blastp"
    }
}

fn field<T: FromStr>(fields: &[&str], idx: usize, line_no: usize) -> ToolResult<T> {
    fields[idx].trim().parse().map_err(|_| {
        ToolError::Parse(format!(
            "line {}: invalid value '{}' in column {}",
            line_no,
            fields[idx],
            idx + 1
        ))
    })
}

/// Parse tabular search output in the column order of [`OUTFMT`]
pub fn parse_search_hits<R: BufRead>(reader: R) -> ToolResult<Vec<SearchHit>> {
    let mut hits = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        // Fields: qseqid qstart qend sseqid sstart send evalue bitscore
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 8 {
            return Err(ToolError::Parse(format!(
                "line {}: expected 8 columns, found {}",
                line_no,
                fields.len()
            )));
        }

        hits.push(SearchHit {
            query_id: fields[0].to_string(),
            query_start: field(&fields, 1, line_no)?,
            query_end: field(&fields, 2, line_no)?,
            hit_id: fields[3].to_string(),
            hit_start: field(&fields, 4, line_no)?,
            hit_end: field(&fields, 5, line_no)?,
            evalue: field(&fields, 6, line_no)?,
            bit_score: field(&fields, 7, line_no)?,
        });
    }

    Ok(hits)
}
