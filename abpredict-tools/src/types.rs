//! Common types for external tools

use abpredict_core::config::ToolsConfig;
use serde::{Deserialize, Serialize};

/// External programs the pipeline drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tool {
    Rgi,
    Blastp,
    Clinker,
    Predictor,
}

impl Tool {
    pub fn binary_name(&self) -> &'static str {
        match self {
            Tool::Rgi => "rgi",
            Tool::Blastp => "blastp",
            Tool::Clinker => "clinker",
            Tool::Predictor => "predict_function.sh",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Tool::Rgi => "RGI",
            Tool::Blastp => "BLAST+ blastp",
            Tool::Clinker => "clinker",
            Tool::Predictor => "BGC function predictor",
        }
    }

    /// Program configured for this tool
    pub fn program<'a>(&self, config: &'a ToolsConfig) -> &'a str {
        match self {
            Tool::Rgi => &config.rgi,
            Tool::Blastp => &config.blastp,
            Tool::Clinker => &config.clinker,
            Tool::Predictor => &config.predictor,
        }
    }

    /// Tools a full comparison run needs
    pub fn comparison_tools() -> [Tool; 3] {
        [Tool::Rgi, Tool::Blastp, Tool::Clinker]
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One row of tabular local-search output
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub query_id: String,
    pub query_start: usize,
    pub query_end: usize,
    pub hit_id: String,
    pub hit_start: usize,
    pub hit_end: usize,
    pub evalue: f64,
    pub bit_score: f64,
}

/// Cluster names and their pairwise similarity matrix, in matching order
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAlignment {
    pub clusters: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
}

impl ClusterAlignment {
    pub fn new(clusters: Vec<String>, matrix: Vec<Vec<f64>>) -> Self {
        Self { clusters, matrix }
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_square(&self) -> bool {
        self.matrix.len() == self.clusters.len()
            && self.matrix.iter().all(|row| row.len() == self.clusters.len())
    }
}
