/// Substitution scoring for protein alignment

use std::collections::HashMap;

/// Residue substitution scores plus affine gap scores.
///
/// Gap scores are signed and added to the alignment score: a gap of length
/// `n` contributes `gap_open() + (n - 1) * gap_extend()`.
pub trait ScoringMatrix: Send + Sync {
    fn score(&self, a: u8, b: u8) -> f64;
    fn gap_open(&self) -> f64;
    fn gap_extend(&self) -> f64;
}

/// BLOSUM62 scoring matrix for protein sequences
#[derive(Debug, Clone)]
pub struct BLOSUM62 {
    matrix: [[i32; 24]; 24],
    index_map: HashMap<u8, usize>,
    gap_open: f64,
    gap_extend: f64,
}

impl BLOSUM62 {
    pub fn new() -> Self {
        let mut index_map = HashMap::new();
        let amino_acids = b"ARNDCQEGHILKMFPSTWYVBZX*";
        for (i, &aa) in amino_acids.iter().enumerate() {
            index_map.insert(aa, i);
        }

        let matrix = [
            [ 4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0, -2, -1,  0, -4],
            [-1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3, -1,  0, -1, -4],
            [-2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3,  3,  0, -1, -4],
            [-2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3,  4,  1, -1, -4],
            [ 0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1, -3, -3, -2, -4],
            [-1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2,  0,  3, -1, -4],
            [-1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4],
            [ 0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3, -1, -2, -1, -4],
            [-2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3,  0,  0, -1, -4],
            [-1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3, -3, -3, -1, -4],
            [-1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1, -4, -3, -1, -4],
            [-1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2,  0,  1, -1, -4],
            [-1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1, -3, -1, -1, -4],
            [-2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1, -3, -3, -1, -4],
            [-1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2, -2, -1, -2, -4],
            [ 1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2,  0,  0,  0, -4],
            [ 0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0, -1, -1,  0, -4],
            [-3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3, -4, -3, -2, -4],
            [-2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1, -3, -2, -1, -4],
            [ 0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4, -3, -2, -1, -4],
            [-2, -1,  3,  4, -3,  0,  1, -1,  0, -3, -4,  0, -3, -3, -2,  0, -1, -4, -3, -3,  4,  1, -1, -4],
            [-1,  0,  0,  1, -3,  3,  4, -2,  0, -3, -3,  1, -1, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4],
            [ 0, -1, -1, -1, -2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -2,  0,  0, -2, -1, -1, -1, -1, -1, -4],
            [-4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4,  1]
        ];

        Self {
            matrix,
            index_map,
            gap_open: -15.0,
            gap_extend: -6.67,
        }
    }

    pub fn with_gap_scores(mut self, gap_open: f64, gap_extend: f64) -> Self {
        self.gap_open = gap_open;
        self.gap_extend = gap_extend;
        self
    }
}

impl Default for BLOSUM62 {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringMatrix for BLOSUM62 {
    fn score(&self, a: u8, b: u8) -> f64 {
        let a = a.to_ascii_uppercase();
        let b = b.to_ascii_uppercase();

        let i = self.index_map.get(&a).copied().unwrap_or(22); // X for unknown
        let j = self.index_map.get(&b).copied().unwrap_or(22);

        self.matrix[i][j] as f64
    }

    fn gap_open(&self) -> f64 {
        self.gap_open
    }

    fn gap_extend(&self) -> f64 {
        self.gap_extend
    }
}
