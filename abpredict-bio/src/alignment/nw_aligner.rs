/// Needleman-Wunsch global alignment with affine gaps (Gotoh)
use crate::alignment::scoring::{ScoringMatrix, BLOSUM62};

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalAlignment {
    pub score: f64,
    pub query_aligned: Vec<u8>,
    pub target_aligned: Vec<u8>,
    pub alignment_string: Vec<u8>, // '|' for identity, '.' for mismatch, '-' for gap
}

impl GlobalAlignment {
    /// The "no alignment" value: zero score and no columns
    pub fn empty() -> Self {
        Self {
            score: 0.0,
            query_aligned: Vec::new(),
            target_aligned: Vec::new(),
            alignment_string: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.query_aligned.is_empty()
    }

    pub fn len(&self) -> usize {
        self.alignment_string.len()
    }

    /// Three-line rendering: target, column markers, query
    pub fn pretty(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        format!(
            "{}\n{}\n{}",
            String::from_utf8_lossy(&self.target_aligned),
            String::from_utf8_lossy(&self.alignment_string),
            String::from_utf8_lossy(&self.query_aligned)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum State {
    /// Query residue paired with target residue
    Match = 0,
    /// Target residue against a gap in the query
    GapInQuery = 1,
    /// Query residue against a gap in the target
    GapInTarget = 2,
}

impl State {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => State::GapInQuery,
            2 => State::GapInTarget,
            _ => State::Match,
        }
    }
}

/// Best of three candidate scores; ties prefer Match, then GapInTarget.
fn best_of(m: f64, x: f64, y: f64) -> (f64, State) {
    if m >= x && m >= y {
        (m, State::Match)
    } else if y >= x {
        (y, State::GapInTarget)
    } else {
        (x, State::GapInQuery)
    }
}

pub struct GlobalAligner<S: ScoringMatrix> {
    scoring: S,
}

impl Default for GlobalAligner<BLOSUM62> {
    fn default() -> Self {
        Self::new(BLOSUM62::new())
    }
}

impl<S: ScoringMatrix> GlobalAligner<S> {
    pub fn new(scoring: S) -> Self {
        Self { scoring }
    }

    pub fn scoring(&self) -> &S {
        &self.scoring
    }

    /// Optimal end-to-end alignment of `query` against `target`.
    ///
    /// End gaps are scored like internal gaps. When several alignments reach
    /// the optimal score one of them is returned; the score is the same.
    pub fn align(&self, query: &[u8], target: &[u8]) -> GlobalAlignment {
        let n = query.len();
        let m = target.len();
        if n == 0 && m == 0 {
            return GlobalAlignment::empty();
        }

        let open = self.scoring.gap_open();
        let extend = self.scoring.gap_extend();
        let width = m + 1;
        let neg = f64::NEG_INFINITY;

        // Traceback: predecessor state for each (cell, state)
        let mut trace_m = vec![State::Match as u8; (n + 1) * width];
        let mut trace_x = vec![State::Match as u8; (n + 1) * width];
        let mut trace_y = vec![State::Match as u8; (n + 1) * width];

        // Rolling score rows
        let mut prev_m = vec![neg; width];
        let mut prev_x = vec![neg; width];
        let mut prev_y = vec![neg; width];
        let mut cur_m = vec![neg; width];
        let mut cur_x = vec![neg; width];
        let mut cur_y = vec![neg; width];

        prev_m[0] = 0.0;
        for j in 1..=m {
            prev_x[j] = open + extend * (j as f64 - 1.0);
            if j > 1 {
                trace_x[j] = State::GapInQuery as u8;
            }
        }

        for i in 1..=n {
            cur_m[0] = neg;
            cur_x[0] = neg;
            cur_y[0] = open + extend * (i as f64 - 1.0);
            if i > 1 {
                trace_y[i * width] = State::GapInTarget as u8;
            }

            for j in 1..=m {
                let cell = i * width + j;

                let (diag, from) = best_of(prev_m[j - 1], prev_x[j - 1], prev_y[j - 1]);
                cur_m[j] = diag + self.scoring.score(query[i - 1], target[j - 1]);
                trace_m[cell] = from as u8;

                let (left, from) = best_of(
                    cur_m[j - 1] + open,
                    cur_x[j - 1] + extend,
                    cur_y[j - 1] + open,
                );
                cur_x[j] = left;
                trace_x[cell] = from as u8;

                let (up, from) = best_of(prev_m[j] + open, prev_x[j] + open, prev_y[j] + extend);
                cur_y[j] = up;
                trace_y[cell] = from as u8;
            }

            std::mem::swap(&mut prev_m, &mut cur_m);
            std::mem::swap(&mut prev_x, &mut cur_x);
            std::mem::swap(&mut prev_y, &mut cur_y);
        }

        // prev_* now hold row n
        let (score, mut state) = best_of(prev_m[m], prev_x[m], prev_y[m]);

        let mut query_aligned = Vec::with_capacity(n + m);
        let mut target_aligned = Vec::with_capacity(n + m);
        let (mut i, mut j) = (n, m);

        while i > 0 || j > 0 {
            let cell = i * width + j;
            match state {
                State::Match => {
                    query_aligned.push(query[i - 1]);
                    target_aligned.push(target[j - 1]);
                    state = State::from_u8(trace_m[cell]);
                    i -= 1;
                    j -= 1;
                }
                State::GapInQuery => {
                    query_aligned.push(b'-');
                    target_aligned.push(target[j - 1]);
                    state = State::from_u8(trace_x[cell]);
                    j -= 1;
                }
                State::GapInTarget => {
                    query_aligned.push(query[i - 1]);
                    target_aligned.push(b'-');
                    state = State::from_u8(trace_y[cell]);
                    i -= 1;
                }
            }
        }

        query_aligned.reverse();
        target_aligned.reverse();

        let alignment_string = calculate_alignment_string(&query_aligned, &target_aligned);

        GlobalAlignment {
            score,
            query_aligned,
            target_aligned,
            alignment_string,
        }
    }
}

fn calculate_alignment_string(query_aligned: &[u8], target_aligned: &[u8]) -> Vec<u8> {
    query_aligned
        .iter()
        .zip(target_aligned.iter())
        .map(|(&q, &t)| {
            if q == b'-' || t == b'-' {
                b'-'
            } else if q.eq_ignore_ascii_case(&t) {
                b'|'
            } else {
                b'.'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_identical_sequences() {
        let aligner = GlobalAligner::default();
        let result = aligner.align(b"MKT", b"MKT");

        assert_close(result.score, 15.0);
        assert_eq!(result.query_aligned, b"MKT");
        assert_eq!(result.target_aligned, b"MKT");
        assert_eq!(result.alignment_string, b"|||");
    }

    #[test]
    fn test_single_substitution() {
        let aligner = GlobalAligner::default();
        let result = aligner.align(b"MKT", b"MKS");

        // M/M 5 + K/K 5 + T/S 1
        assert_close(result.score, 11.0);
        assert_eq!(result.alignment_string, b"||.");
    }

    #[test]
    fn test_single_gap_uses_open_score() {
        let aligner = GlobalAligner::default();
        let result = aligner.align(b"MKTA", b"MKA");

        // M 5 + K 5 + gap -15 + A 4
        assert_close(result.score, -1.0);
        assert_eq!(result.query_aligned, b"MKTA");
        assert_eq!(result.target_aligned, b"MK-A");
    }

    #[test]
    fn test_gap_extension() {
        let aligner = GlobalAligner::default();
        let result = aligner.align(b"MKTTA", b"MKA");

        assert_close(result.score, 5.0 + 5.0 - 15.0 - 6.67 + 4.0);
        assert_eq!(result.target_aligned, b"MK--A");
    }

    #[test]
    fn test_end_gaps_are_penalised() {
        let aligner = GlobalAligner::default();
        let result = aligner.align(b"", b"MKT");

        assert_close(result.score, -15.0 - 6.67 * 2.0);
        assert_eq!(result.query_aligned, b"---");
        assert_eq!(result.target_aligned, b"MKT");
    }

    #[test]
    fn test_both_empty() {
        let aligner = GlobalAligner::default();
        let result = aligner.align(b"", b"");
        assert_eq!(result, GlobalAlignment::empty());
        assert_eq!(result.pretty(), "");
    }

    #[test]
    fn test_custom_gap_scores() {
        let aligner = GlobalAligner::new(BLOSUM62::new().with_gap_scores(-1.0, -1.0));
        let result = aligner.align(b"MKTA", b"MKA");
        assert_close(result.score, 5.0 + 5.0 - 1.0 + 4.0);
    }

    #[test]
    fn test_pretty_has_three_lines() {
        let aligner = GlobalAligner::default();
        let result = aligner.align(b"MKT", b"MKS");
        assert_eq!(result.pretty(), "MKS\n||.\nMKT");
    }
}
