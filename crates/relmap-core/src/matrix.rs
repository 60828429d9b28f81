//! Word-word distance/similarity matrix.
//!
//! The matrix is the second artifact a model produces: an N×N grid of real
//! numbers whose rows and columns are indexed by vocabulary identifiers.
//! [`ScoreMatrix`] owns the data so the engine is free to overwrite the
//! diagonal, and remembers whether that overwrite already happened so a
//! matrix reused across several relation kinds is neutralized exactly once.

use crate::error::EvalError;
use ndarray::Array2;
use std::cmp::Ordering;

/// Interpretation of matrix entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreKind {
    /// Smaller is closer.
    Distance,
    /// Larger is closer.
    Similarity,
}

/// An owned square matrix of word-word scores.
#[derive(Debug, Clone)]
pub struct ScoreMatrix {
    values: Array2<f64>,
    kind: ScoreKind,
    neutralized: bool,
}

impl ScoreMatrix {
    /// Wraps a matrix of scores.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::NotSquare`] if the matrix is not square.
    pub fn new(values: Array2<f64>, kind: ScoreKind) -> Result<Self, EvalError> {
        let (rows, cols) = values.dim();
        if rows != cols {
            return Err(EvalError::NotSquare { rows, cols });
        }
        Ok(Self {
            values,
            kind,
            neutralized: false,
        })
    }

    /// Matrix dimension (N for an N×N matrix).
    pub fn n(&self) -> usize {
        self.values.nrows()
    }

    /// Interpretation of the entries.
    pub fn kind(&self) -> ScoreKind {
        self.kind
    }

    /// Overwrites the diagonal so a word can never be its own nearest
    /// neighbor: +∞ for distances, 0 for similarities.
    ///
    /// Idempotent; repeated calls after the first are no-ops, so the same
    /// matrix instance can back evaluations for several relation kinds.
    pub fn neutralize_diagonal(&mut self) {
        if self.neutralized {
            return;
        }
        let fill = match self.kind {
            ScoreKind::Distance => f64::INFINITY,
            ScoreKind::Similarity => 0.0,
        };
        self.values.diag_mut().fill(fill);
        self.neutralized = true;
    }

    /// Dense 1-based ranks of every candidate column relative to `row`.
    ///
    /// Columns are sorted by score (ascending for distances, descending for
    /// similarities); ties break on the original column index. The returned
    /// vector maps column index to its 1-based position in that order, so
    /// rank 1 is the nearest neighbor.
    pub fn candidate_ranks(&self, row: usize) -> Vec<usize> {
        let scores = self.values.row(row);
        let n = scores.len();

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            let by_score = match self.kind {
                ScoreKind::Distance => scores[a].partial_cmp(&scores[b]),
                ScoreKind::Similarity => scores[b].partial_cmp(&scores[a]),
            };
            by_score.unwrap_or(Ordering::Equal).then(a.cmp(&b))
        });

        // Invert the permutation: ranks[col] = 1-based sorted position.
        let mut ranks = vec![0usize; n];
        for (position, &col) in order.iter().enumerate() {
            ranks[col] = position + 1;
        }
        ranks
    }

    /// Consumes the wrapper and returns the raw matrix.
    pub fn into_inner(self) -> Array2<f64> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_rejects_non_square() {
        let values = Array2::<f64>::zeros((2, 3));
        let err = ScoreMatrix::new(values, ScoreKind::Distance).unwrap_err();
        assert!(matches!(err, EvalError::NotSquare { rows: 2, cols: 3 }));
    }

    #[test]
    fn test_neutralize_distance_diagonal() {
        let values = array![[0.0, 0.1], [0.1, 0.0]];
        let mut matrix = ScoreMatrix::new(values, ScoreKind::Distance).unwrap();
        matrix.neutralize_diagonal();
        let raw = matrix.into_inner();
        assert!(raw[[0, 0]].is_infinite());
        assert!(raw[[1, 1]].is_infinite());
        assert_eq!(raw[[0, 1]], 0.1);
    }

    #[test]
    fn test_neutralize_similarity_diagonal() {
        let values = array![[1.0, 0.6], [0.6, 1.0]];
        let mut matrix = ScoreMatrix::new(values, ScoreKind::Similarity).unwrap();
        matrix.neutralize_diagonal();
        let raw = matrix.into_inner();
        assert_eq!(raw[[0, 0]], 0.0);
        assert_eq!(raw[[1, 1]], 0.0);
    }

    #[test]
    fn test_distance_ranks_ascending_with_index_tie_break() {
        let values = array![
            [f64::INFINITY, 0.5, 0.1, 0.5],
            [0.5, f64::INFINITY, 0.2, 0.3],
            [0.1, 0.2, f64::INFINITY, 0.4],
            [0.5, 0.3, 0.4, f64::INFINITY],
        ];
        let matrix = ScoreMatrix::new(values, ScoreKind::Distance).unwrap();
        // Row 0: col2 (0.1) < col1 (0.5) == col3 (0.5) < col0 (inf).
        // The 0.5 tie breaks toward the lower column index.
        assert_eq!(matrix.candidate_ranks(0), vec![4, 2, 1, 3]);
    }

    #[test]
    fn test_similarity_ranks_descending() {
        let values = array![[0.0, 0.9, 0.2], [0.9, 0.0, 0.5], [0.2, 0.5, 0.0]];
        let matrix = ScoreMatrix::new(values, ScoreKind::Similarity).unwrap();
        // Row 0: col1 (0.9) > col2 (0.2) > col0 (0.0).
        assert_eq!(matrix.candidate_ranks(0), vec![3, 1, 2]);
    }

    #[test]
    fn test_ranks_are_dense_permutation() {
        let values = array![[0.3, 0.3, 0.3], [0.1, 0.2, 0.3], [0.9, 0.8, 0.7]];
        let matrix = ScoreMatrix::new(values, ScoreKind::Distance).unwrap();
        for row in 0..3 {
            let mut ranks = matrix.candidate_ranks(row);
            ranks.sort_unstable();
            assert_eq!(ranks, vec![1, 2, 3]);
        }
    }
}
