//! Dynamic-time-warping sequence alignment.
//!
//! Aligns two ordered lists of feature vectors that may differ in
//! length and speed, producing the minimal global alignment cost and
//! the warping path realizing it. The path supports frame-to-frame
//! correspondence queries ("which target frame matches query frame i").
//!
//! The accumulated cost matrix is (N+1)×(M+1) with an infinite border
//! and a zero origin, which forces the alignment to start exactly at
//! (1,1), with no free insertion or deletion at the sequence head.

use crate::error::{Result, ScreenError};
use crate::features::FeatureVector;

/// Accumulated-cost grid for one alignment call.
///
/// Row-major, (rows)×(cols); owned solely by the call that builds it.
#[derive(Debug)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    /// Create a matrix with the DTW border: everything +∞ except the
    /// (0,0) origin.
    #[must_use]
    pub fn with_border(rows: usize, cols: usize) -> Self {
        let mut data = vec![f64::INFINITY; rows * cols];
        data[0] = 0.0;
        Self { rows, cols, data }
    }

    /// Value at (i, j).
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.rows && j < self.cols);
        self.data[i * self.cols + j]
    }

    fn set(&mut self, i: usize, j: usize, value: f64) {
        debug_assert!(i < self.rows && j < self.cols);
        self.data[i * self.cols + j] = value;
    }
}

/// Result of one alignment: the global cost and the warping path.
///
/// Path entries are 1-based (query, target) index pairs in backtrace
/// order, from (N, M) down to (1, 1). Each step decrements at least
/// one index and never increments either.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// Minimal global alignment cost, always >= 0.
    pub cost: f64,
    /// Warping path from (N, M) to (1, 1), 1-based.
    pub path: Vec<(usize, usize)>,
}

impl Alignment {
    /// Target frame index aligned to a query frame index (both
    /// 0-based); first match in path order. `None` when the query
    /// index lies outside the aligned range.
    #[must_use]
    pub fn frame_correspondence(&self, query_index: usize) -> Option<usize> {
        self.path
            .iter()
            .find(|(q, _)| *q == query_index + 1)
            .map(|&(_, t)| t - 1)
    }
}

/// Euclidean distance between two feature vectors of equal length.
#[must_use]
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Align two feature-vector sequences.
///
/// # Arguments
///
/// * `query` - Feature vectors of the captured sequence (length N >= 1)
/// * `target` - Feature vectors of the template sequence (length M >= 1)
///
/// # Returns
///
/// The minimal-cost monotonic [`Alignment`] between the sequences.
///
/// # Errors
///
/// - [`ScreenError::EmptySequence`] when either input is empty
/// - [`ScreenError::FeatureLengthMismatch`] when vector dimensions differ
pub fn align(query: &[FeatureVector], target: &[FeatureVector]) -> Result<Alignment> {
    if query.is_empty() {
        return Err(ScreenError::empty_sequence("query has no feature vectors"));
    }
    if target.is_empty() {
        return Err(ScreenError::empty_sequence("target has no feature vectors"));
    }
    if query[0].len() != target[0].len() {
        return Err(ScreenError::feature_length_mismatch(
            query[0].len(),
            target[0].len(),
        ));
    }

    let n = query.len();
    let m = target.len();
    let mut matrix = CostMatrix::with_border(n + 1, m + 1);

    for i in 1..=n {
        for j in 1..=m {
            let cost = euclidean_distance(&query[i - 1], &target[j - 1]);
            let best = matrix
                .get(i - 1, j)
                .min(matrix.get(i, j - 1))
                .min(matrix.get(i - 1, j - 1));
            matrix.set(i, j, cost + best);
        }
    }

    let path = backtrace(&matrix, n, m);
    Ok(Alignment {
        cost: matrix.get(n, m),
        path,
    })
}

/// Walk the accumulated matrix from (N, M) back to (1, 1).
///
/// Direction choice is a total order: on exact cost ties the diagonal
/// wins over up, and up over left. Strict "less than both others"
/// comparisons would select nothing when two predecessors tie exactly;
/// the explicit priority guarantees every step moves.
fn backtrace(matrix: &CostMatrix, n: usize, m: usize) -> Vec<(usize, usize)> {
    let mut path = Vec::with_capacity(n + m);
    let (mut i, mut j) = (n, m);
    path.push((i, j));

    while !(i == 1 && j == 1) {
        if i == 1 {
            j -= 1;
        } else if j == 1 {
            i -= 1;
        } else {
            let diagonal = matrix.get(i - 1, j - 1);
            let up = matrix.get(i - 1, j);
            let left = matrix.get(i, j - 1);

            let mut best = diagonal;
            let mut step = (i - 1, j - 1);
            if up < best {
                best = up;
                step = (i - 1, j);
            }
            if left < best {
                step = (i, j - 1);
            }
            (i, j) = step;
            path.push((i, j));
            continue;
        }
        path.push((i, j));
    }

    path
}
