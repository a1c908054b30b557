//! Weighted Euclidean distance and the all-pairs matrix built from it.

use rayon::prelude::*;
use tracing::debug;

use crate::error::{AnalysisError, AnalysisResult};
use crate::features::FeatureMatrix;
use crate::weights::WeightVector;

/// `sqrt(Σ w[i] * (x[i] - y[i])^2)`. All three slices must have the same length.
pub fn weighted_euclidean(x: &[f64], y: &[f64], weights: &[f64]) -> AnalysisResult<f64> {
    if x.len() != weights.len() {
        return Err(AnalysisError::dimension_mismatch(weights.len(), x.len()));
    }
    if y.len() != weights.len() {
        return Err(AnalysisError::dimension_mismatch(weights.len(), y.len()));
    }
    Ok(weighted_sq_sum(x, y, weights).sqrt())
}

// Lengths are checked by the callers.
fn weighted_sq_sum(x: &[f64], y: &[f64], weights: &[f64]) -> f64 {
    x.iter()
        .zip(y)
        .zip(weights)
        .map(|((a, b), w)| {
            let d = a - b;
            w * d * d
        })
        .sum()
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Each rayon task fills the upper part of its own row in place; the lower triangle is
    /// then mirrored from it.
    pub fn build(matrix: &FeatureMatrix<'_>, weights: &WeightVector) -> AnalysisResult<Self> {
        if weights.len() != matrix.ncols() {
            return Err(AnalysisError::dimension_mismatch(
                matrix.ncols(),
                weights.len(),
            ));
        }
        let n = matrix.nrows();
        let w = weights.as_slice();
        let mut data = vec![0.0; n * n];
        if n == 0 {
            return Ok(Self { n, data });
        }

        data.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
            let xi = matrix.row(i);
            for (j, cell) in row.iter_mut().enumerate().skip(i + 1) {
                *cell = weighted_sq_sum(xi, matrix.row(j), w).sqrt();
            }
        });
        for i in 1..n {
            for j in 0..i {
                data[i * n + j] = data[j * n + i];
            }
        }
        debug!(players = n, columns = matrix.ncols(), "built distance matrix");
        Ok(Self { n, data })
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Indices within `eps` of `i` (inclusive), `i` itself included.
    pub fn neighbors(&self, i: usize, eps: f64) -> Vec<usize> {
        self.row(i)
            .iter()
            .enumerate()
            .filter(|(_, d)| **d <= eps)
            .map(|(j, _)| j)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_matches_formula() {
        let d = weighted_euclidean(&[1.0, 2.0, 3.0], &[4.0, 2.0, 0.0], &[1.0, 5.0, 2.0]).unwrap();
        assert!((d - (9.0f64 + 18.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn zero_weight_dimensions_are_masked() {
        let d = weighted_euclidean(&[1.0, 100.0], &[1.0, -100.0], &[1.0, 0.0]).unwrap();
        assert_eq!(d, 0.0);
    }

    #[test]
    fn metric_is_symmetric() {
        let x = [0.3, -1.2, 4.0];
        let y = [2.5, 0.0, -0.7];
        let w = [2.0, 1.0, 1.0];
        assert_eq!(
            weighted_euclidean(&x, &y, &w).unwrap(),
            weighted_euclidean(&y, &x, &w).unwrap()
        );
    }

    #[test]
    fn length_mismatch_is_reported() {
        let err = weighted_euclidean(&[1.0, 2.0], &[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::DimensionMismatch {
                expected: 1,
                actual: 2
            }
        ));
        let err = weighted_euclidean(&[1.0], &[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(err, AnalysisError::DimensionMismatch { .. }));
    }

    #[test]
    fn matrix_fills_both_triangles_in_place() {
        use crate::dataset::PlayerTable;

        let csv = "Player,Pos,Squad,MP,X,Y\n\
                   A,FW,Arsenal,30,0,0\n\
                   B,FW,Lens,30,3,4\n\
                   C,FW,Lyon,30,6,8\n";
        let table = PlayerTable::from_csv_reader(csv.as_bytes()).unwrap();
        let m = FeatureMatrix::for_positions(&table, &["FW".to_string()]);
        let w = WeightVector::from_values(vec![0.0, 1.0, 1.0]);
        let d = DistanceMatrix::build(&m, &w).unwrap();
        assert_eq!(d.row(0), &[0.0, 5.0, 10.0]);
        assert_eq!(d.row(1), &[5.0, 0.0, 5.0]);
        assert_eq!(d.row(2), &[10.0, 5.0, 0.0]);

        let none = FeatureMatrix::for_positions(&table, &["GK".to_string()]);
        assert!(DistanceMatrix::build(&none, &w).unwrap().is_empty());
        let one = FeatureMatrix::from_records(table.columns(), vec![&table.records()[1]]);
        assert_eq!(DistanceMatrix::build(&one, &w).unwrap().row(0), &[0.0]);
    }
}
