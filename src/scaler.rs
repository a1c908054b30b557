use crate::error::AnalysisResult;
use crate::features::FeatureMatrix;

/// Per-column mean and scale, using the population variance (divide by n).
///
/// A column whose values are all identical keeps a scale of 1, so centering turns it
/// into exact zeros instead of NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    pub means: Vec<f64>,
    pub scales: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(matrix: &FeatureMatrix<'_>) -> Self {
        let (nrows, ncols) = (matrix.nrows(), matrix.ncols());
        let mut means = vec![0.0; ncols];
        let mut scales = vec![1.0; ncols];
        if nrows == 0 {
            return Self { means, scales };
        }

        for c in 0..ncols {
            let first = matrix.value(0, c);
            if (1..nrows).all(|r| matrix.value(r, c) == first) {
                means[c] = first;
                continue;
            }
            let mean = (0..nrows).map(|r| matrix.value(r, c)).sum::<f64>() / nrows as f64;
            let var = (0..nrows)
                .map(|r| {
                    let d = matrix.value(r, c) - mean;
                    d * d
                })
                .sum::<f64>()
                / nrows as f64;
            let std = var.sqrt();
            means[c] = mean;
            if std > f64::EPSILON * mean.abs().max(1.0) {
                scales[c] = std;
            }
        }

        Self { means, scales }
    }

    pub fn transform<'a>(&self, matrix: &FeatureMatrix<'a>) -> AnalysisResult<FeatureMatrix<'a>> {
        let ncols = matrix.ncols();
        let values = matrix
            .values()
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let c = i % ncols;
                (v - self.means[c]) / self.scales[c]
            })
            .collect();
        matrix.with_values(values)
    }
}

pub fn standardize<'a>(matrix: &FeatureMatrix<'a>) -> AnalysisResult<FeatureMatrix<'a>> {
    StandardScaler::fit(matrix).transform(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PlayerTable;

    fn column(m: &FeatureMatrix<'_>, code: &str) -> Vec<f64> {
        let c = m.columns().position(code).unwrap();
        (0..m.nrows()).map(|r| m.value(r, c)).collect()
    }

    #[test]
    fn columns_have_zero_mean_unit_population_std() {
        let csv = "Player,Pos,Squad,MP,Gls\n\
                   A,FW,X,10,1\n\
                   B,FW,X,20,2\n\
                   C,FW,X,30,3\n\
                   D,FW,X,40,6\n";
        let table = PlayerTable::from_csv_reader(csv.as_bytes()).unwrap();
        let m = FeatureMatrix::for_positions(&table, &["FW".to_string()]);
        let scaled = standardize(&m).unwrap();

        for code in ["MP", "Gls"] {
            let col = column(&scaled, code);
            let n = col.len() as f64;
            let mean = col.iter().sum::<f64>() / n;
            let var = col.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
            assert!(mean.abs() < 1e-12, "{code} mean {mean}");
            assert!((var - 1.0).abs() < 1e-12, "{code} var {var}");
        }
    }

    #[test]
    fn constant_and_missing_columns_become_zeros() {
        let csv = "Player,Pos,Squad,MP,PK,xG\n\
                   A,FW,X,10,0.1,\n\
                   B,FW,X,20,0.1,\n\
                   C,FW,X,30,0.1,\n";
        let table = PlayerTable::from_csv_reader(csv.as_bytes()).unwrap();
        let m = FeatureMatrix::for_positions(&table, &["FW".to_string()]);
        let scaled = standardize(&m).unwrap();
        assert_eq!(column(&scaled, "PK"), vec![0.0, 0.0, 0.0]);
        assert_eq!(column(&scaled, "xG"), vec![0.0, 0.0, 0.0]);
        assert!(scaled.values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn empty_matrix_scales_to_empty() {
        let csv = "Player,Pos,Squad,MP,Gls\nA,CB,X,10,1\n";
        let table = PlayerTable::from_csv_reader(csv.as_bytes()).unwrap();
        let m = FeatureMatrix::for_positions(&table, &["FW".to_string()]);
        let scaled = standardize(&m).unwrap();
        assert!(scaled.is_empty());
        assert_eq!(scaled.ncols(), 2);
    }
}
