use crate::error::{AnalysisError, AnalysisResult};
use crate::features::FeatureMatrix;

/// Rows of one team that played strictly more than the matches threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceGroup {
    team: String,
    rows: Vec<usize>,
}

impl ReferenceGroup {
    pub fn select(
        matrix: &FeatureMatrix<'_>,
        team: &str,
        min_matches_played: f64,
    ) -> AnalysisResult<Self> {
        let rows = matrix
            .records()
            .iter()
            .enumerate()
            .filter(|(_, r)| r.squad == team && r.matches_played > min_matches_played)
            .map(|(idx, _)| idx)
            .collect::<Vec<_>>();
        if rows.is_empty() {
            return Err(AnalysisError::empty_reference_group(team));
        }
        Ok(Self {
            team: team.to_string(),
            rows,
        })
    }

    pub fn team(&self) -> &str {
        &self.team
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn player_names(&self, matrix: &FeatureMatrix<'_>) -> Vec<String> {
        self.rows
            .iter()
            .map(|&r| matrix.record(r).name.clone())
            .collect()
    }
}

/// Mean raw value of each relevant column over a reference group. Missing cells are
/// skipped rather than counted as 0; a column with no value at all averages to 0, the
/// same fill candidates get.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleProfile {
    columns: Vec<usize>,
    values: Vec<f64>,
}

impl RoleProfile {
    pub fn aggregate(
        matrix: &FeatureMatrix<'_>,
        group: &ReferenceGroup,
        columns: &[usize],
    ) -> AnalysisResult<Self> {
        if group.rows.is_empty() {
            return Err(AnalysisError::empty_reference_group(group.team.clone()));
        }
        let mut sums = vec![0.0; columns.len()];
        let mut counts = vec![0usize; columns.len()];
        for &row in &group.rows {
            let record = matrix.record(row);
            for (idx, &col) in columns.iter().enumerate() {
                if let Some(v) = record.value(col) {
                    sums[idx] += v;
                    counts[idx] += 1;
                }
            }
        }
        let values = sums
            .into_iter()
            .zip(counts)
            .map(|(sum, n)| if n == 0 { 0.0 } else { sum / n as f64 })
            .collect();
        Ok(Self {
            columns: columns.to_vec(),
            values,
        })
    }

    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
